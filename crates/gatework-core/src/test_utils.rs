//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so the same
//! minimal templates and wiring shortcuts are available everywhere (benches
//! pick them up through the `test-utils` feature).

use std::sync::Arc;

use crate::engine::Simulation;
use crate::gate::PinAccess;
use crate::geom::{Point, Size};
use crate::id::{GateId, PinRef, WireId};
use crate::template::{Direction, GateTemplate, PinTemplate};
use crate::wire::Wire;

// ===========================================================================
// Logic functions
// ===========================================================================

fn not_logic(pins: &mut PinAccess<'_>) {
    let a = pins.state(0);
    pins.set_state(1, !a);
}

fn and_logic(pins: &mut PinAccess<'_>) {
    let c = pins.state(0) && pins.state(1);
    pins.set_state(2, c);
}

fn toggle_first_pin(sim: &mut Simulation, gate: GateId) {
    let pin = PinRef::new(gate, 0);
    if let Some(state) = sim.pin_state(pin) {
        sim.set_pin_state(pin, !state);
    }
}

// ===========================================================================
// Templates
// ===========================================================================

/// Interactive source: one output pin, click hook toggles it.
pub fn switch_template() -> Arc<GateTemplate> {
    Arc::new(
        GateTemplate::new(
            "Switch",
            Size::new(20, 20),
            vec![PinTemplate::new(
                "A",
                Direction::Output,
                false,
                Point::new(20, 10),
            )],
        )
        .with_mouse_clicked(toggle_first_pin),
    )
}

/// Passive sink: one input pin, no logic. Stands in for an LED.
pub fn probe_template() -> Arc<GateTemplate> {
    Arc::new(GateTemplate::new(
        "Probe",
        Size::new(20, 20),
        vec![PinTemplate::new(
            "A",
            Direction::Input,
            true,
            Point::new(10, 20),
        )],
    ))
}

pub fn not_template() -> Arc<GateTemplate> {
    Arc::new(
        GateTemplate::new(
            "NOT",
            Size::new(50, 40),
            vec![
                PinTemplate::new("A", Direction::Input, true, Point::new(0, 20)),
                PinTemplate::new("B", Direction::Output, false, Point::new(50, 20)),
            ],
        )
        .with_logic(not_logic),
    )
}

pub fn and_template() -> Arc<GateTemplate> {
    Arc::new(
        GateTemplate::new(
            "AND",
            Size::new(50, 40),
            vec![
                PinTemplate::new("A", Direction::Input, true, Point::new(0, 30)),
                PinTemplate::new("B", Direction::Input, true, Point::new(0, 10)),
                PinTemplate::new("C", Direction::Output, false, Point::new(50, 20)),
            ],
        )
        .with_logic(and_logic),
    )
}

// ===========================================================================
// Wiring shortcuts
// ===========================================================================

/// Absolute position of a placed gate's pin.
pub fn pin_position(sim: &Simulation, gate: GateId, pin: usize) -> Point {
    sim.pin(PinRef::new(gate, pin))
        .expect("pin exists")
        .position()
}

/// Connect two pins of placed gates by their positions.
pub fn connect_pins(
    sim: &mut Simulation,
    from: (GateId, usize),
    to: (GateId, usize),
) -> WireId {
    let start = pin_position(sim, from.0, from.1);
    let end = pin_position(sim, to.0, to.1);
    sim.connect_wire(Wire::new(start, end))
        .expect("valid connection")
}

/// Tick until no propagation work is pending. Panics if the circuit does
/// not settle (an oscillator, for instance) within 1000 ticks.
pub fn drain(sim: &mut Simulation) {
    for _ in 0..1000 {
        if sim.is_settled() {
            return;
        }
        sim.tick();
    }
    panic!("circuit did not settle within 1000 ticks");
}

// ===========================================================================
// Circuit builders
// ===========================================================================

/// Build a closed ring of `n` NOT gates, each output wired to the next
/// gate's input. The chain is connected and settled first, then the loop is
/// closed, so a single transition wavefront circulates: with odd `n` every
/// pin toggles with period `2 * n` ticks.
pub fn build_not_ring(sim: &mut Simulation, n: usize) -> Vec<GateId> {
    assert!(n >= 1);
    let gates: Vec<GateId> = (0..n)
        .map(|i| sim.add_gate(&not_template(), Point::new(i as i32 * 100, 0)))
        .collect();

    for i in 0..n - 1 {
        connect_pins(sim, (gates[i], 1), (gates[i + 1], 0));
    }
    drain(sim);

    connect_pins(sim, (gates[n - 1], 1), (gates[0], 0));
    gates
}
