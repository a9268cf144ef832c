//! Interactive sources and indicators: Switch, Button, LED.
//!
//! These templates have no logic function. The sources drive their output
//! pin from mouse hooks dispatched by the host; the LED is a passive sink
//! the host renders from its input pin's state.

use gatework_core::engine::Simulation;
use gatework_core::geom::{Point, Size};
use gatework_core::id::{GateId, PinRef};
use gatework_core::template::{Direction, GateTemplate, PinTemplate};

fn source_pin() -> PinTemplate {
    PinTemplate::new("A", Direction::Output, false, Point::new(20, 10))
}

fn toggle_switch(sim: &mut Simulation, gate: GateId) {
    let pin = PinRef::new(gate, 0);
    if let Some(state) = sim.pin_state(pin) {
        sim.set_pin_state(pin, !state);
    }
}

fn press_button(sim: &mut Simulation, gate: GateId) {
    sim.set_pin_state(PinRef::new(gate, 0), true);
}

fn release_button(sim: &mut Simulation, gate: GateId) {
    sim.set_pin_state(PinRef::new(gate, 0), false);
}

/// Latching source: each click inverts the output pin.
pub fn switch() -> GateTemplate {
    GateTemplate::new("Switch", Size::new(20, 20), vec![source_pin()])
        .with_description("Latching source; click to toggle")
        .with_mouse_clicked(toggle_switch)
}

/// Momentary source: high while held, low on release.
pub fn button() -> GateTemplate {
    GateTemplate::new("Button", Size::new(20, 20), vec![source_pin()])
        .with_description("Momentary source; high while held")
        .with_mouse_pressed(press_button)
        .with_mouse_released(release_button)
}

/// Indicator: lights while its input pin is high.
pub fn led() -> GateTemplate {
    GateTemplate::new(
        "LED",
        Size::new(20, 20),
        vec![PinTemplate::new(
            "A",
            Direction::Input,
            true,
            Point::new(10, 20),
        )],
    )
    .with_description("Lights while its input is high")
}
