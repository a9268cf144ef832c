//! Editing flows: connection rules, cascading teardown, and undo.

use std::sync::Arc;

use gatework_catalog::{gates, io};
use gatework_core::engine::{ConnectError, Simulation};
use gatework_core::geom::Point;
use gatework_core::id::{GateId, PinRef};
use gatework_core::template::Direction;
use gatework_core::wire::Wire;

// ============================================================================
// Helpers
// ============================================================================

fn pin_pos(sim: &Simulation, gate: GateId, pin: usize) -> Point {
    sim.pin(PinRef::new(gate, pin)).unwrap().position()
}

fn settle(sim: &mut Simulation) {
    while !sim.is_settled() {
        sim.tick();
    }
}

/// Switch wired to an AND gate's two inputs, AND output wired to an LED.
fn small_circuit(sim: &mut Simulation) -> (GateId, GateId, GateId, GateId) {
    let sw_a = sim.add_gate(&Arc::new(io::switch()), Point::new(0, 0));
    let sw_b = sim.add_gate(&Arc::new(io::switch()), Point::new(0, 100));
    let and = sim.add_gate(&Arc::new(gates::and_gate()), Point::new(200, 200));
    let lamp = sim.add_gate(&Arc::new(io::led()), Point::new(400, 400));

    for (from, to) in [
        ((sw_a, 0), (and, 0)),
        ((sw_b, 0), (and, 1)),
        ((and, 2), (lamp, 0)),
    ] {
        let wire = Wire::new(pin_pos(sim, from.0, from.1), pin_pos(sim, to.0, to.1));
        sim.connect_wire(wire).unwrap();
    }
    (sw_a, sw_b, and, lamp)
}

// ============================================================================
// Test 1: connection rules
// ============================================================================

#[test]
fn dragging_into_empty_space_is_rejected_cleanly() {
    let mut sim = Simulation::new();
    let sw = sim.add_gate(&Arc::new(io::switch()), Point::new(0, 0));

    let mut wire = Wire::at(pin_pos(&sim, sw, 0));
    wire.set_end(Point::new(999, 999));
    let result = sim.connect_wire(wire);

    assert!(matches!(result, Err(ConnectError::UnresolvedEndpoint(_))));
    assert_eq!(sim.wire_count(), 0);
    assert!(sim.pin(PinRef::new(sw, 0)).unwrap().wire().is_none());
    // the failed attempt logged nothing for undo
    assert_eq!(sim.undo_depth(), 1);
}

#[test]
fn same_direction_pairs_are_rejected_in_both_orders() {
    let mut sim = Simulation::new();
    let lamp_a = sim.add_gate(&Arc::new(io::led()), Point::new(0, 0));
    let lamp_b = sim.add_gate(&Arc::new(io::led()), Point::new(100, 0));
    let a = pin_pos(&sim, lamp_a, 0);
    let b = pin_pos(&sim, lamp_b, 0);

    assert_eq!(
        sim.connect_wire(Wire::new(a, b)),
        Err(ConnectError::SameDirection(Direction::Input))
    );
    assert_eq!(
        sim.connect_wire(Wire::new(b, a)),
        Err(ConnectError::SameDirection(Direction::Input))
    );
    assert_eq!(sim.wire_count(), 0);
}

#[test]
fn reconnecting_a_pin_evicts_and_zeroes_the_old_wire() {
    let mut sim = Simulation::new();
    let sw_a = sim.add_gate(&Arc::new(io::switch()), Point::new(0, 0));
    let sw_b = sim.add_gate(&Arc::new(io::switch()), Point::new(0, 100));
    let lamp = sim.add_gate(&Arc::new(io::led()), Point::new(200, 200));

    let old = sim
        .connect_wire(Wire::new(pin_pos(&sim, sw_a, 0), pin_pos(&sim, lamp, 0)))
        .unwrap();
    sim.mouse_clicked(sw_a);
    settle(&mut sim);
    assert_eq!(sim.pin_state(PinRef::new(lamp, 0)), Some(true));

    // drag a new wire from the other switch onto the same LED pin
    sim.connect_wire(Wire::new(pin_pos(&sim, sw_b, 0), pin_pos(&sim, lamp, 0)))
        .unwrap();

    assert!(sim.wire(old).is_none());
    assert_eq!(sim.wire_count(), 1);
    // the evicted wire's endpoints were zeroed on the spot
    assert_eq!(sim.pin_state(PinRef::new(sw_a, 0)), Some(false));
    assert_eq!(sim.pin_state(PinRef::new(lamp, 0)), Some(false));
}

// ============================================================================
// Test 2: cascading removal
// ============================================================================

#[test]
fn removing_a_gate_detaches_and_zeroes_every_neighbour() {
    let mut sim = Simulation::new();
    let (sw_a, sw_b, and, lamp) = small_circuit(&mut sim);
    sim.mouse_clicked(sw_a);
    sim.mouse_clicked(sw_b);
    settle(&mut sim);
    assert_eq!(sim.pin_state(PinRef::new(lamp, 0)), Some(true));

    sim.remove_gate(and);

    assert!(sim.gate(and).is_none());
    assert_eq!(sim.wire_count(), 0);
    for pin in [
        PinRef::new(sw_a, 0),
        PinRef::new(sw_b, 0),
        PinRef::new(lamp, 0),
    ] {
        assert_eq!(sim.pin_state(pin), Some(false));
        assert!(sim.pin(pin).unwrap().wire().is_none());
    }
}

#[test]
fn removing_a_gate_twice_is_harmless() {
    let mut sim = Simulation::new();
    let (_, _, and, _) = small_circuit(&mut sim);
    sim.remove_gate(and);
    sim.remove_gate(and);
    assert_eq!(sim.gate_count(), 3);
}

// ============================================================================
// Test 3: undo
// ============================================================================

#[test]
fn undo_walks_back_additions_one_at_a_time() {
    let mut sim = Simulation::new();
    let sw = sim.add_gate(&Arc::new(io::switch()), Point::new(0, 0));
    let lamp = sim.add_gate(&Arc::new(io::led()), Point::new(100, 100));
    sim.connect_wire(Wire::new(pin_pos(&sim, sw, 0), pin_pos(&sim, lamp, 0)))
        .unwrap();
    sim.mouse_clicked(sw);
    settle(&mut sim);

    // first undo removes the wire and resets its pins
    sim.undo();
    assert_eq!(sim.wire_count(), 0);
    assert_eq!(sim.gate_count(), 2);
    assert_eq!(sim.pin_state(PinRef::new(sw, 0)), Some(false));
    assert_eq!(sim.pin_state(PinRef::new(lamp, 0)), Some(false));

    // second undo removes the LED
    sim.undo();
    assert!(sim.gate(lamp).is_none());
    assert_eq!(sim.gate_count(), 1);

    // third undo removes the switch, fourth is a no-op on the empty stack
    sim.undo();
    assert_eq!(sim.gate_count(), 0);
    sim.undo();
    assert_eq!(sim.gate_count(), 0);
}

#[test]
fn stale_undo_entries_pop_without_side_effects() {
    let mut sim = Simulation::new();
    let sw = sim.add_gate(&Arc::new(io::switch()), Point::new(0, 0));
    let lamp = sim.add_gate(&Arc::new(io::led()), Point::new(100, 100));
    let wire = sim
        .connect_wire(Wire::new(pin_pos(&sim, sw, 0), pin_pos(&sim, lamp, 0)))
        .unwrap();

    // skip the wire's own entry by removing the LED placement instead
    sim.remove_gate(lamp);
    assert!(sim.wire(wire).is_none());

    // the stack still holds wire and LED entries; both pop as no-ops
    sim.undo();
    sim.undo();
    assert_eq!(sim.gate_count(), 1);
    assert!(sim.gate(sw).is_some());

    sim.undo();
    assert_eq!(sim.gate_count(), 0);
}

// ============================================================================
// Test 4: clear
// ============================================================================

#[test]
fn clear_resets_the_board_but_not_history_or_time() {
    let mut sim = Simulation::new();
    small_circuit(&mut sim);
    sim.tick();
    sim.tick();
    let depth = sim.undo_depth();
    assert_eq!(depth, 7);

    sim.clear();
    assert_eq!(sim.gate_count(), 0);
    assert_eq!(sim.wire_count(), 0);
    assert!(sim.is_settled());
    assert_eq!(sim.current_tick(), 2);
    assert_eq!(sim.undo_depth(), depth);

    // stale history drains without effect
    for _ in 0..depth {
        sim.undo();
    }
    assert_eq!(sim.undo_depth(), 0);
    assert_eq!(sim.gate_count(), 0);
}
