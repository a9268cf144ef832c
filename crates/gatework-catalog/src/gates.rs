//! Combinational gates: Diode, NOT, AND, OR, XOR.
//!
//! Pin layouts match the standard palette drawings: inputs on the left
//! edge, the output on the right edge. Every input pin opts into
//! `causes_update`, so a delivered change re-evaluates the gate in the same
//! tick's gate phase.

use gatework_core::gate::PinAccess;
use gatework_core::geom::{Point, Size};
use gatework_core::template::{Direction, GateTemplate, PinTemplate};

// ---------------------------------------------------------------------------
// Pin layouts
// ---------------------------------------------------------------------------

fn two_pin(width: i32) -> Vec<PinTemplate> {
    vec![
        PinTemplate::new("A", Direction::Input, true, Point::new(0, 20)),
        PinTemplate::new("B", Direction::Output, false, Point::new(width, 20)),
    ]
}

fn three_pin() -> Vec<PinTemplate> {
    vec![
        PinTemplate::new("A", Direction::Input, true, Point::new(0, 30)),
        PinTemplate::new("B", Direction::Input, true, Point::new(0, 10)),
        PinTemplate::new("C", Direction::Output, false, Point::new(50, 20)),
    ]
}

// ---------------------------------------------------------------------------
// Logic functions
// ---------------------------------------------------------------------------

fn diode_logic(pins: &mut PinAccess<'_>) {
    let a = pins.state(0);
    pins.set_state(1, a);
}

fn not_logic(pins: &mut PinAccess<'_>) {
    let a = pins.state(0);
    pins.set_state(1, !a);
}

fn and_logic(pins: &mut PinAccess<'_>) {
    let c = pins.state(0) && pins.state(1);
    pins.set_state(2, c);
}

fn or_logic(pins: &mut PinAccess<'_>) {
    let c = pins.state(0) || pins.state(1);
    pins.set_state(2, c);
}

fn xor_logic(pins: &mut PinAccess<'_>) {
    let c = pins.state(0) ^ pins.state(1);
    pins.set_state(2, c);
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub fn diode() -> GateTemplate {
    GateTemplate::new("Diode", Size::new(40, 40), two_pin(40))
        .with_description("Passes its input through unchanged")
        .with_logic(diode_logic)
}

pub fn not_gate() -> GateTemplate {
    GateTemplate::new("NOT", Size::new(50, 40), two_pin(50))
        .with_description("Inverts its input")
        .with_logic(not_logic)
}

pub fn and_gate() -> GateTemplate {
    GateTemplate::new("AND", Size::new(50, 40), three_pin())
        .with_description("High when both inputs are high")
        .with_logic(and_logic)
}

pub fn or_gate() -> GateTemplate {
    GateTemplate::new("OR", Size::new(50, 40), three_pin())
        .with_description("High when either input is high")
        .with_logic(or_logic)
}

pub fn xor_gate() -> GateTemplate {
    GateTemplate::new("XOR", Size::new(50, 40), three_pin())
        .with_description("High when exactly one input is high")
        .with_logic(xor_logic)
}

// ===========================================================================
// Tests
// ===========================================================================
