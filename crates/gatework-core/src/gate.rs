//! Placed gate instances and their pins.
//!
//! A [`Gate`] is a stateful occurrence of a [`GateTemplate`]: a shared
//! template handle, a fixed position, and one [`Pin`] per template pin at
//! the same index. The pin array is created at construction and never
//! resized. Gates do not move after placement, so each pin's absolute
//! position is computed once.

use std::sync::Arc;

use crate::geom::{Point, Rect};
use crate::id::WireId;
use crate::template::GateTemplate;

// ---------------------------------------------------------------------------
// Pin
// ---------------------------------------------------------------------------

/// A stateful connection point on a placed gate.
#[derive(Debug, Clone)]
pub struct Pin {
    state: bool,
    wire: Option<WireId>,
    pos: Point,
}

impl Pin {
    pub(crate) fn new(pos: Point) -> Self {
        Self {
            state: false,
            wire: None,
            pos,
        }
    }

    pub fn state(&self) -> bool {
        self.state
    }

    /// The wire attached to this pin, if any. A pin holds at most one.
    pub fn wire(&self) -> Option<WireId> {
        self.wire
    }

    /// Absolute position: gate position plus template offset. Never changes.
    pub fn position(&self) -> Point {
        self.pos
    }

    pub(crate) fn set_wire(&mut self, wire: Option<WireId>) {
        self.wire = wire;
    }

    /// Raw state store. The change-detection and enqueue policy live in the
    /// engine's two setters and in [`PinAccess::set_state`].
    pub(crate) fn store_state(&mut self, state: bool) {
        self.state = state;
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// A placed gate: shared template, fixed position, pin instances.
#[derive(Debug, Clone)]
pub struct Gate {
    template: Arc<GateTemplate>,
    pos: Point,
    pins: Vec<Pin>,
}

impl Gate {
    pub(crate) fn new(template: Arc<GateTemplate>, pos: Point) -> Self {
        let pins = template
            .pins()
            .iter()
            .map(|pt| Pin::new(pos.offset_by(pt.offset)))
            .collect();
        Self {
            template,
            pos,
            pins,
        }
    }

    pub fn template(&self) -> &Arc<GateTemplate> {
        &self.template
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.template.size())
    }

    /// Index of the pin whose absolute position exactly equals `p`.
    pub fn pin_index_at(&self, p: Point) -> Option<usize> {
        self.pins.iter().position(|pin| pin.position() == p)
    }

    /// Current state of every pin in template order. Debugging aid.
    pub fn pin_states(&self) -> Vec<bool> {
        self.pins.iter().map(Pin::state).collect()
    }

    /// Split borrow for the engine's gate phase: the template (for the logic
    /// function and pin flags) alongside mutable pin state.
    pub(crate) fn parts_mut(&mut self) -> (&GateTemplate, &mut [Pin]) {
        (&self.template, &mut self.pins)
    }
}

// ---------------------------------------------------------------------------
// PinAccess
// ---------------------------------------------------------------------------

/// Mutable view over one gate's pins, handed to a template's logic function.
///
/// Reads go through [`state`](PinAccess::state); writes go through
/// [`set_state`](PinAccess::set_state), the output-side setter: a changed
/// value is stored and the pin's attached wire (if any) is enqueued for the
/// next wire phase. Writing an unchanged value is a no-op.
pub struct PinAccess<'a> {
    pins: &'a mut [Pin],
    wire_queue: &'a mut Vec<WireId>,
}

impl<'a> PinAccess<'a> {
    pub(crate) fn new(pins: &'a mut [Pin], wire_queue: &'a mut Vec<WireId>) -> Self {
        Self { pins, wire_queue }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn state(&self, pin: usize) -> bool {
        self.pins[pin].state()
    }

    pub fn set_state(&mut self, pin: usize, state: bool) {
        let p = &mut self.pins[pin];
        if p.state() != state {
            p.store_state(state);
            if let Some(wire) = p.wire() {
                self.wire_queue.push(wire);
            }
        }
    }
}
