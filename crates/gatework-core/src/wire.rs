//! Wire instances: the user-dragged connections between pins.

use crate::geom::Point;
use crate::id::PinRef;

/// A wire between two endpoint points, optionally resolved to a pin pair.
///
/// A wire starts life unconnected while the user drags its end point around.
/// [`crate::engine::Simulation::connect_wire`] resolves both endpoints to
/// pins of opposite direction and freezes the wire; an unconnected wire is
/// never registered and never participates in propagation.
#[derive(Debug, Clone)]
pub struct Wire {
    start: Point,
    end: Point,
    input: Option<PinRef>,
    output: Option<PinRef>,
}

impl Wire {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            input: None,
            output: None,
        }
    }

    /// A wire about to be dragged out: both endpoints at the grab point.
    pub fn at(p: Point) -> Self {
        Self::new(p, p)
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Move the free end while the user drags.
    pub fn set_end(&mut self, p: Point) {
        self.end = p;
    }

    /// The connected input pin (the one this wire delivers state to).
    pub fn input(&self) -> Option<PinRef> {
        self.input
    }

    /// The connected output pin (the one this wire reads state from).
    pub fn output(&self) -> Option<PinRef> {
        self.output
    }

    pub fn is_connected(&self) -> bool {
        self.input.is_some() && self.output.is_some()
    }

    pub(crate) fn connect(&mut self, input: PinRef, output: PinRef) {
        self.input = Some(input);
        self.output = Some(output);
    }

    pub(crate) fn disconnect(&mut self) {
        self.input = None;
        self.output = None;
    }
}
