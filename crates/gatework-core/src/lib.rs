//! Gatework Core -- the simulation engine for grid-based logic circuits.
//!
//! This crate provides the entity graph (gate, pin, and wire instances over
//! immutable templates), the tick-driven propagation scheduler, connection
//! rules, spatial lookups, and the single-level undo log. Rendering, menus,
//! pointer-to-grid snapping, and the periodic timer that drives
//! [`engine::Simulation::tick`] are host concerns.
//!
//! # Two-Phase Tick
//!
//! Each call to [`engine::Simulation::tick`] advances the simulation by one
//! step:
//!
//! 1. **Wire drain** -- queued wires deliver their output pin's state to
//!    their input pin; changed inputs enqueue their gate (when the pin opts
//!    in with `causes_update`) for this tick's gate phase.
//! 2. **Gate drain** -- queued gates re-evaluate their template's logic
//!    function; changed outputs enqueue wires for the *next* tick.
//!
//! Both queues are snapshotted and cleared before draining, so a signal
//! moves exactly one hop per tick and every tick terminates regardless of
//! graph shape. Feedback loops oscillate across ticks (a ring oscillator),
//! never within one.
//!
//! # Key Types
//!
//! - [`engine::Simulation`] -- an independent simulation context: arenas,
//!   queues, tick counter, undo log, observer slot.
//! - [`template::GateTemplate`] / [`template::PinTemplate`] -- immutable
//!   component descriptions; behavior is a plain function pointer.
//! - [`template::TemplateRegistry`] -- the host-built frozen catalog.
//! - [`gate::Gate`] / [`gate::Pin`] -- placed instances holding all mutable
//!   state.
//! - [`wire::Wire`] -- a dragged connection, resolved to an input/output pin
//!   pair by [`engine::Simulation::connect_wire`].
//! - [`undo::UndoStack`] -- LIFO log of additions, popped by
//!   [`engine::Simulation::undo`].

pub mod engine;
pub mod gate;
pub mod geom;
pub mod id;
pub mod template;
pub mod undo;
pub mod wire;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
