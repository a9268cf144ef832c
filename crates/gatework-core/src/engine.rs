//! The simulation context: entity arenas, pending queues, the two-phase
//! tick, connection rules, spatial lookups, and the undo log.
//!
//! # Two-Phase Tick
//!
//! Each call to [`Simulation::tick`] advances the simulation by one step:
//!
//! 1. **Wire drain** -- snapshot and clear the wire queue, then deliver each
//!    queued wire's output-pin state to its input pin. Gates enqueued by
//!    these deliveries run in this tick's gate phase.
//! 2. **Gate drain** -- snapshot and clear the gate queue, then run each
//!    queued gate's logic function over its pin array. Output changes
//!    enqueue wires for the *next* tick's wire phase.
//!
//! After both phases the observer (if any) is notified and the tick counter
//! is incremented. The snapshot-then-clear ordering gives exactly one hop of
//! propagation per tick, so every tick terminates regardless of graph shape;
//! feedback loops oscillate across ticks, never within one.
//!
//! # Mutations
//!
//! User-facing mutations ([`add_gate`](Simulation::add_gate),
//! [`connect_wire`](Simulation::connect_wire),
//! [`set_pin_state`](Simulation::set_pin_state)) only enqueue future work;
//! they never cascade past the current call. Removals are idempotent: a
//! stale [`GateId`]/[`WireId`] no longer resolves and the call is a silent
//! no-op, which is also what makes stale undo entries harmless.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use slotmap::SlotMap;

use crate::gate::{Gate, Pin, PinAccess};
use crate::geom::Point;
use crate::id::{GateId, PinRef, WireId};
use crate::template::{Direction, GateTemplate};
use crate::undo::{UndoEntry, UndoStack};
use crate::wire::Wire;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a candidate wire could not be connected. The caller discards the
/// candidate; no partial state is left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// An endpoint does not land exactly on any pin.
    #[error("no pin at endpoint ({}, {})", .0.x, .0.y)]
    UnresolvedEndpoint(Point),
    /// Both resolved pins face the same direction.
    #[error("cannot join two {0:?} pins")]
    SameDirection(Direction),
}

/// Redraw notification hook, invoked once per tick after both drain phases.
pub type Observer = Box<dyn FnMut()>;

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// An independent simulation instance. Owns the gate and wire registries,
/// the two pending queues, the undo log, the tick counter, and one observer
/// slot. Strictly single-threaded; the host drives [`tick`](Simulation::tick)
/// at whatever cadence it likes.
pub struct Simulation {
    gates: SlotMap<GateId, Gate>,
    wires: SlotMap<WireId, Wire>,

    /// Registration order for gates. Spatial lookups iterate this list so
    /// overlaps resolve to the earliest-added gate, independent of slot
    /// reuse inside the arena.
    gate_order: Vec<GateId>,
    /// Registration order for wires.
    wire_order: Vec<WireId>,

    /// Wires waiting for the next wire phase. May contain duplicates;
    /// delivery is idempotent.
    wire_queue: Vec<WireId>,
    /// Gates waiting for the next gate phase. May contain duplicates;
    /// logic functions are idempotent.
    gate_queue: Vec<GateId>,

    undo: UndoStack,
    tick: u64,
    observer: Option<Observer>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Create a new, empty simulation starting at tick 0.
    pub fn new() -> Self {
        Self {
            gates: SlotMap::with_key(),
            wires: SlotMap::with_key(),
            gate_order: Vec::new(),
            wire_order: Vec::new(),
            wire_queue: Vec::new(),
            gate_queue: Vec::new(),
            undo: UndoStack::new(),
            tick: 0,
            observer: None,
        }
    }

    // -----------------------------------------------------------------------
    // Gate management
    // -----------------------------------------------------------------------

    /// Place a gate instance at `pos` and log it for undo.
    ///
    /// The template's logic runs once synchronously before the instance is
    /// registered, so resting outputs are correct before the first tick (a
    /// NOT gate with a floating input shows output `true` immediately). No
    /// wires can be attached at this point, so nothing else is disturbed.
    pub fn add_gate(&mut self, template: &Arc<GateTemplate>, pos: Point) -> GateId {
        let mut gate = Gate::new(Arc::clone(template), pos);
        if let Some(logic) = template.logic() {
            let (_, pins) = gate.parts_mut();
            logic(&mut PinAccess::new(pins, &mut self.wire_queue));
        }
        let id = self.gates.insert(gate);
        self.gate_order.push(id);
        self.undo.push(UndoEntry::Gate(id));
        debug!("placed {} at ({}, {})", template.name(), pos.x, pos.y);
        id
    }

    /// Remove a gate, cascading removal of every wire attached to any of its
    /// pins (their far endpoints reset to `false`). Stale ids are a no-op.
    pub fn remove_gate(&mut self, id: GateId) {
        let Some(gate) = self.gates.get(id) else {
            return;
        };
        let attached: Vec<WireId> = gate.pins().iter().filter_map(Pin::wire).collect();
        for wire in attached {
            self.remove_wire(wire);
        }
        self.gates.remove(id);
        self.gate_order.retain(|&g| g != id);
        debug!("removed gate {id:?}");
    }

    // -----------------------------------------------------------------------
    // Wire management
    // -----------------------------------------------------------------------

    /// Resolve a candidate wire's endpoints to pins and register it.
    ///
    /// Both endpoints must land exactly on pins, and the two pins must face
    /// opposite directions; the `input`/`output` roles are assigned from pin
    /// direction, independent of which end the drag started at. Any wire
    /// already attached to either pin is removed first (last connection
    /// wins, the evicted wire's endpoints reset to `false`). The new wire is
    /// enqueued immediately so the output's current state transfers on the
    /// next wire phase without waiting for a change event.
    ///
    /// On failure the candidate is dropped and no state changes.
    pub fn connect_wire(&mut self, mut wire: Wire) -> Result<WireId, ConnectError> {
        let start_pin = self
            .find_pin_at(wire.start())
            .ok_or(ConnectError::UnresolvedEndpoint(wire.start()))?;
        let end_pin = self
            .find_pin_at(wire.end())
            .ok_or(ConnectError::UnresolvedEndpoint(wire.end()))?;

        let start_dir = self
            .pin_direction(start_pin)
            .ok_or(ConnectError::UnresolvedEndpoint(wire.start()))?;
        let end_dir = self
            .pin_direction(end_pin)
            .ok_or(ConnectError::UnresolvedEndpoint(wire.end()))?;
        if start_dir == end_dir {
            return Err(ConnectError::SameDirection(start_dir));
        }

        if let Some(old) = self.pin_wire(end_pin) {
            self.remove_wire(old);
        }
        if let Some(old) = self.pin_wire(start_pin) {
            self.remove_wire(old);
        }

        let (input, output) = match start_dir {
            Direction::Input => (start_pin, end_pin),
            Direction::Output => (end_pin, start_pin),
        };
        wire.connect(input, output);
        let id = self.wires.insert(wire);
        self.wire_order.push(id);
        self.set_pin_wire(input, Some(id));
        self.set_pin_wire(output, Some(id));
        self.undo.push(UndoEntry::Wire(id));
        self.wire_queue.push(id);
        debug!("connected wire {id:?} ({output:?} -> {input:?})");
        Ok(id)
    }

    /// Remove a wire. If connected, both endpoint pins are detached and
    /// reset to `false`: the input pin through the wire-delivery setter (so
    /// a `causes_update` pin still triggers its gate's recompute), the
    /// output pin through the output-side setter. Stale ids are a no-op.
    pub fn remove_wire(&mut self, id: WireId) {
        let Some(wire) = self.wires.get_mut(id) else {
            return;
        };
        let input = wire.input();
        let output = wire.output();
        wire.disconnect();

        // Detach each pin before resetting its state, so the output reset
        // cannot re-queue this wire.
        if let Some(pin) = input {
            self.set_pin_wire(pin, None);
            self.deliver_input(pin, false);
        }
        if let Some(pin) = output {
            self.set_pin_wire(pin, None);
            self.set_pin_state(pin, false);
        }

        self.wires.remove(id);
        self.wire_order.retain(|&w| w != id);
        debug!("removed wire {id:?}");
    }

    // -----------------------------------------------------------------------
    // Undo / clear
    // -----------------------------------------------------------------------

    /// Reverse the most recent addition: pop the undo stack and remove that
    /// entity (gate removal cascades to its wires, wire removal resets its
    /// pins). Entries whose entity was already removed directly pop as
    /// no-ops; an empty stack is a no-op.
    pub fn undo(&mut self) {
        match self.undo.pop() {
            Some(UndoEntry::Gate(id)) => self.remove_gate(id),
            Some(UndoEntry::Wire(id)) => self.remove_wire(id),
            None => {}
        }
    }

    /// Remove every gate and wire and drop all pending work.
    ///
    /// The undo stack and the tick counter survive; entries for cleared
    /// entities pop as no-ops.
    pub fn clear(&mut self) {
        self.gates.clear();
        self.wires.clear();
        self.gate_order.clear();
        self.wire_order.clear();
        self.wire_queue.clear();
        self.gate_queue.clear();
        debug!("cleared simulation");
    }

    // -----------------------------------------------------------------------
    // Pin state
    // -----------------------------------------------------------------------

    /// Output-side state setter, the entry point for UI-driven sources
    /// (switch toggles, button presses) and for gate logic via
    /// [`PinAccess`]. A changed value is stored and the pin's attached wire
    /// (if any) is enqueued for the next wire phase. Writing the current
    /// value, or addressing a stale pin, is a no-op.
    pub fn set_pin_state(&mut self, pin: PinRef, state: bool) {
        let Self {
            gates, wire_queue, ..
        } = self;
        let Some(gate) = gates.get_mut(pin.gate) else {
            return;
        };
        let (_, pins) = gate.parts_mut();
        if pin.pin >= pins.len() {
            return;
        }
        PinAccess::new(pins, wire_queue).set_state(pin.pin, state);
    }

    /// Wire-delivery setter, used by the wire phase and by wire teardown. A
    /// changed value is stored and, iff the pin template opts in with
    /// `causes_update`, the owning gate is enqueued for recomputation.
    fn deliver_input(&mut self, pin: PinRef, state: bool) {
        let Self {
            gates, gate_queue, ..
        } = self;
        let Some(gate) = gates.get_mut(pin.gate) else {
            return;
        };
        let (template, pins) = gate.parts_mut();
        let Some(p) = pins.get_mut(pin.pin) else {
            return;
        };
        if p.state() != state {
            p.store_state(state);
            if template.pins()[pin.pin].causes_update {
                gate_queue.push(pin.gate);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the simulation by one step: wire drain, gate drain, observer,
    /// tick counter. See the module docs for the phase contract.
    pub fn tick(&mut self) {
        let pending_wires = std::mem::take(&mut self.wire_queue);
        let wire_count = pending_wires.len();
        for wire_id in pending_wires {
            let Some(wire) = self.wires.get(wire_id) else {
                continue;
            };
            let (Some(input), Some(output)) = (wire.input(), wire.output()) else {
                continue;
            };
            let Some(state) = self.pin_state(output) else {
                continue;
            };
            self.deliver_input(input, state);
        }

        let pending_gates = std::mem::take(&mut self.gate_queue);
        let gate_count = pending_gates.len();
        {
            let Self {
                gates, wire_queue, ..
            } = self;
            for gate_id in pending_gates {
                let Some(gate) = gates.get_mut(gate_id) else {
                    continue;
                };
                let (template, pins) = gate.parts_mut();
                let Some(logic) = template.logic() else {
                    continue;
                };
                logic(&mut PinAccess::new(pins, wire_queue));
            }
        }

        if wire_count > 0 || gate_count > 0 {
            trace!(
                "tick {}: drained {wire_count} wire(s), {gate_count} gate(s)",
                self.tick
            );
        }

        if let Some(observer) = self.observer.as_mut() {
            observer();
        }
        self.tick += 1;
    }

    /// Current tick counter. Starts at 0, incremented at the end of every
    /// [`tick`](Simulation::tick).
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    // -----------------------------------------------------------------------
    // Observer
    // -----------------------------------------------------------------------

    /// Install the redraw observer. One slot; a later call replaces the
    /// previous observer.
    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    // -----------------------------------------------------------------------
    // Spatial lookups
    // -----------------------------------------------------------------------

    /// The first gate (registration order) whose bounding box contains `p`,
    /// inclusive on all edges. Overlapping gates resolve to whichever was
    /// added earliest.
    pub fn find_gate_at(&self, p: Point) -> Option<GateId> {
        self.gate_order
            .iter()
            .copied()
            .find(|&id| self.gates[id].bounds().contains(p))
    }

    /// The pin whose absolute position exactly equals `p`, searched among
    /// the pins of the gate found at `p`.
    pub fn find_pin_at(&self, p: Point) -> Option<PinRef> {
        let gate_id = self.find_gate_at(p)?;
        let pin = self.gates[gate_id].pin_index_at(p)?;
        Some(PinRef::new(gate_id, pin))
    }

    /// The first wire (registration order) whose start or end point exactly
    /// equals `p`.
    pub fn find_wire_at(&self, p: Point) -> Option<WireId> {
        self.wire_order.iter().copied().find(|&id| {
            let wire = &self.wires[id];
            wire.start() == p || wire.end() == p
        })
    }

    // -----------------------------------------------------------------------
    // Mouse hook dispatch
    // -----------------------------------------------------------------------

    /// Invoke the template's click hook for a placed instance, if it has
    /// one. The host calls this after routing a pointer event to the gate's
    /// bounding box. Stale gates and hook-less templates are no-ops.
    pub fn mouse_clicked(&mut self, gate: GateId) {
        let hook = self
            .gates
            .get(gate)
            .and_then(|g| g.template().on_mouse_clicked());
        if let Some(hook) = hook {
            hook(self, gate);
        }
    }

    /// Invoke the template's press hook for a placed instance, if any.
    pub fn mouse_pressed(&mut self, gate: GateId) {
        let hook = self
            .gates
            .get(gate)
            .and_then(|g| g.template().on_mouse_pressed());
        if let Some(hook) = hook {
            hook(self, gate);
        }
    }

    /// Invoke the template's release hook for a placed instance, if any.
    pub fn mouse_released(&mut self, gate: GateId) {
        let hook = self
            .gates
            .get(gate)
            .and_then(|g| g.template().on_mouse_released());
        if let Some(hook) = hook {
            hook(self, gate);
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id)
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id)
    }

    pub fn pin(&self, pin: PinRef) -> Option<&Pin> {
        self.gates.get(pin.gate)?.pins().get(pin.pin)
    }

    pub fn pin_state(&self, pin: PinRef) -> Option<bool> {
        self.pin(pin).map(Pin::state)
    }

    /// Live gates in registration order.
    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> {
        self.gate_order.iter().map(|&id| (id, &self.gates[id]))
    }

    /// Live wires in registration order.
    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wire_order.iter().map(|&id| (id, &self.wires[id]))
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Wires waiting for the next wire phase.
    pub fn pending_wires(&self) -> usize {
        self.wire_queue.len()
    }

    /// Gates waiting for the next gate phase.
    pub fn pending_gates(&self) -> usize {
        self.gate_queue.len()
    }

    /// True when no propagation work is pending.
    pub fn is_settled(&self) -> bool {
        self.wire_queue.is_empty() && self.gate_queue.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    fn pin_direction(&self, pin: PinRef) -> Option<Direction> {
        let gate = self.gates.get(pin.gate)?;
        gate.template().pins().get(pin.pin).map(|pt| pt.direction)
    }

    fn pin_wire(&self, pin: PinRef) -> Option<WireId> {
        self.pin(pin).and_then(Pin::wire)
    }

    fn set_pin_wire(&mut self, pin: PinRef, wire: Option<WireId>) {
        if let Some(gate) = self.gates.get_mut(pin.gate) {
            let (_, pins) = gate.parts_mut();
            if let Some(p) = pins.get_mut(pin.pin) {
                p.set_wire(wire);
            }
        }
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.tick)
            .field("gates", &self.gates.len())
            .field("wires", &self.wires.len())
            .field("pending_wires", &self.wire_queue.len())
            .field("pending_gates", &self.gate_queue.len())
            .field("undo_depth", &self.undo.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
