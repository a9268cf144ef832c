use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a placed gate instance in the simulation.
    pub struct GateId;

    /// Identifies a registered (connected) wire instance in the simulation.
    pub struct WireId;
}

/// Identifies a gate template in a catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

/// Addresses one pin of a placed gate: the owning gate plus the pin's index
/// into the template's ordered pin list.
///
/// A `PinRef` is a non-owning handle. When the gate has been removed, the
/// handle resolves to `None` through the simulation's accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinRef {
    pub gate: GateId,
    pub pin: usize,
}

impl PinRef {
    pub const fn new(gate: GateId, pin: usize) -> Self {
        Self { gate, pin }
    }
}
