//! Static gate descriptions: pin templates, gate templates, and the
//! immutable template catalog the host builds once at startup.
//!
//! A [`GateTemplate`] is a behavior record, not a subclass: the logic and
//! mouse hooks are plain function pointers dispatched with a single indirect
//! call. Placed instances ([`crate::gate::Gate`]) share templates through
//! `Arc` and hold all mutable state themselves.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::Simulation;
use crate::gate::PinAccess;
use crate::geom::{Point, Size};
use crate::id::{GateId, TemplateId};

// ---------------------------------------------------------------------------
// Pin templates
// ---------------------------------------------------------------------------

/// Which way a pin faces. A wire must join one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

/// Immutable description of one connection point on a gate template.
#[derive(Debug, Clone)]
pub struct PinTemplate {
    /// Display label, cosmetic only.
    pub label: String,
    pub direction: Direction,
    /// When true, a state change delivered to this pin during the wire phase
    /// enqueues the owning gate for recomputation.
    pub causes_update: bool,
    /// Offset from the owning gate's origin.
    pub offset: Point,
}

impl PinTemplate {
    pub fn new(label: &str, direction: Direction, causes_update: bool, offset: Point) -> Self {
        Self {
            label: label.to_string(),
            direction,
            causes_update,
            offset,
        }
    }
}

// ---------------------------------------------------------------------------
// Behavior hooks
// ---------------------------------------------------------------------------

/// A template's logic function: reads input pin states and writes output pin
/// states through [`PinAccess::set_state`].
///
/// Must be a pure function of the current input states and idempotent --
/// running it twice with unchanged inputs must not change outputs. The
/// engine invokes it exactly once per queued gate per tick, never
/// re-entrantly within a phase.
pub type LogicFn = fn(&mut PinAccess<'_>);

/// A pointer-event hook on a placed instance. The host routes its own mouse
/// events to [`Simulation::mouse_clicked`] and friends; the hook body runs
/// against the engine so interactive sources (switches, buttons) can drive
/// their output pins.
pub type MouseHook = fn(&mut Simulation, GateId);

// ---------------------------------------------------------------------------
// Gate templates
// ---------------------------------------------------------------------------

/// Immutable description of a component kind: name, bounding size, ordered
/// pin layout, and behavior hooks. Shared by every placed instance.
#[derive(Debug, Clone)]
pub struct GateTemplate {
    name: String,
    description: Option<String>,
    size: Size,
    pins: Vec<PinTemplate>,
    logic: Option<LogicFn>,
    on_mouse_clicked: Option<MouseHook>,
    on_mouse_pressed: Option<MouseHook>,
    on_mouse_released: Option<MouseHook>,
}

impl GateTemplate {
    pub fn new(name: &str, size: Size, pins: Vec<PinTemplate>) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            size,
            pins,
            logic: None,
            on_mouse_clicked: None,
            on_mouse_pressed: None,
            on_mouse_released: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_logic(mut self, logic: LogicFn) -> Self {
        self.logic = Some(logic);
        self
    }

    pub fn with_mouse_clicked(mut self, hook: MouseHook) -> Self {
        self.on_mouse_clicked = Some(hook);
        self
    }

    pub fn with_mouse_pressed(mut self, hook: MouseHook) -> Self {
        self.on_mouse_pressed = Some(hook);
        self
    }

    pub fn with_mouse_released(mut self, hook: MouseHook) -> Self {
        self.on_mouse_released = Some(hook);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn pins(&self) -> &[PinTemplate] {
        &self.pins
    }

    pub fn logic(&self) -> Option<LogicFn> {
        self.logic
    }

    pub fn on_mouse_clicked(&self) -> Option<MouseHook> {
        self.on_mouse_clicked
    }

    pub fn on_mouse_pressed(&self) -> Option<MouseHook> {
        self.on_mouse_pressed
    }

    pub fn on_mouse_released(&self) -> Option<MouseHook> {
        self.on_mouse_released
    }
}

// ---------------------------------------------------------------------------
// Template registry
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate template name: {0}")]
    DuplicateTemplate(String),
    #[error("pin {pin} of template {template} lies outside its bounding box")]
    PinOffsetOutOfBounds { template: String, pin: usize },
}

/// Builder for an immutable [`TemplateRegistry`].
/// Register templates under named containers, then freeze with `build()`.
#[derive(Debug, Default)]
pub struct TemplateRegistryBuilder {
    templates: Vec<Arc<GateTemplate>>,
    containers: Vec<(String, Vec<TemplateId>)>,
}

impl TemplateRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty container. Containers keep registration order and exist
    /// purely for UI presentation. Idempotent.
    pub fn add_container(&mut self, key: &str) {
        if !self.containers.iter().any(|(k, _)| k == key) {
            self.containers.push((key.to_string(), Vec::new()));
        }
    }

    /// Register a template under a container, creating the container if it
    /// does not exist yet. Returns the template's id.
    pub fn register(&mut self, container: &str, template: GateTemplate) -> TemplateId {
        let id = TemplateId(self.templates.len() as u32);
        self.templates.push(Arc::new(template));
        self.add_container(container);
        if let Some((_, members)) = self.containers.iter_mut().find(|(k, _)| k == container) {
            members.push(id);
        }
        id
    }

    /// Validate and freeze. Rejects duplicate names and pin offsets outside
    /// the template's bounding box (offsets may lie on the boundary).
    pub fn build(self) -> Result<TemplateRegistry, CatalogError> {
        let mut name_to_id = HashMap::new();
        for (index, template) in self.templates.iter().enumerate() {
            let id = TemplateId(index as u32);
            if name_to_id
                .insert(template.name().to_string(), id)
                .is_some()
            {
                return Err(CatalogError::DuplicateTemplate(template.name().to_string()));
            }

            let size = template.size();
            for (pin, pt) in template.pins().iter().enumerate() {
                let off = pt.offset;
                if off.x < 0 || off.x > size.width || off.y < 0 || off.y > size.height {
                    return Err(CatalogError::PinOffsetOutOfBounds {
                        template: template.name().to_string(),
                        pin,
                    });
                }
            }
        }

        Ok(TemplateRegistry {
            templates: self.templates,
            name_to_id,
            containers: self.containers,
        })
    }
}

/// Immutable template catalog. Frozen after build; the engine only ever
/// reads `Arc<GateTemplate>` handles out of it.
#[derive(Debug)]
pub struct TemplateRegistry {
    templates: Vec<Arc<GateTemplate>>,
    name_to_id: HashMap<String, TemplateId>,
    containers: Vec<(String, Vec<TemplateId>)>,
}

impl TemplateRegistry {
    pub fn get(&self, id: TemplateId) -> Option<&Arc<GateTemplate>> {
        self.templates.get(id.0 as usize)
    }

    pub fn template_id(&self, name: &str) -> Option<TemplateId> {
        self.name_to_id.get(name).copied()
    }

    /// Convenience lookup by name.
    pub fn by_name(&self, name: &str) -> Option<&Arc<GateTemplate>> {
        self.template_id(name).and_then(|id| self.get(id))
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Containers in registration order, each with its member template ids.
    pub fn containers(&self) -> impl Iterator<Item = (&str, &[TemplateId])> {
        self.containers
            .iter()
            .map(|(key, members)| (key.as_str(), members.as_slice()))
    }

    pub fn container(&self, key: &str) -> Option<&[TemplateId]> {
        self.containers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, members)| members.as_slice())
    }
}
