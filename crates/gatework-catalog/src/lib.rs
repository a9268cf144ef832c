//! The standard component palette for the Gatework engine.
//!
//! Reproduces the classic starter set -- interactive sources, an indicator,
//! and the basic combinational gates -- grouped under named containers for
//! host palette UIs:
//!
//! - **Inputs**: Switch (latching), Button (momentary)
//! - **Outputs**: LED
//! - **Gates**: Diode, NOT, AND, OR, XOR
//!
//! [`standard_catalog`] builds the frozen [`TemplateRegistry`]; hosts that
//! want a different palette can assemble their own registry from the
//! individual template constructors in [`io`] and [`gates`].

pub mod gates;
pub mod io;

use gatework_core::template::{TemplateRegistry, TemplateRegistryBuilder};

pub const GROUP_INPUTS: &str = "Inputs";
pub const GROUP_OUTPUTS: &str = "Outputs";
pub const GROUP_GATES: &str = "Gates";

/// Build the standard palette registry.
pub fn standard_catalog() -> TemplateRegistry {
    let mut builder = TemplateRegistryBuilder::new();
    builder.add_container(GROUP_INPUTS);
    builder.add_container(GROUP_OUTPUTS);
    builder.add_container(GROUP_GATES);

    builder.register(GROUP_INPUTS, io::switch());
    builder.register(GROUP_INPUTS, io::button());
    builder.register(GROUP_OUTPUTS, io::led());
    builder.register(GROUP_GATES, gates::diode());
    builder.register(GROUP_GATES, gates::not_gate());
    builder.register(GROUP_GATES, gates::and_gate());
    builder.register(GROUP_GATES, gates::or_gate());
    builder.register(GROUP_GATES, gates::xor_gate());

    builder.build().expect("standard palette entries are valid")
}
