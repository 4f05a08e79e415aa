//! Provenance text rendering using Handlebars.
//!
//! The destination cannot record who wrote an issue or comment, when, or why
//! it was closed. That information is rendered into bodies and notes from the
//! configured [`ProvenanceFormats`](crate::config::ProvenanceFormats).

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};
