//! Element types: per-field validation and formatting.
//!
//! The [`ElementType`] trait is the polymorphism point for field kinds; the
//! [`ElementTypeRegistry`] resolves a form element's type slug to its
//! implementation, falling back to a no-op placeholder for slugs that no
//! longer resolve. [`default_registry`] carries all built-in types.

mod common;
mod element_type;
mod registry;
pub mod variants;

pub use element_type::{ElementType, ExportFormat};
pub use registry::{ElementTypeRegistry, default_registry};
