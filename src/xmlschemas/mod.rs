//! Provide methods and data structures for atomic simple types derived by
//! restriction, and for validating values against them.
//!
//! A [`XmlSchemaSimpleType`] combines a primitive base type with constraining
//! facets. [`XmlSchemaValidCtxt`] validates values against such a type and
//! forwards every failure to the error handlers in [`crate::globals`].

pub mod context;
pub mod items;

pub use context::{XmlSchemaValidCtxt, XmlSchemaValidOption};
pub use items::XmlSchemaSimpleType;
