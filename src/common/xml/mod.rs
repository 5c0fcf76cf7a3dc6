//! XML helpers shared by the exporters.

pub mod escape;

pub use escape::{escape_attribute, escape_text};
