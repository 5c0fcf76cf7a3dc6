//! Common types and utilities shared across the pipeline.

// Submodule declarations
pub mod detection;
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use detection::{ContainerFormat, classify};
pub use error::{Error, Result};
