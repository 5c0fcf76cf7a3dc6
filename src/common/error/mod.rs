//! Unified error types for sketchx.
//!
//! This module provides a single error type covering every stage of the
//! extraction pipeline, from format sniffing to writing the output files.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
