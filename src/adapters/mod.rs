//! # Adapters
//!
//! Components built on top of the decoder:
//! - Storage adapters: in-memory record storage
//! - Index adapters: lattice hash index
//! - Python bindings (when enabled)

pub mod storage;
pub mod index;

#[cfg(feature = "python")]
pub mod python;
