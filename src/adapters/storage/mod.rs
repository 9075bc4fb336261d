//! # Storage Adapters
//!
//! Record storage for the LSH store.
//!
//! Available adapters:
//! - `RecordStore` - in-memory parallel arrays of (vector, payload), dense ids

mod memory;

pub use memory::RecordStore;
