//! # Index Adapters
//!
//! Hash-keyed multimaps from lattice points to opaque ids.
//!
//! Available adapters:
//! - `LatticeIndex` - in-memory HashMap of id lists keyed by nearest
//!   lattice point hash

mod lattice_index;

pub use lattice_index::LatticeIndex;
