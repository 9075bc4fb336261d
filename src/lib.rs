//! # A* Lattice LSH
//!
//! Locality-sensitive hashing on the A* lattice.
//!
//! Vectors are quantised to points of the A*_n lattice, the densest known
//! covering lattice in low dimensions. Nearby vectors land on the same or on
//! adjacent lattice points, so lattice point hash codes can be used as
//! buckets for approximate nearest-neighbour search.
//!
//! ## Queries
//!
//! - **Nearest** - the single lattice point closest to a vector
//! - **Delaunay** - the `dim + 1` vertices of the simplex containing it
//! - **Extended** - the Delaunay vertices plus up to 30 shells of
//!   neighbouring lattice points, closest shells first
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        A* LSH                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CORE (pure math, no I/O)                                   │
//! │    Transforms, Decoder, Delaunay cell, Probes, Hash         │
//! │                                                              │
//! │  PORTS (trait contracts)                                     │
//! │    ProbeVisitor, IndexVisitor                               │
//! │                                                              │
//! │  ADAPTERS (swappable implementations)                       │
//! │    Storage: RecordStore                                     │
//! │    Index: LatticeIndex                                      │
//! │    API: Python bindings                                      │
//! │                                                              │
//! │  ENGINE (orchestration)                                      │
//! │    AStarLattice - the decoder                               │
//! │    LshStore - the nearest-neighbour store                   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use astar_lsh::{AStarLattice, LshStore};
//!
//! // 2 dimensions, packing radius 1, one extended shell
//! let lattice = AStarLattice::new(2, 1.0, 1).unwrap();
//! let point = lattice.nearest_cvector(&[6.1, -0.2]).unwrap();
//! assert_eq!((point.k, point.c), (2, vec![1, -1, -2]));
//!
//! // Store records and find the closest one
//! let mut store = LshStore::new(3, 1.0, 2).unwrap();
//! store.insert(vec![6.1, -0.2, 0.8], "a").unwrap();
//! let hit = store.query(&[6.1, -0.25, 0.8]).unwrap().unwrap();
//! assert_eq!(*hit.payload, "a");
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Core domain - pure lattice math, no I/O
/// Contains: transforms, decoder, Delaunay cell, probes, hash, config, errors
pub mod core;

/// Port definitions - trait contracts for visitors
/// Contains: ProbeVisitor, IndexVisitor
pub mod ports;

/// Adapter implementations - swappable components
/// Contains: storage, index, python submodules
pub mod adapters;

/// Engine - orchestration layer
/// Contains: AStarLattice, LshStore
pub mod engine;

// ============================================================================
// PYTHON BINDINGS (when enabled)
// ============================================================================

#[cfg(feature = "python")]
pub use adapters::python::*;

// ============================================================================
// RE-EXPORTS (public API)
// ============================================================================

// Core types
pub use crate::core::{
    CVector, Coord, ElementId, HashCode, LatticePoint, OwnedProbe, Probe, MAX_LATTICE_COORD,
    MAX_NUM_SHELLS,
};
pub use crate::core::config::LatticeConfig;
pub use crate::core::error::{LatticeError, LatticeResult};

// Port traits
pub use crate::ports::{IndexVisitor, ProbeVisitor};

// Adapters
pub use crate::adapters::index::LatticeIndex;
pub use crate::adapters::storage::RecordStore;

// Engine
pub use crate::engine::{AStarLattice, LshStore, MatchStrategy, Neighbour};
