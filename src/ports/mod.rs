//! # Ports
//!
//! Trait contracts between the lattice queries and their callers.
//!
//! Queries that enumerate several candidates report them one at a time to a
//! visitor, synchronously and in order. A visitor stops the enumeration by
//! returning `Err(code)`; the query then returns
//! [`LatticeError::CallbackAborted`](crate::core::LatticeError::CallbackAborted)
//! carrying that code and no further candidates are visited.
//!
//! Both traits are implemented for closures, so most callers never name
//! them:
//!
//! ```
//! use astar_lsh::{AStarLattice, Probe};
//!
//! let lattice = AStarLattice::new(2, 1.0, 1).unwrap();
//! let mut ks = Vec::new();
//! lattice
//!     .delaunay_visit(&[10.1, -0.2], |probe: Probe<'_>| -> Result<(), i32> {
//!         ks.push(probe.k);
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(ks, vec![0, 1, 2]);
//! ```

use crate::core::{ElementId, HashCode, Probe};

/// Receives the candidate lattice points of a query.
pub trait ProbeVisitor {
    /// Called once per candidate. `probe.c` is only valid during the call.
    fn visit(&mut self, probe: Probe<'_>) -> Result<(), i32>;
}

impl<F> ProbeVisitor for F
where
    F: FnMut(Probe<'_>) -> Result<(), i32>,
{
    fn visit(&mut self, probe: Probe<'_>) -> Result<(), i32> {
        self(probe)
    }
}

/// Receives the ids found in a lattice index, together with the hash code
/// of the bucket each one came from.
pub trait IndexVisitor {
    fn visit(&mut self, hash: HashCode, id: ElementId) -> Result<(), i32>;
}

impl<F> IndexVisitor for F
where
    F: FnMut(HashCode, ElementId) -> Result<(), i32>,
{
    fn visit(&mut self, hash: HashCode, id: ElementId) -> Result<(), i32> {
        self(hash, id)
    }
}
