//! # Engine
//!
//! The orchestration layer that wires everything together.
//!
//! This is where:
//! - Configuration is validated and the probe plan is generated
//! - The index and record storage are connected
//! - The decoder and store entry points are exposed

mod lattice;
mod store;

pub use lattice::{AStarLattice, MatchStrategy};
pub use store::{LshStore, Neighbour};
