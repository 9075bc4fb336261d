//! # LSH Store
//!
//! Approximate nearest-neighbour store over (vector, payload) records.
//!
//! This struct wires together:
//! - Storage (`RecordStore`), which assigns dense ids
//! - Index (`LatticeIndex`), which files each id under the nearest lattice
//!   point of its vector
//!
//! Queries probe the extended shells around the query vector and rank the
//! records found there by Euclidean distance.

use tracing::{debug, trace};

use crate::adapters::index::LatticeIndex;
use crate::adapters::storage::RecordStore;
use crate::core::config::LatticeConfig;
use crate::core::error::LatticeResult;
use crate::core::ElementId;
use crate::engine::AStarLattice;

/// A record returned by [`LshStore::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour<'a, P> {
    pub id: ElementId,
    /// Euclidean distance from the query vector
    pub distance: f64,
    pub vector: &'a [f64],
    pub payload: &'a P,
}

/// Lattice LSH store
#[derive(Debug, Clone)]
pub struct LshStore<P> {
    /// Hash index of record ids
    index: LatticeIndex,

    /// Record storage
    records: RecordStore<P>,
}

impl<P> LshStore<P> {
    pub fn new(dim: usize, packing_radius: f64, num_shells: u32) -> LatticeResult<Self> {
        Ok(Self::with_lattice(AStarLattice::new(dim, packing_radius, num_shells)?))
    }

    pub fn from_config(config: &LatticeConfig) -> LatticeResult<Self> {
        Ok(Self::with_lattice(AStarLattice::from_config(config)?))
    }

    pub fn with_lattice(lattice: AStarLattice) -> Self {
        let records = RecordStore::new(lattice.dim());
        debug!(dim = lattice.dim(), num_shells = lattice.num_shells(), "Created LSH store");
        Self {
            index: LatticeIndex::with_lattice(lattice),
            records,
        }
    }

    pub fn lattice(&self) -> &AStarLattice {
        self.index.lattice()
    }

    pub fn dim(&self) -> usize {
        self.records.dim()
    }

    // ========================================================================
    // INSERT
    // ========================================================================

    /// Store a record and index it. Returns the new record's id.
    ///
    /// On error nothing is stored.
    pub fn insert(&mut self, vector: Vec<f64>, payload: P) -> LatticeResult<ElementId> {
        let hash = self.index.hash(&vector)?;
        let id = self.records.push(vector, payload)?;

        if let Err(e) = self.index.put_hash(hash, id) {
            // Rollback storage if index fails
            self.records.pop();
            return Err(e);
        }

        trace!(id, hash, "Inserted record");
        Ok(id)
    }

    // ========================================================================
    // QUERY
    // ========================================================================

    /// The closest stored record among the extended probes of `query`, or
    /// `None` if no probed bucket holds a record. Equal distances keep the
    /// first candidate in probe order.
    pub fn query(&self, query: &[f64]) -> LatticeResult<Option<Neighbour<'_, P>>> {
        let mut best: Option<Neighbour<'_, P>> = None;

        for id in self.index.get_extended(query)? {
            let Some((vector, payload)) = self.records.get(id) else {
                continue;
            };
            let distance = euclidean(query, vector);
            if best.as_ref().map_or(true, |b| distance < b.distance) {
                best = Some(Neighbour {
                    id,
                    distance,
                    vector,
                    payload,
                });
            }
        }

        Ok(best)
    }

    /// Every record found in the extended probes of `query`, in probe order
    pub fn candidates(&self, query: &[f64]) -> LatticeResult<Vec<(&[f64], &P)>> {
        Ok(self
            .index
            .get_extended(query)?
            .into_iter()
            .filter_map(|id| self.records.get(id))
            .collect())
    }

    /// Number of records in the extended probes of `query`
    pub fn count(&self, query: &[f64]) -> LatticeResult<usize> {
        self.index.count_extended(query)
    }

    pub fn get(&self, id: ElementId) -> Option<(&[f64], &P)> {
        self.records.get(id)
    }

    // ========================================================================
    // STATS
    // ========================================================================

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Same as [`Self::len`]
    pub fn num_inserts(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn num_hashes(&self) -> usize {
        self.index.num_hashes()
    }

    pub fn num_elements(&self) -> usize {
        self.index.num_elements()
    }

    /// Drop every record. Ids start from 0 again.
    pub fn clear(&mut self) {
        debug!(records = self.records.len(), "Clearing LSH store");
        self.index.clear();
        self.records.clear();
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
