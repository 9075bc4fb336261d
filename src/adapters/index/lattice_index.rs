//! # Lattice Index
//!
//! Multimap from lattice point hash codes to ids.
//!
//! Ids are stored at the hash of the nearest lattice point of a vector.
//! Buckets keep insertion order and allow duplicates. A bucket exists only
//! while it holds at least one id.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::config::LatticeConfig;
use crate::core::error::{LatticeError, LatticeResult};
use crate::core::{ElementId, HashCode};
use crate::engine::AStarLattice;
use crate::ports::IndexVisitor;

/// In-memory lattice index
#[derive(Debug, Clone)]
pub struct LatticeIndex {
    /// Decoder used to hash vectors
    lattice: AStarLattice,

    /// Non-empty id lists keyed by hash code
    buckets: HashMap<HashCode, Vec<ElementId>>,

    /// Total ids across all buckets
    num_elements: usize,
}

impl LatticeIndex {
    pub fn new(dim: usize, packing_radius: f64, num_shells: u32) -> LatticeResult<Self> {
        Ok(Self::with_lattice(AStarLattice::new(dim, packing_radius, num_shells)?))
    }

    pub fn from_config(config: &LatticeConfig) -> LatticeResult<Self> {
        Ok(Self::with_lattice(AStarLattice::from_config(config)?))
    }

    /// Create an empty index around an existing decoder
    pub fn with_lattice(lattice: AStarLattice) -> Self {
        debug!(dim = lattice.dim(), num_probes = lattice.num_probes(), "Created lattice index");
        Self {
            lattice,
            buckets: HashMap::new(),
            num_elements: 0,
        }
    }

    pub fn lattice(&self) -> &AStarLattice {
        &self.lattice
    }

    pub fn dim(&self) -> usize {
        self.lattice.dim()
    }

    /// Hash code `vector` is stored under
    pub fn hash(&self, vector: &[f64]) -> LatticeResult<HashCode> {
        self.lattice.nearest_hash(vector)
    }

    // ========================================================================
    // INSERT
    // ========================================================================

    pub fn put(&mut self, vector: &[f64], id: ElementId) -> LatticeResult<()> {
        let hash = self.hash(vector)?;
        self.put_hash(hash, id)
    }

    pub fn put_all(&mut self, vector: &[f64], ids: &[ElementId]) -> LatticeResult<()> {
        let hash = self.hash(vector)?;
        self.put_all_hash(hash, ids)
    }

    pub fn put_hash(&mut self, hash: HashCode, id: ElementId) -> LatticeResult<()> {
        self.put_all_hash(hash, std::slice::from_ref(&id))
    }

    /// Append `ids` to the bucket for `hash`. Nothing changes if
    /// reservation fails or `ids` is empty.
    pub fn put_all_hash(&mut self, hash: HashCode, ids: &[ElementId]) -> LatticeResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        self.buckets
            .try_reserve(1)
            .map_err(|e| LatticeError::allocation("index buckets", e))?;
        let bucket = self.buckets.entry(hash).or_default();
        if let Err(e) = bucket.try_reserve(ids.len()) {
            if bucket.is_empty() {
                self.buckets.remove(&hash);
            }
            return Err(LatticeError::allocation("index bucket", e));
        }

        bucket.extend_from_slice(ids);
        self.num_elements += ids.len();
        trace!(hash, count = ids.len(), "Stored ids");
        Ok(())
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Ids stored at the nearest lattice point of `vector`, in insertion order
    pub fn get(&self, vector: &[f64]) -> LatticeResult<&[ElementId]> {
        Ok(self.get_hash(self.hash(vector)?))
    }

    pub fn count(&self, vector: &[f64]) -> LatticeResult<usize> {
        Ok(self.count_hash(self.hash(vector)?))
    }

    pub fn get_hash(&self, hash: HashCode) -> &[ElementId] {
        self.buckets.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_hash(&self, hash: HashCode) -> usize {
        self.buckets.get(&hash).map_or(0, Vec::len)
    }

    /// Ids stored at any extended probe of `vector`, in probe order
    pub fn get_extended(&self, vector: &[f64]) -> LatticeResult<Vec<ElementId>> {
        let mut out = Vec::new();
        self.lattice.run_extended(vector, |p| {
            out.extend_from_slice(self.get_hash(p.hash));
            Ok(())
        })?;
        Ok(out)
    }

    pub fn count_extended(&self, vector: &[f64]) -> LatticeResult<usize> {
        let mut count = 0;
        self.lattice.run_extended(vector, |p| {
            count += self.count_hash(p.hash);
            Ok(())
        })?;
        Ok(count)
    }

    /// Pass every id found by an extended query to `visitor`, stopping at
    /// the first error it returns.
    pub fn visit_extended<V: IndexVisitor>(&self, vector: &[f64], mut visitor: V) -> LatticeResult<()> {
        self.lattice.run_extended(vector, |p| {
            for &id in self.get_hash(p.hash) {
                visitor.visit(p.hash, id)?;
            }
            Ok(())
        })
    }

    // ========================================================================
    // CLEAR
    // ========================================================================

    pub fn clear(&mut self) {
        debug!(
            num_hashes = self.buckets.len(),
            num_elements = self.num_elements,
            "Clearing lattice index"
        );
        self.buckets.clear();
        self.num_elements = 0;
    }

    /// Remove the bucket for the nearest lattice point of `vector`
    pub fn clear_by_vector(&mut self, vector: &[f64]) -> LatticeResult<()> {
        let hash = self.hash(vector)?;
        self.clear_hash(hash);
        Ok(())
    }

    pub fn clear_hash(&mut self, hash: HashCode) {
        if let Some(bucket) = self.buckets.remove(&hash) {
            self.num_elements -= bucket.len();
        }
    }

    // ========================================================================
    // STATS
    // ========================================================================

    /// Number of non-empty buckets
    pub fn num_hashes(&self) -> usize {
        self.buckets.len()
    }

    /// Total ids across all buckets
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
