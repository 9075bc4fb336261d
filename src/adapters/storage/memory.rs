//! # Memory Storage Adapter
//!
//! In-memory record storage using parallel arrays.
//! Fast, but volatile (data lost on shutdown).
//!
//! Ids are dense: the n-th record pushed gets id n, starting from 0.

use crate::core::error::{check_len, LatticeError, LatticeResult};
use crate::core::ElementId;

/// In-memory (vector, payload) storage
#[derive(Debug, Clone)]
pub struct RecordStore<P> {
    /// Expected dimensionality
    dim: usize,

    /// Stored vectors, indexed by id
    vectors: Vec<Vec<f64>>,

    /// Stored payloads, indexed by id
    payloads: Vec<P>,
}

impl<P> RecordStore<P> {
    /// Create an empty store for vectors of `dim` values
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Vec::new(),
            payloads: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Store a record and return its id
    pub fn push(&mut self, vector: Vec<f64>, payload: P) -> LatticeResult<ElementId> {
        check_len(&vector, self.dim)?;

        self.vectors
            .try_reserve(1)
            .map_err(|e| LatticeError::allocation("record vectors", e))?;
        self.payloads
            .try_reserve(1)
            .map_err(|e| LatticeError::allocation("record payloads", e))?;

        let id = self.vectors.len() as ElementId;
        self.vectors.push(vector);
        self.payloads.push(payload);
        Ok(id)
    }

    /// Remove the most recent record
    pub(crate) fn pop(&mut self) -> Option<(Vec<f64>, P)> {
        let vector = self.vectors.pop()?;
        let payload = self.payloads.pop()?;
        Some((vector, payload))
    }

    pub fn get(&self, id: ElementId) -> Option<(&[f64], &P)> {
        let i = usize::try_from(id).ok()?;
        Some((self.vectors.get(i)?.as_slice(), self.payloads.get(i)?))
    }

    pub fn vector(&self, id: ElementId) -> Option<&[f64]> {
        self.get(id).map(|(v, _)| v)
    }

    pub fn payload(&self, id: ElementId) -> Option<&P> {
        self.get(id).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Iterate over (id, vector, payload) in id order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &[f64], &P)> + '_ {
        self.vectors
            .iter()
            .zip(&self.payloads)
            .enumerate()
            .map(|(i, (v, p))| (i as ElementId, v.as_slice(), p))
    }

    /// Drop every record. Ids start from 0 again.
    pub fn clear(&mut self) {
        self.vectors.clear();
        self.payloads.clear();
    }
}
