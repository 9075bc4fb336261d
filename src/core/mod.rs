//! # Core
//!
//! Pure lattice mathematics. No I/O, no shared state.
//!
//! The A* lattice of dimension n lives in the zero-sum hyperplane of
//! R^(n+1). Every lattice point has three integer encodings (z, l and c
//! vectors) and a remainder value k in `0..=n`. Queries are decoded to the
//! c-vector of a lattice point, then hashed.

pub mod config;
pub mod decoder;
pub mod delaunay;
pub mod error;
pub mod hash;
pub mod probes;
pub mod transform;

pub use config::LatticeConfig;
pub use error::{LatticeError, LatticeResult};

/// Integer type for lattice coordinates (z, l and c vectors).
pub type Coord = i64;

/// A c-vector: `dim + 1` integer coordinates of a lattice point.
pub type CVector = Vec<Coord>;

/// Hash code of a lattice point.
pub type HashCode = u64;

/// Opaque id stored in a lattice index.
pub type ElementId = u64;

/// Largest magnitude (2^52) of a representation-space coordinate that
/// decoding accepts. Integer c-vectors are exact in f64 below it, and sums
/// of rounded coordinates stay far from `Coord` overflow.
pub const MAX_LATTICE_COORD: f64 = 4_503_599_627_370_496.0;

/// Largest number of extended shells the probe table supports.
pub const MAX_NUM_SHELLS: u32 = 30;

/// A lattice point identified by its remainder value and c-vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LatticePoint {
    /// Remainder value, `k = -sum(c)`, in `0..=dim`
    pub k: usize,
    /// The `dim + 1` coordinates of the c-vector
    pub c: CVector,
}

impl LatticePoint {
    pub fn new(k: usize, c: CVector) -> Self {
        Self { k, c }
    }

    /// Dimensionality of the lattice this point belongs to.
    pub fn dim(&self) -> usize {
        self.c.len().saturating_sub(1)
    }
}

/// One probe reported by a query: the hash code, remainder value and
/// c-vector of a candidate lattice point.
///
/// The c-vector is borrowed from the query's working buffer and is only
/// valid for the duration of a visitor call. Use [`Probe::into_owned`] to
/// keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe<'a> {
    pub hash: HashCode,
    pub k: usize,
    pub c: &'a [Coord],
}

impl Probe<'_> {
    pub fn into_owned(self) -> OwnedProbe {
        OwnedProbe {
            hash: self.hash,
            k: self.k,
            c: self.c.to_vec(),
        }
    }
}

impl From<Probe<'_>> for OwnedProbe {
    fn from(probe: Probe<'_>) -> Self {
        probe.into_owned()
    }
}

/// An owned [`Probe`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnedProbe {
    pub hash: HashCode,
    pub k: usize,
    pub c: CVector,
}

impl OwnedProbe {
    pub fn as_probe(&self) -> Probe<'_> {
        Probe {
            hash: self.hash,
            k: self.k,
            c: &self.c,
        }
    }

    pub fn lattice_point(&self) -> LatticePoint {
        LatticePoint::new(self.k, self.c.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowed_into_owned() {
        let c = vec![1, -1, -2];
        let probe = Probe {
            hash: 18446744073709549664,
            k: 2,
            c: &c,
        };

        let owned = probe.into_owned();
        assert_eq!(owned.c, c);
        assert_eq!(owned.as_probe(), probe);
        assert_eq!(OwnedProbe::from(probe), owned);
        assert_eq!(owned.lattice_point(), LatticePoint::new(2, vec![1, -1, -2]));

        // `Probe` is `Copy`, so `to_owned` still yields a `Probe`
        let copied: Probe<'_> = probe.to_owned();
        assert_eq!(copied, probe);
    }
}
