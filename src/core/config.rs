//! # Lattice Configuration
//!
//! The three numbers that fix a decoder: dimensionality, packing radius
//! and number of extended shells.

use serde::{Deserialize, Serialize};

use super::error::{LatticeError, LatticeResult};
use super::MAX_NUM_SHELLS;

/// Configuration for an A* lattice decoder, index or store.
///
/// # Example
/// ```
/// use astar_lsh::LatticeConfig;
///
/// let config = LatticeConfig::new(8).with_packing_radius(0.5).with_num_shells(3);
/// assert_eq!(config.dim, 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatticeConfig {
    /// Dimensionality of the quantisation space (n).
    /// Must be positive.
    pub dim: usize,

    /// Radius of the largest sphere inside a Voronoi cell, in the units of
    /// the caller's vectors. Must be positive and finite.
    pub packing_radius: f64,

    /// Number of shells probed beyond the Delaunay cell by extended queries.
    /// At most `MAX_NUM_SHELLS`.
    pub num_shells: u32,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            dim: 2,
            packing_radius: 1.0,
            num_shells: 1,
        }
    }
}

impl LatticeConfig {
    /// Create a config with the given dimensionality and default radius
    /// and shell count.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Default::default()
        }
    }

    /// Set the packing radius
    pub fn with_packing_radius(mut self, packing_radius: f64) -> Self {
        self.packing_radius = packing_radius;
        self
    }

    /// Set the number of extended shells
    pub fn with_num_shells(mut self, num_shells: u32) -> Self {
        self.num_shells = num_shells;
        self
    }

    /// Check every field. Dimensionality is checked first, then the shell
    /// count, then the packing radius.
    pub fn validate(&self) -> LatticeResult<()> {
        if self.dim == 0 {
            return Err(LatticeError::ZeroDimension);
        }
        if self.num_shells > MAX_NUM_SHELLS {
            return Err(LatticeError::InvalidShellCount {
                requested: self.num_shells,
                max: MAX_NUM_SHELLS,
            });
        }
        // NaN fails this comparison too
        if !(self.packing_radius > 0.0 && self.packing_radius.is_finite()) {
            return Err(LatticeError::InvalidPackingRadius(self.packing_radius));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LatticeConfig::default();
        assert_eq!(config.dim, 2);
        assert_eq!(config.packing_radius, 1.0);
        assert_eq!(config.num_shells, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shell_boundary() {
        assert!(LatticeConfig::new(1).with_num_shells(30).validate().is_ok());
        assert_eq!(
            LatticeConfig::new(1).with_num_shells(31).validate(),
            Err(LatticeError::InvalidShellCount { requested: 31, max: 30 })
        );
    }

    #[test]
    fn test_bad_packing_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = LatticeConfig::new(1).with_packing_radius(radius).validate();
            assert!(matches!(result, Err(LatticeError::InvalidPackingRadius(_))));
        }
    }

    #[test]
    fn test_zero_dim() {
        assert_eq!(LatticeConfig::new(0).validate(), Err(LatticeError::ZeroDimension));
    }

    #[test]
    fn test_validation_order() {
        // dim is reported before the other problems
        let config = LatticeConfig {
            dim: 0,
            packing_radius: -1.0,
            num_shells: 99,
        };
        assert_eq!(config.validate(), Err(LatticeError::ZeroDimension));

        let config = LatticeConfig {
            dim: 3,
            packing_radius: -1.0,
            num_shells: 99,
        };
        assert!(matches!(config.validate(), Err(LatticeError::InvalidShellCount { .. })));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = LatticeConfig::new(32).with_packing_radius(2.5).with_num_shells(4);
        let json = serde_json::to_string(&config).unwrap();
        let back: LatticeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
