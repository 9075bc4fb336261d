//! # Errors
//!
//! One error type for the whole crate. Construction problems, per-query
//! validation problems and visitor aborts all surface as a [`LatticeError`].

use thiserror::Error;

/// Errors raised by lattice decoding, probing and indexing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// A vector's length does not match the expected dimensionality.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    InvalidDimension {
        /// Expected number of coordinates (dim, or dim + 1 in lattice space)
        expected: usize,
        /// Number of coordinates supplied
        got: usize,
    },

    /// A lattice must have at least one dimension.
    #[error("Dimension must be positive")]
    ZeroDimension,

    /// A coordinate ordering was not a permutation of `0..=dim`.
    #[error("Invalid permutation of {len} coordinates")]
    InvalidPermutation {
        /// Number of coordinates the permutation should cover
        len: usize,
    },

    /// A coordinate was NaN, infinite or too large to decode.
    #[error("Coordinate {index} out of range: {value}")]
    CoordinateOutOfRange {
        /// Position of the offending coordinate
        index: usize,
        /// The value supplied
        value: f64,
    },

    /// Packing radius was zero, negative or not finite.
    #[error("Invalid packing radius: {0} (must be positive)")]
    InvalidPackingRadius(f64),

    /// More extended shells were requested than the probe table covers.
    #[error("Invalid shell count: {requested} (maximum is {max})")]
    InvalidShellCount {
        /// Requested number of shells
        requested: u32,
        /// Largest supported number of shells
        max: u32,
    },

    /// Growing an index or store failed.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// A caller-supplied visitor returned an error code; enumeration stopped.
    #[error("Callback aborted with code {0}")]
    CallbackAborted(i32),

    /// Probe generation produced a different number of remainder-zero
    /// probes than the reference table.
    #[error("Probe table mismatch: expected {expected} remainder-zero probes, generated {generated}")]
    ProbeTableMismatch {
        /// Count from the reference table
        expected: usize,
        /// Count actually generated
        generated: usize,
    },
}

impl LatticeError {
    /// Create an InvalidDimension error.
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::InvalidDimension { expected, got }
    }

    /// Create an AllocationFailure error from a failed reservation.
    pub fn allocation(what: &str, err: std::collections::TryReserveError) -> Self {
        Self::AllocationFailure(format!("{what}: {err}"))
    }
}

/// Result type for lattice operations
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Check that `v` has exactly `expected` coordinates.
#[inline]
pub(crate) fn check_len<T>(v: &[T], expected: usize) -> LatticeResult<()> {
    if v.len() == expected {
        Ok(())
    } else {
        Err(LatticeError::dimension_mismatch(expected, v.len()))
    }
}

/// Check that every coordinate of `v` is a number with magnitude at most
/// `limit`. NaN and infinities always fail.
#[inline]
pub(crate) fn check_coords(v: &[f64], limit: f64) -> LatticeResult<()> {
    match v.iter().position(|x| !(x.abs() <= limit)) {
        None => Ok(()),
        Some(index) => Err(LatticeError::CoordinateOutOfRange {
            index,
            value: v[index],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let errors = vec![
            (LatticeError::dimension_mismatch(3, 2), "Dimension mismatch: expected 3, got 2"),
            (LatticeError::ZeroDimension, "Dimension must be positive"),
            (
                LatticeError::InvalidPackingRadius(-1.0),
                "Invalid packing radius: -1 (must be positive)",
            ),
            (
                LatticeError::InvalidShellCount { requested: 31, max: 30 },
                "Invalid shell count: 31 (maximum is 30)",
            ),
            (LatticeError::CallbackAborted(7), "Callback aborted with code 7"),
            (
                LatticeError::CoordinateOutOfRange { index: 1, value: f64::INFINITY },
                "Coordinate 1 out of range: inf",
            ),
        ];

        for (err, msg) in errors {
            assert_eq!(err.to_string(), msg);
        }
    }

    #[test]
    fn test_check_coords() {
        assert!(check_coords(&[1.0, -2.0, 2.0], 2.0).is_ok());
        assert_eq!(
            check_coords(&[1.0, -2.5], 2.0),
            Err(LatticeError::CoordinateOutOfRange { index: 1, value: -2.5 })
        );
        assert!(matches!(
            check_coords(&[0.0, f64::NAN, 0.0], f64::MAX),
            Err(LatticeError::CoordinateOutOfRange { index: 1, .. })
        ));
        assert_eq!(
            check_coords(&[f64::NEG_INFINITY], f64::MAX),
            Err(LatticeError::CoordinateOutOfRange { index: 0, value: f64::NEG_INFINITY })
        );
    }

    #[test]
    fn test_check_len() {
        assert!(check_len(&[1.0, 2.0], 2).is_ok());
        assert_eq!(
            check_len(&[1.0], 2),
            Err(LatticeError::InvalidDimension { expected: 2, got: 1 })
        );
        assert_eq!(
            check_len::<f64>(&[], 2),
            Err(LatticeError::InvalidDimension { expected: 2, got: 0 })
        );
    }
}
