//! # Coordinate Transforms
//!
//! Mappings between the spaces and encodings an A* lattice is described in.
//!
//! ## Spaces
//!
//! - **Quantisation space**: R^n, where caller vectors live.
//! - **Representation space**: the zero-sum hyperplane of R^(n+1), where
//!   lattice points have integer coordinates.
//!
//! ## Lattice point encodings
//!
//! ```text
//! z-vector  n integers      (compact form)
//! l-vector  n+1 integers    l[i] = (n+1)*c[i] + k
//! c-vector  n+1 integers    k = -sum(c)
//! k         0..=n           k = z[0] mod (n+1) = l[0] mod (n+1) = -sum(c)
//! ```
//!
//! All integer conversions are exact. Refs: Conway & Sloane, 1998, p 115;
//! Baek & Adams, 2009.

use super::error::{check_len, LatticeError, LatticeResult};
use super::{CVector, Coord};

/// Native packing radius of the n-dimensional A* lattice in the
/// representation space, with no scaling.
pub fn rho(dim: usize) -> f64 {
    let n = dim as f64;
    (n * (n + 1.0)).sqrt() / 2.0
}

fn require_dim(len: usize, min: usize) -> LatticeResult<()> {
    if len < min {
        Err(LatticeError::ZeroDimension)
    } else {
        Ok(())
    }
}

// ============================================================================
// QUANTISATION <-> REPRESENTATION SPACE
// ============================================================================

/// Embed an n-vector into the zero-sum hyperplane of R^(n+1), scaled.
///
/// `out` must hold `x.len() + 1` values. `x` must be non-empty.
pub(crate) fn to_lattice_space_into(scale: f64, x: &[f64], out: &mut [f64]) {
    let n = x.len();
    debug_assert!(n > 0 && out.len() == n + 1);

    let sum: f64 = x.iter().sum();
    let v_n = -sum / ((n as f64) + 1.0).sqrt();
    let t = (v_n + sum) / n as f64;

    for (o, xi) in out.iter_mut().zip(x) {
        *o = scale * (xi - t);
    }
    out[n] = scale * v_n;
}

/// Inverse of [`to_lattice_space_into`].
///
/// `out` must hold `v.len() - 1` values. `v` must have at least 2 values.
pub(crate) fn from_lattice_space_into(scale: f64, v: &[f64], out: &mut [f64]) {
    let n = v.len() - 1;
    debug_assert!(n > 0 && out.len() == n);

    let norm = ((n as f64) + 1.0).sqrt();
    let t = v[n] * (norm - n as f64 - 1.0) / n as f64 / norm;

    for (o, vi) in out.iter_mut().zip(&v[..n]) {
        *o = (vi + t) / scale;
    }
}

/// Map a vector from the quantisation space into the representation space,
/// multiplying by `scale`.
pub fn to_lattice_space(scale: f64, x: &[f64]) -> LatticeResult<Vec<f64>> {
    require_dim(x.len(), 1)?;
    let mut out = vec![0.0; x.len() + 1];
    to_lattice_space_into(scale, x, &mut out);
    Ok(out)
}

/// Map a vector from the representation space back to the quantisation
/// space, dividing by `scale`.
pub fn from_lattice_space(scale: f64, v: &[f64]) -> LatticeResult<Vec<f64>> {
    require_dim(v.len(), 2)?;
    let mut out = vec![0.0; v.len() - 1];
    from_lattice_space_into(scale, v, &mut out);
    Ok(out)
}

/// Embed x into the zero-sum hyperplane (unscaled).
///
/// `v[n] = -sum(x)/sqrt(n+1)` and `v[i] = x[i] - (v[n] + sum(x))/n`.
pub fn quant_to_rep(x: &[f64]) -> LatticeResult<Vec<f64>> {
    to_lattice_space(1.0, x)
}

/// Exact inverse of [`quant_to_rep`].
pub fn rep_to_quant(v: &[f64]) -> LatticeResult<Vec<f64>> {
    from_lattice_space(1.0, v)
}

// ============================================================================
// LATTICE POINT ENCODINGS
// ============================================================================

/// Remainder value of a z-vector: `z[0] mod (n+1)`.
pub fn k_from_z(z: &[Coord]) -> LatticeResult<Coord> {
    require_dim(z.len(), 1)?;
    Ok(z[0].rem_euclid(z.len() as Coord + 1))
}

/// Remainder value of an l-vector: `l[0] mod (n+1)`.
pub fn k_from_l(l: &[Coord]) -> LatticeResult<Coord> {
    require_dim(l.len(), 2)?;
    Ok(l[0].rem_euclid(l.len() as Coord))
}

/// Remainder value of a c-vector: `-sum(c)`.
pub fn k_from_c(c: &[Coord]) -> LatticeResult<Coord> {
    require_dim(c.len(), 2)?;
    Ok(-c.iter().sum::<Coord>())
}

pub fn z_to_l(z: &[Coord]) -> LatticeResult<CVector> {
    require_dim(z.len(), 1)?;
    let n = z.len();
    let np = n as Coord + 1;
    let sum: Coord = z.iter().sum();

    let mut l = vec![0; n + 1];
    l[0] = -(n as Coord) * z[0] + np * (sum - z[0]);
    for i in 1..n {
        l[i] = z[0] - np * z[i];
    }
    l[n] = z[0];
    Ok(l)
}

pub fn l_to_z(l: &[Coord]) -> LatticeResult<CVector> {
    require_dim(l.len(), 2)?;
    let n = l.len() - 1;
    let np = n as Coord + 1;
    let sum: Coord = l.iter().sum();

    let mut z = vec![0; n];
    z[0] = (n as Coord * l[n] - (sum - l[n])) / np;
    for i in 1..n {
        z[i] = (l[n] - l[i]) / np;
    }
    Ok(z)
}

pub fn z_to_c(z: &[Coord]) -> LatticeResult<CVector> {
    let k = k_from_z(z)?;
    let n = z.len();
    let np = n as Coord + 1;
    let sum: Coord = z.iter().sum();

    let mut c = vec![0; n + 1];
    c[0] = (-(n as Coord) * z[0] - k) / np + sum - z[0];
    c[n] = (z[0] - k) / np;
    for i in 1..n {
        c[i] = c[n] - z[i];
    }
    Ok(c)
}

pub fn c_to_z(c: &[Coord]) -> LatticeResult<CVector> {
    require_dim(c.len(), 2)?;
    let n = c.len() - 1;
    let sum: Coord = c.iter().sum();

    let mut z = vec![0; n];
    z[0] = (n as Coord + 1) * c[n] - sum;
    for i in 1..n {
        z[i] = c[n] - c[i];
    }
    Ok(z)
}

pub fn c_to_l(c: &[Coord]) -> LatticeResult<CVector> {
    let k = k_from_c(c)?;
    let np = c.len() as Coord;
    Ok(c.iter().map(|ci| np * ci + k).collect())
}

pub fn l_to_c(l: &[Coord]) -> LatticeResult<CVector> {
    let k = k_from_l(l)?;
    let np = l.len() as Coord;
    Ok(l.iter().map(|li| (li - k) / np).collect())
}

// ============================================================================
// HOLES AND LATTICE POINTS
// ============================================================================

/// The hole (centroid) of the Delaunay cell generated by a remainder-0
/// c-vector and a coordinate permutation, in l-vector coordinates:
/// `h[perm[i]] = c[perm[i]]*(n+1) - n/2 + i`.
pub fn cvector_and_permutation_to_hole(c: &[Coord], perm: &[usize]) -> LatticeResult<Vec<f64>> {
    require_dim(c.len(), 2)?;
    check_len(perm, c.len())?;

    let np = c.len();
    let mut seen = vec![false; np];
    for &p in perm {
        if p >= np || std::mem::replace(&mut seen[p], true) {
            return Err(LatticeError::InvalidPermutation { len: np });
        }
    }

    let half_n = (np - 1) as f64 / 2.0;
    let mut h = vec![0.0; np];
    for (i, &j) in perm.iter().enumerate() {
        h[j] = (c[j] * np as Coord) as f64 - half_n + i as f64;
    }
    Ok(h)
}

/// Write the representation-space coordinates of lattice point (c, k):
/// `out[i] = -(c[i]*(n+1) + k)`.
pub(crate) fn cvector_k_to_lattice_space_into(c: &[Coord], k: Coord, out: &mut [f64]) {
    let np = c.len() as Coord;
    for (o, ci) in out.iter_mut().zip(c) {
        *o = -(ci * np + k) as f64;
    }
}

/// Lattice point (c, k) in the (unscaled) representation space.
pub fn cvector_k_to_lattice_point_in_lattice_space(c: &[Coord], k: Coord) -> LatticeResult<Vec<f64>> {
    require_dim(c.len(), 2)?;
    let mut out = vec![0.0; c.len()];
    cvector_k_to_lattice_space_into(c, k, &mut out);
    Ok(out)
}

/// Lattice point with c-vector c in the (unscaled) representation space,
/// taking `k = -sum(c)`.
pub fn cvector_to_lattice_point_in_lattice_space(c: &[Coord]) -> LatticeResult<Vec<f64>> {
    let k = k_from_c(c)?;
    cvector_k_to_lattice_point_in_lattice_space(c, k)
}
