//! # Lattice Point Hashing
//!
//! Polynomial hash of a c-vector in powers of 31, computed with wrapping
//! 64-bit arithmetic: `hash(c) = sum_i (c[i] as u64) * 31^i mod 2^64`.
//!
//! The remainder value k is not hashed. It is implied by the c-vector.

use super::{Coord, HashCode};

/// Base of the polynomial hash.
pub const RADIX: HashCode = 31;

/// Hash a c-vector.
#[inline]
pub fn hash_cvector(c: &[Coord]) -> HashCode {
    let mut hash: HashCode = 0;
    let mut mul: HashCode = 1;
    for &ci in c {
        hash = hash.wrapping_add((ci as HashCode).wrapping_mul(mul));
        mul = mul.wrapping_mul(RADIX);
    }
    hash
}

/// `RADIX^i` for `i` in `0..len`.
pub fn powers(len: usize) -> Vec<HashCode> {
    let mut out = Vec::with_capacity(len);
    let mut mul: HashCode = 1;
    for _ in 0..len {
        out.push(mul);
        mul = mul.wrapping_mul(RADIX);
    }
    out
}

/// Powers of RADIX permuted by `order`: `out[i] = RADIX^order[i]`.
///
/// Lets a query move coordinate `order[i]` by one and patch the hash with a
/// single addition.
pub fn ordered_powers(order: &[usize]) -> Vec<HashCode> {
    let p = powers(order.len());
    order.iter().map(|&o| p[o]).collect()
}
