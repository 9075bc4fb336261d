//! # Closest Point Decoder
//!
//! Finds the A* lattice point whose Voronoi cell contains a vector in the
//! representation space. A variation on Algorithm 2 of McKilliam, Clarkson,
//! Smith and Quinn, 2008: round, bucket-sort the residuals, then walk the
//! buckets to find how many coordinates to round up instead of down.
//!
//! Runs in O(n) with no sorting.

use super::error::{check_coords, LatticeError, LatticeResult};
use super::{Coord, LatticePoint, MAX_LATTICE_COORD};

const END: usize = usize::MAX;

/// `floor(x + 0.5)`. Exact halves round up, so -0.5 becomes 0 and -1.5
/// becomes -1.
#[inline]
pub fn round_up(x: f64) -> Coord {
    (x + 0.5).floor() as Coord
}

/// Decode `v` (length `dim + 1`) into `c`, returning the remainder value k.
///
/// `c` must be the same length as `v`.
pub(crate) fn closest_point_into(v: &[f64], c: &mut [Coord]) -> usize {
    let dimp = v.len();
    let dim = dimp - 1;
    let dimp_f = dimp as f64;
    debug_assert_eq!(c.len(), dimp);

    let mut z = vec![0.0; dimp];
    let mut link = vec![END; dimp];
    let mut bucket = vec![END; dimp];

    let mut sum: Coord = 0;
    let mut alpha = 0.0;
    let mut beta = 0.0;

    for i in 0..dimp {
        let y = v[i] / dimp_f;
        let rounded = round_up(y);
        let zi = y - rounded as f64; // in [-0.5, 0.5)

        sum += rounded;
        c[i] = rounded;
        z[i] = zi;
        alpha += zi;
        beta += zi * zi;

        // Bucket 0 holds the largest residuals
        let bin = (dimp_f * (zi + 0.5)) as usize;
        let ii = dim.saturating_sub(bin);
        link[i] = bucket[ii];
        bucket[ii] = i;
    }

    let mut best = beta * dimp_f - alpha * alpha;
    let mut m = None;

    for (b, &head) in bucket.iter().enumerate() {
        if head == END {
            continue;
        }
        let mut t = head;
        while t != END {
            alpha -= 1.0;
            beta = beta - 2.0 * z[t] + 1.0;
            t = link[t];
        }
        let d = beta * dimp_f - alpha * alpha;
        if d < best {
            best = d;
            m = Some(b);
        }
    }

    if let Some(m) = m {
        for &head in &bucket[..=m] {
            let mut t = head;
            while t != END {
                c[t] += 1;
                sum += 1;
                t = link[t];
            }
        }
    }

    let dimp_c = dimp as Coord;
    let k = (-sum).rem_euclid(dimp_c);
    let s_k = (sum + k) / dimp_c;
    for ci in c.iter_mut() {
        *ci -= s_k;
    }

    k as usize
}

/// Closest lattice point to `v`, a point of the representation space with
/// `dim + 1` coordinates.
pub fn closest_point(v: &[f64]) -> LatticeResult<LatticePoint> {
    if v.len() < 2 {
        return Err(LatticeError::ZeroDimension);
    }
    check_coords(v, MAX_LATTICE_COORD)?;
    let mut c = vec![0; v.len()];
    let k = closest_point_into(v, &mut c);
    Ok(LatticePoint::new(k, c))
}
