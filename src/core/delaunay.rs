//! # Delaunay Cell
//!
//! Locates the Delaunay cell (a simplex of `dim + 1` lattice points, one per
//! remainder value) that contains a vector of the representation space.
//!
//! The cell is described by its remainder-0 vertex and a coordinate
//! ordering. Vertex k is vertex k-1 with coordinate `order[k-1]` of its
//! c-vector decremented.

use std::cmp::Ordering;

use super::decoder::round_up;
use super::error::{check_coords, LatticeError, LatticeResult};
use super::transform::cvector_and_permutation_to_hole;
use super::{CVector, Coord, LatticePoint, MAX_LATTICE_COORD};

/// The remainder-0 vertex of a Delaunay cell plus the ordering that
/// generates the other vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct DelaunayCell {
    /// c-vector of the remainder-0 vertex
    pub c: CVector,
    /// Permutation of `0..=dim`
    pub order: Vec<usize>,
    /// Residuals `v[i] - c[i]*(dim+1)`, non-decreasing along `order`
    pub xmod: Vec<f64>,
}

impl DelaunayCell {
    pub fn dim(&self) -> usize {
        self.c.len() - 1
    }

    /// The `dim + 1` vertices, in remainder order.
    pub fn vertices(&self) -> Vec<LatticePoint> {
        let mut c = self.c.clone();
        let mut out = Vec::with_capacity(c.len());
        out.push(LatticePoint::new(0, c.clone()));
        for (k, &idx) in self.order[..self.dim()].iter().enumerate() {
            c[idx] -= 1;
            out.push(LatticePoint::new(k + 1, c.clone()));
        }
        out
    }

    /// Centroid of the cell in l-vector coordinates.
    pub fn hole(&self) -> LatticeResult<Vec<f64>> {
        cvector_and_permutation_to_hole(&self.c, &self.order)
    }
}

/// Locate the Delaunay cell containing `v` (length `dim + 1`) by finding
/// its remainder-0 vertex.
pub fn nearest_remainder_zero(v: &[f64]) -> LatticeResult<DelaunayCell> {
    if v.len() < 2 {
        return Err(LatticeError::ZeroDimension);
    }
    check_coords(v, MAX_LATTICE_COORD)?;
    let dimp = v.len();
    let mut cell = DelaunayCell {
        c: vec![0; dimp],
        order: vec![0; dimp],
        xmod: vec![0.0; dimp],
    };
    locate_into(v, &mut cell.c, &mut cell.xmod, &mut cell.order);
    Ok(cell)
}

/// Find the remainder-0 vertex and vertex ordering for `v`.
///
/// All four slices have length `dim + 1`. Coordinates of `v` are within
/// [`MAX_LATTICE_COORD`].
pub(crate) fn locate_into(v: &[f64], c: &mut [Coord], xmod: &mut [f64], order: &mut [usize]) {
    let dimp = v.len();
    let dimp_f = dimp as f64;

    let mut h: Coord = 0;
    for i in 0..dimp {
        let cx = round_up(v[i] / dimp_f);
        c[i] = cx;
        xmod[i] = v[i] - cx as f64 * dimp_f;
        h += cx;
    }

    let mut sorted: Vec<usize> = (0..dimp).collect();
    sort_order(xmod, &mut sorted);

    // Shift the rounding of |h| coordinates so that sum(c) = 0
    match h.cmp(&0) {
        Ordering::Equal => order.copy_from_slice(&sorted),
        Ordering::Greater => {
            let h = (h as usize).min(dimp);
            for &idx in &sorted[..h] {
                c[idx] -= 1;
                xmod[idx] += dimp_f;
            }
            let part = dimp - h;
            order[..part].copy_from_slice(&sorted[h..]);
            order[part..].copy_from_slice(&sorted[..h]);
        }
        Ordering::Less => {
            let part = dimp.saturating_sub(h.unsigned_abs() as usize);
            for &idx in &sorted[part..] {
                c[idx] += 1;
                xmod[idx] -= dimp_f;
            }
            let tail = dimp - part;
            order[..tail].copy_from_slice(&sorted[part..]);
            order[tail..].copy_from_slice(&sorted[..part]);
        }
    }
}

/// Arrays this short are insertion sorted.
const INSERTION_SORT_THRESHOLD: usize = 6;

/// Swap `ord[a]` and `ord[b]` if needed so that `val[ord[a]] >= val[ord[b]]`.
#[inline]
fn swap_less(val: &[f64], ord: &mut [usize], a: usize, b: usize) {
    if val[ord[a]] < val[ord[b]] {
        ord.swap(a, b);
    }
}

fn insertion_sort_order(val: &[f64], ord: &mut [usize]) {
    for i in 1..ord.len() {
        let o = ord[i];
        let x = val[o];
        let mut j = i;
        while j > 0 && x < val[ord[j - 1]] {
            ord[j] = ord[j - 1];
            j -= 1;
        }
        ord[j] = o;
    }
}

/// Permute `ord` so that `val[ord[..]]` is ascending.
///
/// Median-of-three quicksort that recurses on the smaller partition and
/// loops on the larger one. Not stable: for more than
/// [`INSERTION_SORT_THRESHOLD`] entries the order of equal values depends on
/// the pivot sequence, and that order picks the Delaunay cell for inputs
/// with tied residuals.
pub(crate) fn sort_order(val: &[f64], ord: &mut [usize]) {
    let (mut lo, mut hi) = (0, ord.len());

    loop {
        let size = hi - lo;
        if size <= INSERTION_SORT_THRESHOLD {
            insertion_sort_order(val, &mut ord[lo..hi]);
            return;
        }

        // median at lo, smallest of the three at lo + 1, largest at last
        let last = hi - 1;
        let med = lo + size / 2;
        swap_less(val, ord, last, med);
        swap_less(val, ord, last, lo);
        swap_less(val, ord, lo, med);
        ord.swap(med, lo + 1);

        let pivot = val[ord[lo]];
        let mut l = lo + 1;
        let mut r = last;
        loop {
            l += 1;
            while val[ord[l]] < pivot {
                l += 1;
            }
            r -= 1;
            while pivot < val[ord[r]] {
                r -= 1;
            }
            if l >= r {
                if l == r {
                    l += 1;
                    r -= 1;
                }
                break;
            }
            ord.swap(l, r);
        }
        ord.swap(l - 1, lo);

        let num_left = l - (lo + 1);
        let num_right = last - r;
        let right_lo = hi - num_right;

        match (num_left, num_right) {
            (0, 0) => return,
            (0, _) => lo = right_lo,
            (_, 0) => hi = lo + num_left,
            _ if num_left > num_right => {
                sort_order(val, &mut ord[right_lo..hi]);
                hi = lo + num_left;
            }
            _ => {
                sort_order(val, &mut ord[lo..lo + num_left]);
                lo = right_lo;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoder::closest_point;
    use crate::core::transform::k_from_c;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_rep(rng: &mut StdRng, dim: usize, spread: f64) -> Vec<f64> {
        let mut v: Vec<f64> = (0..=dim).map(|_| rng.gen_range(-spread..spread)).collect();
        let mean = v.iter().sum::<f64>() / (dim + 1) as f64;
        v.iter_mut().for_each(|x| *x -= mean);
        v
    }

    #[test]
    fn test_cell_shape() {
        let mut rng = StdRng::seed_from_u64(21);
        for dim in 1..9 {
            for _ in 0..200 {
                let v = random_rep(&mut rng, dim, 40.0);
                let cell = nearest_remainder_zero(&v).unwrap();

                assert_eq!(cell.c.iter().sum::<Coord>(), 0);

                let mut seen = cell.order.clone();
                seen.sort_unstable();
                assert_eq!(seen, (0..=dim).collect::<Vec<_>>());

                for pair in cell.order.windows(2) {
                    assert!(cell.xmod[pair[0]] <= cell.xmod[pair[1]]);
                }

                let vertices = cell.vertices();
                assert_eq!(vertices.len(), dim + 1);
                for (k, vertex) in vertices.iter().enumerate() {
                    assert_eq!(vertex.k, k);
                    assert_eq!(k_from_c(&vertex.c).unwrap(), k as Coord);
                }
            }
        }
    }

    #[test]
    fn test_nearest_point_is_a_vertex() {
        let mut rng = StdRng::seed_from_u64(22);
        for dim in 1..9 {
            for _ in 0..200 {
                let v = random_rep(&mut rng, dim, 40.0);
                let nearest = closest_point(&v).unwrap();
                let cell = nearest_remainder_zero(&v).unwrap();
                assert!(cell.vertices().contains(&nearest));
            }
        }
    }

    #[test]
    fn test_hole_of_origin_cell() {
        // a vector just off the origin lies in a cell through the origin
        let cell = nearest_remainder_zero(&[0.3, -0.1, -0.2]).unwrap();
        let mut hole = cell.hole().unwrap();
        hole.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let doubled: Vec<f64> = hole.iter().map(|h| h * 2.0).collect();
        assert_eq!(doubled, vec![-2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_sort_order_ascending() {
        let mut rng = StdRng::seed_from_u64(23);
        for len in 1..40 {
            for _ in 0..100 {
                // few distinct values so ties are frequent
                let val: Vec<f64> = (0..len).map(|_| rng.gen_range(-3..3) as f64 * 0.5).collect();
                let mut ord: Vec<usize> = (0..len).collect();
                sort_order(&val, &mut ord);

                for pair in ord.windows(2) {
                    assert!(val[pair[0]] <= val[pair[1]]);
                }
                let mut seen = ord.clone();
                seen.sort_unstable();
                assert_eq!(seen, (0..len).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_sort_order_ties() {
        // short arrays keep index order
        let mut ord: Vec<usize> = (0..6).collect();
        sort_order(&[0.0; 6], &mut ord);
        assert_eq!(ord, vec![0, 1, 2, 3, 4, 5]);

        // longer ones follow the pivot sequence
        let mut ord: Vec<usize> = (0..7).collect();
        sort_order(&[0.0; 7], &mut ord);
        assert_eq!(ord, vec![4, 3, 5, 0, 1, 2, 6]);
    }

    #[test]
    fn test_zero_vector_cell_dim6() {
        let cell = nearest_remainder_zero(&[0.0; 7]).unwrap();
        assert_eq!(cell.c, vec![0; 7]);
        assert_eq!(cell.order, vec![4, 3, 5, 0, 1, 2, 6]);
        assert_eq!(cell.vertices()[1].c, vec![0, 0, 0, 0, -1, 0, 0]);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            nearest_remainder_zero(&[1e300, 0.0, -1e300]),
            Err(LatticeError::CoordinateOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            nearest_remainder_zero(&[0.0, f64::NAN, 0.0]),
            Err(LatticeError::CoordinateOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(nearest_remainder_zero(&[]), Err(LatticeError::ZeroDimension));
    }
}
