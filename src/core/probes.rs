//! # Probe Generation
//!
//! Extended multi-probe queries visit the Delaunay cell of a query plus
//! `num_shells` shells of lattice points around it. The probes are the same
//! for every query up to a coordinate permutation, so they are generated
//! once per lattice and stored as a [`ProbePlan`].
//!
//! ## Generation
//!
//! 1. Remainder-0 probes are enumerated shell by shell with a best-first
//!    search over integer moves (increment one coordinate, decrement
//!    another). A probe's cost is the negated shell distance, an integer
//!    proportional to its squared distance from the zeroth shell.
//! 2. Each remainder-0 probe expands into an orbit of `dim + 1` probes, one
//!    per remainder value.
//! 3. Every second orbit is reversed so that consecutive probes differ by
//!    few unit steps, and the plan stores those steps.
//!
//! The number of remainder-0 probes follows the [`PROBES_F`] table. Every
//! generation is checked against it.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use super::error::{LatticeError, LatticeResult};
use super::{CVector, Coord, MAX_NUM_SHELLS};

/// `PROBES_F[m][s - m]` with `m = min(dim, s)` is the number of remainder-0
/// probes within `s` extended shells of an n-dimensional lattice. The count
/// does not depend on n once n exceeds s.
///
/// Validated empirically for all s <= 10 and n <= 512.
pub const PROBES_F: [&[usize]; MAX_NUM_SHELLS as usize + 1] = [
    &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    &[2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31],
    &[4, 6, 7, 9, 10, 12, 14, 16, 18, 21, 23, 25, 26, 28, 30, 32, 34, 38, 40, 41, 43, 45, 47, 48, 50, 52, 56, 58, 60],
    &[7, 8, 11, 14, 17, 21, 25, 27, 29, 36, 39, 44, 50, 52, 56, 63, 66, 70, 77, 82, 90, 95, 99, 103, 111, 116, 122, 129],
    &[12, 14, 20, 25, 32, 37, 49, 55, 67, 73, 83, 94, 110, 117, 137, 152, 164, 176, 198, 208, 233, 245, 265, 283, 313, 323, 355],
    &[19, 24, 33, 43, 55, 67, 81, 101, 121, 142, 165, 189, 213, 245, 274, 309, 345, 389, 436, 474, 521, 570, 622, 677, 735, 794],
    &[30, 38, 53, 69, 90, 111, 139, 163, 207, 243, 292, 337, 400, 449, 523, 587, 672, 744, 849, 931, 1064, 1176, 1296, 1416, 1581],
    &[45, 59, 81, 107, 139, 176, 221, 268, 324, 399, 476, 565, 667, 778, 902, 1044, 1191, 1358, 1540, 1736, 1946, 2188, 2437, 2725],
    &[67, 88, 121, 159, 209, 265, 337, 414, 510, 609, 751, 890, 1067, 1247, 1475, 1704, 1992, 2276, 2633, 2976, 3406, 3816, 4335],
    &[97, 129, 175, 232, 303, 388, 494, 615, 762, 927, 1117, 1359, 1626, 1928, 2278, 2678, 3121, 3632, 4197, 4835, 5550, 6324],
    &[139, 184, 250, 329, 431, 552, 706, 882, 1102, 1350, 1647, 1977, 2407, 2859, 3411, 4016, 4736, 5513, 6448, 7438, 8620],
    &[195, 260, 349, 460, 600, 771, 984, 1237, 1547, 1910, 2342, 2840, 3423, 4128, 4928, 5852, 6912, 8128, 9507, 11085],
    &[272, 360, 482, 632, 824, 1056, 1350, 1697, 2129, 2635, 3247, 3956, 4803, 5760, 6948, 8268, 9828, 11585, 13653],
    &[373, 494, 656, 859, 1114, 1429, 1821, 2294, 2876, 3570, 4405, 5392, 6566, 7924, 9520, 11425, 13603, 16127],
    &[508, 669, 885, 1152, 1492, 1907, 2429, 3056, 3833, 4758, 5883, 7211, 8807, 10662, 12865, 15405, 18459],
    &[684, 899, 1180, 1533, 1975, 2522, 3202, 4028, 5043, 6266, 7744, 9508, 11622, 14108, 17057, 20501],
    &[915, 1195, 1563, 2019, 2595, 3302, 4185, 5253, 6573, 8157, 10083, 12379, 15145, 18401, 22288],
    &[1212, 1579, 2051, 2642, 3380, 4292, 5421, 6798, 8486, 10526, 12996, 15958, 19515, 23733],
    &[1597, 2068, 2676, 3430, 4375, 5535, 6977, 8726, 10877, 13469, 16617, 20384, 24924],
    &[2087, 2694, 3466, 4428, 5623, 7098, 8916, 11132, 13842, 17120, 21085, 25849],
    &[2714, 3485, 4466, 5679, 7191, 9044, 11333, 14112, 17515, 21618, 26592],
    &[3506, 4486, 5719, 7250, 9142, 11468, 14324, 17800, 22035, 27155],
    &[4508, 5740, 7292, 9204, 11571, 14466, 18023, 22335, 27594],
    &[5763, 7314, 9248, 11636, 14574, 18172, 22569, 27909],
    &[7338, 9271, 11682, 14642, 18285, 22725, 28154],
    &[9296, 11706, 14690, 18356, 22843, 28317],
    &[11732, 14715, 18406, 22917, 28440],
    &[14742, 18432, 22969, 28517],
    &[18460, 22996, 28571],
    &[23025, 28599],
    &[28629],
];

/// Number of remainder-0 probes for `num_shells` extended shells.
pub fn num_zero_probes(dim: usize, num_shells: u32) -> LatticeResult<usize> {
    if num_shells > MAX_NUM_SHELLS {
        return Err(LatticeError::InvalidShellCount {
            requested: num_shells,
            max: MAX_NUM_SHELLS,
        });
    }
    let s = num_shells as usize;
    let m = dim.min(s);
    Ok(PROBES_F[m][s - m])
}

/// Total number of probes an extended query reports.
pub fn num_probes(dim: usize, num_shells: u32) -> LatticeResult<usize> {
    Ok((dim + 1) * num_zero_probes(dim, num_shells)?)
}

/// Decode a move label into the pair of coordinates to change.
///
/// ```text
/// label  i  j
///   0    0  0
///   1    1  0
///   2    0  1
///   3    2  0
///   4    1  1
///   5    0  2
/// ```
fn move_for_label(label: usize) -> (usize, usize) {
    const ETA: f64 = 10e-6;
    let k = ((2.0 * label as f64 + 2.25).sqrt() - 1.5 - ETA).ceil() as usize;
    let l = k * (k + 3) / 2;
    let i = l - label;
    (i, k - i)
}

/// Keeps the `capacity` smallest distinct shell distances seen so far.
struct CostSet {
    capacity: usize,
    kept: BTreeSet<i64>,
}

impl CostSet {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            kept: BTreeSet::new(),
        }
    }

    /// Record `cost`. Returns true if it is among the kept smallest.
    fn push_unique_small(&mut self, cost: i64) -> bool {
        if self.kept.contains(&cost) {
            return true;
        }
        if self.kept.len() < self.capacity {
            self.kept.insert(cost);
            return true;
        }
        match self.kept.last() {
            Some(&largest) if cost < largest => {
                self.kept.remove(&largest);
                self.kept.insert(cost);
                true
            }
            _ => false,
        }
    }
}

/// A remainder-0 candidate waiting in the search queue.
struct Candidate {
    code: CVector,
    label: usize,
}

/// Binary max-heap keyed on cost.
///
/// `std::collections::BinaryHeap` does not fix the order of equal keys, and
/// the emission order of equal-cost probes is part of the plan, so the sift
/// rules are spelled out here.
struct CandidateQueue {
    heap: Vec<(i64, Candidate)>,
}

impl CandidateQueue {
    fn new() -> Self {
        Self { heap: Vec::new() }
    }

    fn push(&mut self, candidate: Candidate, priority: i64) {
        self.heap.push((priority, candidate));
        let mut i = self.heap.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].0 <= self.heap[parent].0 {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn pop(&mut self) -> Option<(i64, Candidate)> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        let len = self.heap.len();
        let mut i = 0;
        while 2 * i + 1 < len {
            let left = 2 * i + 1;
            let right = left + 1;
            let node = self.heap[i].0;
            let lp = self.heap[left].0;

            let swap_to = if right < len {
                let rp = self.heap[right].0;
                if lp >= rp && lp > node {
                    left
                } else if rp >= lp && rp > node {
                    right
                } else {
                    break;
                }
            } else if lp > node {
                left
            } else {
                break;
            };

            self.heap.swap(i, swap_to);
            i = swap_to;
        }
        Some(top)
    }
}

/// Enumerate the remainder-0 probes of `num_shells` extended shells, in
/// shell order.
pub fn zero_probes(dim: usize, num_shells: u32) -> LatticeResult<Vec<CVector>> {
    if dim == 0 {
        return Err(LatticeError::ZeroDimension);
    }
    let expected = num_zero_probes(dim, num_shells)?;

    let dimp = dim + 1;
    let l_max = dimp * dim;
    let l_swp = l_max / 2;

    let mut out = Vec::with_capacity(expected);
    let mut shell_points: HashSet<CVector> = HashSet::new();
    let mut seen_costs = CostSet::new(num_shells as usize + 1);
    let mut queue = CandidateQueue::new();

    seen_costs.push_unique_small(0);
    queue.push(
        Candidate {
            code: vec![0; dimp],
            label: 0,
        },
        0,
    );

    // Starts above every real cost so the first probe opens shell 0
    let mut cost: i64 = 1;
    let mut shells_to_go = num_shells as i64;

    while let Some((probe_cost, candidate)) = queue.pop() {
        if probe_cost < cost {
            shell_points.clear();
            cost = probe_cost;
            shells_to_go -= 1;
            if shells_to_go < -1 {
                break;
            }
        }

        let code = &candidate.code;
        if shell_points.contains(code) {
            continue;
        }
        shell_points.insert(code.clone());
        out.push(code.clone());

        for l in candidate.label..l_max {
            let (i, j) = if l < l_swp {
                let (li, lj) = move_for_label(l);
                (dim.checked_sub(li), Some(lj))
            } else {
                let (lli, llj) = move_for_label(l_max - 1 - l);
                (Some(lli), dim.checked_sub(llj))
            };
            let (Some(i), Some(j)) = (i, j) else {
                continue;
            };

            let (code_i, code_j) = (code[i], code[j]);
            if code_i < 0 || code_j > 0 {
                continue;
            }

            let new_cost =
                cost - dimp as i64 * (code_i - code_j + 1) - j as i64 + i as i64;

            if seen_costs.push_unique_small(-new_cost) {
                let mut next = code.clone();
                next[i] += 1;
                next[j] -= 1;
                queue.push(Candidate { code: next, label: l }, new_cost);
            }
        }
    }

    if out.len() != expected {
        return Err(LatticeError::ProbeTableMismatch {
            expected,
            generated: out.len(),
        });
    }
    Ok(out)
}

/// Expand every remainder-0 probe into its orbit of `dim + 1` probes.
///
/// Probe k of an orbit is probe k-1 with its coordinates rotated up by one
/// and the new first coordinate decremented, so it has remainder value k.
pub fn probes(dim: usize, num_shells: u32) -> LatticeResult<Vec<CVector>> {
    let zero = zero_probes(dim, num_shells)?;
    let mut out = Vec::with_capacity(zero.len() * (dim + 1));

    for probe in zero {
        let mut prev = probe;
        for _ in 0..dim {
            let mut cur = vec![0; dim + 1];
            cur[1..].copy_from_slice(&prev[..dim]);
            cur[0] = prev[dim] - 1;
            out.push(std::mem::replace(&mut prev, cur));
        }
        out.push(prev);
    }
    Ok(out)
}

/// Position in [`probes`] output of the i-th probe a query reports. Every
/// second orbit is reported in reverse.
#[inline]
fn flip_index(i: usize, dimp: usize) -> usize {
    let j = i % (2 * dimp);
    if j < dimp {
        i
    } else {
        i + 3 * dimp - 1 - 2 * j
    }
}

/// Remainder value of the i-th probe a query reports.
#[inline]
fn flipped_k(i: usize, dim: usize) -> usize {
    let dimp = dim + 1;
    if i % (2 * dimp) < dimp {
        i % dimp
    } else {
        dim - i % dimp
    }
}

/// Unit changes taking one reported probe to the next.
///
/// Coordinates are positions in the query's vertex ordering, not c-vector
/// indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStep {
    /// Remainder value of the probe reached
    pub k: usize,
    /// Ordered coordinates to decrement, with repeats
    pub dec: Vec<usize>,
    /// Ordered coordinates to increment, with repeats
    pub inc: Vec<usize>,
}

/// Precomputed probe sequence for extended queries.
///
/// The first probe is always the remainder-0 vertex of the query's
/// Delaunay cell. Each [`ProbeStep`] moves to the next probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbePlan {
    dim: usize,
    num_shells: u32,
    steps: Vec<ProbeStep>,
}

impl ProbePlan {
    pub fn new(dim: usize, num_shells: u32) -> LatticeResult<Self> {
        let all = probes(dim, num_shells)?;
        let dimp = dim + 1;

        let mut steps = Vec::new();
        steps
            .try_reserve_exact(all.len().saturating_sub(1))
            .map_err(|e| LatticeError::allocation("probe plan", e))?;

        for i in 1..all.len() {
            let from = &all[flip_index(i - 1, dimp)];
            let to = &all[flip_index(i, dimp)];

            let mut dec = Vec::new();
            let mut inc = Vec::new();
            for (d, (a, b)) in from.iter().zip(to).enumerate() {
                let diff: Coord = b - a;
                let target = if diff < 0 { &mut dec } else { &mut inc };
                target.extend(std::iter::repeat(d).take(diff.unsigned_abs() as usize));
            }

            steps.push(ProbeStep {
                k: flipped_k(i, dim),
                dec,
                inc,
            });
        }

        debug!(
            dim,
            num_shells,
            num_probes = all.len(),
            "Generated extended probe plan"
        );

        Ok(Self {
            dim,
            num_shells,
            steps,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_shells(&self) -> u32 {
        self.num_shells
    }

    /// Total number of probes, including the first.
    pub fn num_probes(&self) -> usize {
        self.steps.len() + 1
    }

    pub fn steps(&self) -> &[ProbeStep] {
        &self.steps
    }
}
