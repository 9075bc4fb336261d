//! # A* Lattice Decoder
//!
//! The decoder instance. Owns a validated configuration, the scale that maps
//! caller vectors onto the lattice, and the extended probe plan.
//!
//! Every query maps its vector to the representation space, decodes it, and
//! reports candidate lattice points as [`Probe`]s, either collected into a
//! `Vec` or passed one by one to a [`ProbeVisitor`].
//!
//! | Query | Candidates |
//! |-------|------------|
//! | nearest | the lattice point whose Voronoi cell holds the vector |
//! | delaunay | the `dim + 1` vertices of the containing Delaunay cell |
//! | extended | the Delaunay vertices plus `num_shells` shells around them |

use tracing::{debug, warn};

use crate::core::config::LatticeConfig;
use crate::core::decoder::closest_point_into;
use crate::core::delaunay::locate_into;
use crate::core::error::{check_coords, check_len, LatticeError, LatticeResult};
use crate::core::hash::{hash_cvector, ordered_powers};
use crate::core::probes::ProbePlan;
use crate::core::transform::{self, cvector_k_to_lattice_space_into, rho, to_lattice_space_into};
use crate::core::{Coord, HashCode, LatticePoint, OwnedProbe, Probe, MAX_LATTICE_COORD};
use crate::ports::ProbeVisitor;

/// How [`AStarLattice::probe_matches`] compares lattice points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Compare hash codes
    #[default]
    Hash,
    /// Compare remainder values and c-vectors
    CVector,
}

/// A* lattice decoder for fixed dimensionality, packing radius and shell
/// count.
///
/// Immutable after construction and safe to share between threads.
///
/// # Example
/// ```
/// use astar_lsh::AStarLattice;
///
/// let lattice = AStarLattice::new(2, 1.0, 1).unwrap();
/// assert_eq!(lattice.num_probes(), 6);
///
/// let hash = lattice.nearest_hash(&[6.1, -0.2]).unwrap();
/// assert_eq!(hash, 18446744073709549664);
/// ```
#[derive(Debug, Clone)]
pub struct AStarLattice {
    config: LatticeConfig,
    scale: f64,
    plan: ProbePlan,
}

impl AStarLattice {
    /// Create a decoder. Fails if `dim` is zero, `num_shells` exceeds
    /// [`MAX_NUM_SHELLS`](crate::core::MAX_NUM_SHELLS) or `packing_radius` is
    /// not positive, checked in that order.
    pub fn new(dim: usize, packing_radius: f64, num_shells: u32) -> LatticeResult<Self> {
        Self::from_config(&LatticeConfig {
            dim,
            packing_radius,
            num_shells,
        })
    }

    pub fn from_config(config: &LatticeConfig) -> LatticeResult<Self> {
        config.validate()?;

        let scale = rho(config.dim) / config.packing_radius;
        let plan = ProbePlan::new(config.dim, config.num_shells)?;

        debug!(
            dim = config.dim,
            packing_radius = config.packing_radius,
            num_shells = config.num_shells,
            num_probes = plan.num_probes(),
            "Created A* lattice decoder"
        );

        Ok(Self {
            config: config.clone(),
            scale,
            plan,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Dimensionality of the quantisation space
    pub fn dim(&self) -> usize {
        self.config.dim
    }

    pub fn packing_radius(&self) -> f64 {
        self.config.packing_radius
    }

    /// Factor applied when mapping into the representation space:
    /// `rho(dim) / packing_radius`
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn num_shells(&self) -> u32 {
        self.config.num_shells
    }

    /// Number of candidates an extended query reports
    pub fn num_probes(&self) -> usize {
        self.plan.num_probes()
    }

    // ========================================================================
    // SPACE MAPPING
    // ========================================================================

    /// Map a vector of `dim` values into the representation space.
    ///
    /// Fails on NaN or infinite values, and on vectors that map to a
    /// coordinate beyond [`MAX_LATTICE_COORD`].
    pub fn to_lattice_space(&self, x: &[f64]) -> LatticeResult<Vec<f64>> {
        check_len(x, self.dim())?;
        check_coords(x, f64::MAX)?;
        let mut v = vec![0.0; self.dim() + 1];
        to_lattice_space_into(self.scale, x, &mut v);
        check_coords(&v, MAX_LATTICE_COORD)?;
        Ok(v)
    }

    /// Map a vector of `dim + 1` values back to the quantisation space.
    pub fn from_lattice_space(&self, v: &[f64]) -> LatticeResult<Vec<f64>> {
        check_len(v, self.dim() + 1)?;
        transform::from_lattice_space(self.scale, v)
    }

    /// Lattice point (c, k) in the representation space. Coordinate i is
    /// `-(c[i]*(dim+1) + k)`.
    pub fn cvector_k_to_lattice_point_in_lattice_space(
        &self,
        c: &[Coord],
        k: Coord,
    ) -> LatticeResult<Vec<f64>> {
        check_len(c, self.dim() + 1)?;
        transform::cvector_k_to_lattice_point_in_lattice_space(c, k)
    }

    /// As [`Self::cvector_k_to_lattice_point_in_lattice_space`] with
    /// `k = -sum(c)`.
    pub fn cvector_to_lattice_point_in_lattice_space(&self, c: &[Coord]) -> LatticeResult<Vec<f64>> {
        check_len(c, self.dim() + 1)?;
        transform::cvector_to_lattice_point_in_lattice_space(c)
    }

    /// Lattice point (c, k) mapped back to the quantisation space.
    pub fn cvector_k_to_lattice_point(&self, c: &[Coord], k: Coord) -> LatticeResult<Vec<f64>> {
        let v = self.cvector_k_to_lattice_point_in_lattice_space(c, k)?;
        transform::from_lattice_space(self.scale, &v)
    }

    pub fn cvector_to_lattice_point(&self, c: &[Coord]) -> LatticeResult<Vec<f64>> {
        let v = self.cvector_to_lattice_point_in_lattice_space(c)?;
        transform::from_lattice_space(self.scale, &v)
    }

    // ========================================================================
    // QUERY DRIVERS
    // ========================================================================

    fn aborted(&self, query: &'static str, code: i32) -> LatticeError {
        warn!(query, code, "Visitor aborted lattice enumeration");
        LatticeError::CallbackAborted(code)
    }

    fn decode_nearest(&self, x: &[f64]) -> LatticeResult<OwnedProbe> {
        let v = self.to_lattice_space(x)?;
        let mut c = vec![0; v.len()];
        let k = closest_point_into(&v, &mut c);
        Ok(OwnedProbe {
            hash: hash_cvector(&c),
            k,
            c,
        })
    }

    fn run_delaunay<F>(&self, x: &[f64], mut f: F) -> LatticeResult<()>
    where
        F: FnMut(Probe<'_>) -> Result<(), i32>,
    {
        let v = self.to_lattice_space(x)?;
        let dimp = v.len();
        let mut c = vec![0; dimp];
        let mut xmod = vec![0.0; dimp];
        let mut order = vec![0; dimp];
        locate_into(&v, &mut c, &mut xmod, &mut order);

        let powers = ordered_powers(&order);
        let mut hash = hash_cvector(&c);
        f(Probe { hash, k: 0, c: &c }).map_err(|code| self.aborted("delaunay", code))?;

        for k in 1..dimp {
            c[order[k - 1]] -= 1;
            hash = hash.wrapping_sub(powers[k - 1]);
            f(Probe { hash, k, c: &c }).map_err(|code| self.aborted("delaunay", code))?;
        }
        Ok(())
    }

    pub(crate) fn run_extended<F>(&self, x: &[f64], mut f: F) -> LatticeResult<()>
    where
        F: FnMut(Probe<'_>) -> Result<(), i32>,
    {
        let v = self.to_lattice_space(x)?;
        let dimp = v.len();
        let mut c = vec![0; dimp];
        let mut xmod = vec![0.0; dimp];
        let mut order = vec![0; dimp];
        locate_into(&v, &mut c, &mut xmod, &mut order);

        let powers = ordered_powers(&order);
        let mut hash = hash_cvector(&c);
        f(Probe { hash, k: 0, c: &c }).map_err(|code| self.aborted("extended", code))?;

        for step in self.plan.steps() {
            for &d in &step.dec {
                c[order[d]] -= 1;
                hash = hash.wrapping_sub(powers[d]);
            }
            for &d in &step.inc {
                c[order[d]] += 1;
                hash = hash.wrapping_add(powers[d]);
            }
            f(Probe {
                hash,
                k: step.k,
                c: &c,
            })
            .map_err(|code| self.aborted("extended", code))?;
        }
        Ok(())
    }

    fn lattice_point_of(&self, probe: &Probe<'_>) -> Vec<f64> {
        let mut out = vec![0.0; probe.c.len()];
        cvector_k_to_lattice_space_into(probe.c, probe.k as Coord, &mut out);
        out
    }

    // ========================================================================
    // NEAREST
    // ========================================================================

    /// Hash code of the nearest lattice point
    pub fn nearest_hash(&self, x: &[f64]) -> LatticeResult<HashCode> {
        Ok(self.decode_nearest(x)?.hash)
    }

    /// Remainder value and c-vector of the nearest lattice point
    pub fn nearest_cvector(&self, x: &[f64]) -> LatticeResult<LatticePoint> {
        let probe = self.decode_nearest(x)?;
        Ok(LatticePoint::new(probe.k, probe.c))
    }

    pub fn nearest_probe(&self, x: &[f64]) -> LatticeResult<OwnedProbe> {
        self.decode_nearest(x)
    }

    /// Representation-space coordinates of the nearest lattice point
    pub fn nearest_point(&self, x: &[f64]) -> LatticeResult<Vec<f64>> {
        let probe = self.decode_nearest(x)?;
        Ok(self.lattice_point_of(&probe.as_probe()))
    }

    pub fn nearest_visit<V: ProbeVisitor>(&self, x: &[f64], mut visitor: V) -> LatticeResult<()> {
        let probe = self.decode_nearest(x)?;
        visitor
            .visit(probe.as_probe())
            .map_err(|code| self.aborted("nearest", code))
    }

    // ========================================================================
    // DELAUNAY
    // ========================================================================

    /// Hash codes of the Delaunay cell vertices, in remainder order
    pub fn delaunay_hashes(&self, x: &[f64]) -> LatticeResult<Vec<HashCode>> {
        let mut out = Vec::with_capacity(self.dim() + 1);
        self.run_delaunay(x, |p| {
            out.push(p.hash);
            Ok(())
        })?;
        Ok(out)
    }

    pub fn delaunay_cvectors(&self, x: &[f64]) -> LatticeResult<Vec<LatticePoint>> {
        let mut out = Vec::with_capacity(self.dim() + 1);
        self.run_delaunay(x, |p| {
            out.push(LatticePoint::new(p.k, p.c.to_vec()));
            Ok(())
        })?;
        Ok(out)
    }

    pub fn delaunay_probes(&self, x: &[f64]) -> LatticeResult<Vec<OwnedProbe>> {
        let mut out = Vec::with_capacity(self.dim() + 1);
        self.run_delaunay(x, |p| {
            out.push(p.into_owned());
            Ok(())
        })?;
        Ok(out)
    }

    pub fn delaunay_points(&self, x: &[f64]) -> LatticeResult<Vec<Vec<f64>>> {
        let mut out = Vec::with_capacity(self.dim() + 1);
        self.run_delaunay(x, |p| {
            out.push(self.lattice_point_of(&p));
            Ok(())
        })?;
        Ok(out)
    }

    pub fn delaunay_visit<V: ProbeVisitor>(&self, x: &[f64], mut visitor: V) -> LatticeResult<()> {
        self.run_delaunay(x, |p| visitor.visit(p))
    }

    // ========================================================================
    // EXTENDED
    // ========================================================================

    /// Hash codes of all `num_probes` extended candidates, closest shells
    /// first
    pub fn extended_hashes(&self, x: &[f64]) -> LatticeResult<Vec<HashCode>> {
        let mut out = Vec::with_capacity(self.num_probes());
        self.run_extended(x, |p| {
            out.push(p.hash);
            Ok(())
        })?;
        Ok(out)
    }

    pub fn extended_cvectors(&self, x: &[f64]) -> LatticeResult<Vec<LatticePoint>> {
        let mut out = Vec::with_capacity(self.num_probes());
        self.run_extended(x, |p| {
            out.push(LatticePoint::new(p.k, p.c.to_vec()));
            Ok(())
        })?;
        Ok(out)
    }

    pub fn extended_probes(&self, x: &[f64]) -> LatticeResult<Vec<OwnedProbe>> {
        let mut out = Vec::with_capacity(self.num_probes());
        self.run_extended(x, |p| {
            out.push(p.into_owned());
            Ok(())
        })?;
        Ok(out)
    }

    pub fn extended_points(&self, x: &[f64]) -> LatticeResult<Vec<Vec<f64>>> {
        let mut out = Vec::with_capacity(self.num_probes());
        self.run_extended(x, |p| {
            out.push(self.lattice_point_of(&p));
            Ok(())
        })?;
        Ok(out)
    }

    pub fn extended_visit<V: ProbeVisitor>(&self, x: &[f64], mut visitor: V) -> LatticeResult<()> {
        self.run_extended(x, |p| visitor.visit(p))
    }

    // ========================================================================
    // MATCHING
    // ========================================================================

    /// Does the extended probe set of `query` include the nearest lattice
    /// point of `stored`?
    pub fn probe_matches(
        &self,
        stored: &[f64],
        query: &[f64],
        strategy: MatchStrategy,
    ) -> LatticeResult<bool> {
        let target = self.nearest_probe(stored)?;
        let mut found = false;
        self.run_extended(query, |p| {
            found |= match strategy {
                MatchStrategy::Hash => p.hash == target.hash,
                MatchStrategy::CVector => p.k == target.k && p.c == target.c.as_slice(),
            };
            Ok(())
        })?;
        Ok(found)
    }
}
