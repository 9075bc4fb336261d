//! # Python Bindings
//!
//! PyO3 bindings for the A* lattice decoder, the hash index and the store.
//!
//! ## Python API
//!
//! ```python
//! from astar_lsh import AStarNN, AStarIndex, LSH
//!
//! nn = AStarNN(2, packing_radius=1.0, num_shells=1)
//! nn.nearest_hash([6.1, -0.2])          # 18446744073709549664
//! k, c = nn.nearest_cvector([6.1, -0.2])  # (2, [1, -1, -2])
//! nn.extended_hashes([10.1, -0.2])      # 6 hash codes
//!
//! index = AStarIndex(3)
//! index.put([6.1, -0.2, 0.8], 123)
//! index.get([6.1, -0.3, 0.8])           # [123]
//!
//! store = LSH(3, num_shells=2)
//! store.insert([6.1, -0.2, 0.8], {"name": "a"})
//! distance, vector, payload = store.query([6.1, -0.25, 0.8])
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::adapters::index::LatticeIndex;
use crate::core::{Coord, ElementId, HashCode, LatticeError, LatticePoint};
use crate::engine::{AStarLattice, LshStore, MatchStrategy};

fn to_py_err(e: LatticeError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_tuples(points: Vec<LatticePoint>) -> Vec<(usize, Vec<Coord>)> {
    points.into_iter().map(|p| (p.k, p.c)).collect()
}

/// A* lattice decoder
///
/// Args:
///     dim: Number of dimensions of the input vectors
///     packing_radius: Lattice scale (default: 1.0)
///     num_shells: Shells probed by extended queries, at most 30 (default: 1)
#[pyclass(name = "AStarNN")]
pub struct PyAStarNN {
    inner: AStarLattice,
}

#[pymethods]
impl PyAStarNN {
    #[new]
    #[pyo3(signature = (dim, packing_radius = 1.0, num_shells = 1))]
    fn new(dim: usize, packing_radius: f64, num_shells: u32) -> PyResult<Self> {
        let inner = AStarLattice::new(dim, packing_radius, num_shells).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    #[getter]
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    #[getter]
    fn packing_radius(&self) -> f64 {
        self.inner.packing_radius()
    }

    #[getter]
    fn num_shells(&self) -> u32 {
        self.inner.num_shells()
    }

    #[getter]
    fn num_probes(&self) -> usize {
        self.inner.num_probes()
    }

    /// Factor applied when mapping into the representation space
    #[getter]
    fn scale(&self) -> f64 {
        self.inner.scale()
    }

    fn nearest_hash(&self, x: Vec<f64>) -> PyResult<HashCode> {
        self.inner.nearest_hash(&x).map_err(to_py_err)
    }

    /// Returns:
    ///     Tuple[int, List[int]]: remainder value and c-vector
    fn nearest_cvector(&self, x: Vec<f64>) -> PyResult<(usize, Vec<Coord>)> {
        let p = self.inner.nearest_cvector(&x).map_err(to_py_err)?;
        Ok((p.k, p.c))
    }

    fn nearest_point(&self, x: Vec<f64>) -> PyResult<Vec<f64>> {
        self.inner.nearest_point(&x).map_err(to_py_err)
    }

    fn delaunay_hashes(&self, x: Vec<f64>) -> PyResult<Vec<HashCode>> {
        self.inner.delaunay_hashes(&x).map_err(to_py_err)
    }

    fn delaunay_cvectors(&self, x: Vec<f64>) -> PyResult<Vec<(usize, Vec<Coord>)>> {
        self.inner.delaunay_cvectors(&x).map(to_tuples).map_err(to_py_err)
    }

    fn delaunay_points(&self, x: Vec<f64>) -> PyResult<Vec<Vec<f64>>> {
        self.inner.delaunay_points(&x).map_err(to_py_err)
    }

    fn extended_hashes(&self, x: Vec<f64>) -> PyResult<Vec<HashCode>> {
        self.inner.extended_hashes(&x).map_err(to_py_err)
    }

    fn extended_cvectors(&self, x: Vec<f64>) -> PyResult<Vec<(usize, Vec<Coord>)>> {
        self.inner.extended_cvectors(&x).map(to_tuples).map_err(to_py_err)
    }

    fn extended_points(&self, x: Vec<f64>) -> PyResult<Vec<Vec<f64>>> {
        self.inner.extended_points(&x).map_err(to_py_err)
    }

    fn to_lattice_space(&self, x: Vec<f64>) -> PyResult<Vec<f64>> {
        self.inner.to_lattice_space(&x).map_err(to_py_err)
    }

    fn from_lattice_space(&self, v: Vec<f64>) -> PyResult<Vec<f64>> {
        self.inner.from_lattice_space(&v).map_err(to_py_err)
    }

    /// Lattice point (c, k) in the quantisation space
    fn cvector_k_to_lattice_point(&self, c: Vec<Coord>, k: Coord) -> PyResult<Vec<f64>> {
        self.inner.cvector_k_to_lattice_point(&c, k).map_err(to_py_err)
    }

    fn cvector_to_lattice_point(&self, c: Vec<Coord>) -> PyResult<Vec<f64>> {
        self.inner.cvector_to_lattice_point(&c).map_err(to_py_err)
    }

    /// Lattice point (c, k) in the representation space
    fn cvector_k_to_lattice_point_in_lattice_space(
        &self,
        c: Vec<Coord>,
        k: Coord,
    ) -> PyResult<Vec<f64>> {
        self.inner
            .cvector_k_to_lattice_point_in_lattice_space(&c, k)
            .map_err(to_py_err)
    }

    fn cvector_to_lattice_point_in_lattice_space(&self, c: Vec<Coord>) -> PyResult<Vec<f64>> {
        self.inner
            .cvector_to_lattice_point_in_lattice_space(&c)
            .map_err(to_py_err)
    }

    /// Does an extended query for `query` probe the nearest lattice point
    /// of `stored`?
    ///
    /// Args:
    ///     by_cvector: Compare c-vectors instead of hash codes
    #[pyo3(signature = (stored, query, by_cvector = false))]
    fn probe_matches(&self, stored: Vec<f64>, query: Vec<f64>, by_cvector: bool) -> PyResult<bool> {
        let strategy = if by_cvector {
            MatchStrategy::CVector
        } else {
            MatchStrategy::Hash
        };
        self.inner.probe_matches(&stored, &query, strategy).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "AStarNN(dim={}, packing_radius={}, num_shells={})",
            self.inner.dim(),
            self.inner.packing_radius(),
            self.inner.num_shells()
        )
    }
}

/// Lattice hash index of integer ids
#[pyclass(name = "AStarIndex")]
pub struct PyAStarIndex {
    inner: LatticeIndex,
}

#[pymethods]
impl PyAStarIndex {
    #[new]
    #[pyo3(signature = (dim, packing_radius = 1.0, num_shells = 1))]
    fn new(dim: usize, packing_radius: f64, num_shells: u32) -> PyResult<Self> {
        let inner = LatticeIndex::new(dim, packing_radius, num_shells).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn put(&mut self, x: Vec<f64>, id: ElementId) -> PyResult<()> {
        self.inner.put(&x, id).map_err(to_py_err)
    }

    fn put_all(&mut self, x: Vec<f64>, ids: Vec<ElementId>) -> PyResult<()> {
        self.inner.put_all(&x, &ids).map_err(to_py_err)
    }

    /// Ids in the bucket of the nearest lattice point
    fn get(&self, x: Vec<f64>) -> PyResult<Vec<ElementId>> {
        self.inner.get(&x).map(<[ElementId]>::to_vec).map_err(to_py_err)
    }

    fn count(&self, x: Vec<f64>) -> PyResult<usize> {
        self.inner.count(&x).map_err(to_py_err)
    }

    /// Ids in the buckets of every extended probe
    fn get_extended(&self, x: Vec<f64>) -> PyResult<Vec<ElementId>> {
        self.inner.get_extended(&x).map_err(to_py_err)
    }

    /// Number of ids `get_extended` would return
    fn count_extended(&self, x: Vec<f64>) -> PyResult<usize> {
        self.inner.count_extended(&x).map_err(to_py_err)
    }

    /// Alias of `count_extended`
    fn num_candidates(&self, x: Vec<f64>) -> PyResult<usize> {
        self.count_extended(x)
    }

    fn hash(&self, x: Vec<f64>) -> PyResult<HashCode> {
        self.inner.hash(&x).map_err(to_py_err)
    }

    fn clear_by_vector(&mut self, x: Vec<f64>) -> PyResult<()> {
        self.inner.clear_by_vector(&x).map_err(to_py_err)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    #[getter]
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    #[getter]
    fn num_shells(&self) -> u32 {
        self.inner.lattice().num_shells()
    }

    #[getter]
    fn num_probes(&self) -> usize {
        self.inner.lattice().num_probes()
    }

    #[getter]
    fn num_hashes(&self) -> usize {
        self.inner.num_hashes()
    }

    #[getter]
    fn num_elements(&self) -> usize {
        self.inner.num_elements()
    }

    fn __len__(&self) -> usize {
        self.inner.num_elements()
    }

    fn __repr__(&self) -> String {
        format!(
            "AStarIndex(dim={}, hashes={}, elements={})",
            self.inner.dim(),
            self.inner.num_hashes(),
            self.inner.num_elements()
        )
    }
}

/// Nearest-neighbour store of (vector, payload) records
#[pyclass(name = "LSH")]
pub struct PyLsh {
    inner: LshStore<PyObject>,
}

#[pymethods]
impl PyLsh {
    #[new]
    #[pyo3(signature = (dim, packing_radius = 1.0, num_shells = 1))]
    fn new(dim: usize, packing_radius: f64, num_shells: u32) -> PyResult<Self> {
        let inner = LshStore::new(dim, packing_radius, num_shells).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Store a record
    ///
    /// Returns:
    ///     int: The record id
    fn insert(&mut self, x: Vec<f64>, payload: PyObject) -> PyResult<ElementId> {
        self.inner.insert(x, payload).map_err(to_py_err)
    }

    /// Closest stored record among the extended probes of `x`
    ///
    /// Returns:
    ///     Tuple[float, Optional[List[float]], Any]: distance, vector and
    ///     payload; (inf, None, None) when nothing was found
    fn query(&self, py: Python<'_>, x: Vec<f64>) -> PyResult<(f64, Option<Vec<f64>>, PyObject)> {
        let hit = self.inner.query(&x).map_err(to_py_err)?;
        Ok(match hit {
            Some(n) => (n.distance, Some(n.vector.to_vec()), n.payload.clone_ref(py)),
            None => (f64::INFINITY, None, py.None()),
        })
    }

    /// All records in the extended probes of `x` as (vector, payload) pairs
    fn candidates(&self, py: Python<'_>, x: Vec<f64>) -> PyResult<Vec<(Vec<f64>, PyObject)>> {
        let found = self.inner.candidates(&x).map_err(to_py_err)?;
        Ok(found
            .into_iter()
            .map(|(v, p)| (v.to_vec(), p.clone_ref(py)))
            .collect())
    }

    fn count(&self, x: Vec<f64>) -> PyResult<usize> {
        self.inner.count(&x).map_err(to_py_err)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    #[getter]
    fn num_inserts(&self) -> usize {
        self.inner.num_inserts()
    }

    #[getter]
    fn num_hashes(&self) -> usize {
        self.inner.num_hashes()
    }

    #[getter]
    fn num_elements(&self) -> usize {
        self.inner.num_elements()
    }

    #[getter]
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    #[getter]
    fn num_shells(&self) -> u32 {
        self.inner.lattice().num_shells()
    }

    #[getter]
    fn num_probes(&self) -> usize {
        self.inner.lattice().num_probes()
    }

    /// Stored (vector, payload) for `id`, or None
    fn get(&self, py: Python<'_>, id: ElementId) -> Option<(Vec<f64>, PyObject)> {
        self.inner
            .get(id)
            .map(|(v, p)| (v.to_vec(), p.clone_ref(py)))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!("LSH(dim={}, records={})", self.inner.dim(), self.inner.len())
    }
}

/// A* lattice LSH Python module
#[pymodule]
fn astar_lsh(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAStarNN>()?;
    m.add_class::<PyAStarIndex>()?;
    m.add_class::<PyLsh>()?;

    m.add("__doc__", "A* lattice locality-sensitive hashing")?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("MAX_NUM_SHELLS", crate::core::MAX_NUM_SHELLS)?;

    Ok(())
}
