//! End-to-end scenarios with known hash codes and c-vectors.

use astar_lsh::core::probes::{num_probes, zero_probes};
use astar_lsh::{
    AStarLattice, HashCode, LatticeConfig, LatticeError, LatticeIndex, LatticePoint, LshStore,
    OwnedProbe, MAX_NUM_SHELLS,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn probe(hash: HashCode, k: usize, c: &[i64]) -> OwnedProbe {
    OwnedProbe {
        hash,
        k,
        c: c.to_vec(),
    }
}

// ============================================================================
// NEAREST
// ============================================================================

#[test]
fn test_nearest_dim2() {
    let lattice = AStarLattice::new(2, 1.0, 1).unwrap();
    let x = [6.1, -0.2];

    assert_eq!(lattice.nearest_hash(&x).unwrap(), 18446744073709549664);
    assert_eq!(
        lattice.nearest_cvector(&x).unwrap(),
        LatticePoint::new(2, vec![1, -1, -2])
    );
    assert_eq!(lattice.nearest_point(&x).unwrap(), vec![-5.0, 1.0, 4.0]);
}

#[test]
fn test_nearest_dim3() {
    let lattice = AStarLattice::new(3, 1.0, 1).unwrap();

    let cases: [([f64; 3], usize, [i64; 4], HashCode); 4] = [
        ([6.1, -0.2, 0.8], 2, [2, -1, -1, -2], 18446744073709491044),
        ([6.1, -0.3, 0.8], 2, [2, -1, -1, -2], 18446744073709491044),
        ([6.1, 0.3, 0.8], 3, [1, -1, -1, -2], 18446744073709491043),
        ([9.1, -9.3, 9.8], 1, [3, -5, 3, -2], 18446744073709494765),
    ];

    for (x, k, c, hash) in cases {
        assert_eq!(lattice.nearest_probe(&x).unwrap(), probe(hash, k, &c), "{x:?}");
    }
}

// ============================================================================
// DELAUNAY AND EXTENDED
// ============================================================================

#[test]
fn test_delaunay_dim2() {
    let lattice = AStarLattice::new(2, 1.0, 1).unwrap();

    assert_eq!(
        lattice.delaunay_probes(&[10.1, -0.2]).unwrap(),
        vec![
            probe(18446744073709549666, 0, &[3, -1, -2]),
            probe(18446744073709548705, 1, &[3, -1, -3]),
            probe(18446744073709548674, 2, &[3, -2, -3]),
        ]
    );
}

#[test]
fn test_extended_dim2() {
    let lattice = AStarLattice::new(2, 1.0, 1).unwrap();

    assert_eq!(
        lattice.extended_probes(&[10.1, -0.2]).unwrap(),
        vec![
            probe(18446744073709549666, 0, &[3, -1, -2]),
            probe(18446744073709548705, 1, &[3, -1, -3]),
            probe(18446744073709548674, 2, &[3, -2, -3]),
            probe(18446744073709548704, 2, &[2, -1, -3]),
            probe(18446744073709549635, 1, &[3, -2, -2]),
            probe(18446744073709548706, 0, &[4, -1, -3]),
        ]
    );
}

#[test]
fn test_delaunay_zero_vector_dim6() {
    let lattice = AStarLattice::new(6, 1.0, 0).unwrap();

    // tied residuals: the first step decrements coordinate 4
    assert_eq!(
        lattice.delaunay_hashes(&[0.0; 6]).unwrap(),
        vec![
            0,
            18446744073708628095,
            18446744073708598304,
            18446744073679969153,
            18446744073679969152,
            18446744073679969121,
            18446744073679968160,
        ]
    );
    assert_eq!(
        lattice.delaunay_cvectors(&[0.0; 6]).unwrap()[6],
        LatticePoint::new(6, vec![-1, -1, -1, -1, -1, -1, 0])
    );
    assert_eq!(lattice.extended_hashes(&[0.0; 6]).unwrap()[..2], [0, 18446744073708628095]);
}

#[test]
fn test_extended_dim3_contains_neighbours() {
    let x = [6.1, -0.3, 0.8];

    for (shells, expected) in [(0, 4), (1, 8), (7, 68)] {
        let lattice = AStarLattice::new(3, 1.0, shells).unwrap();
        let hashes = lattice.extended_hashes(&x).unwrap();

        assert_eq!(hashes.len(), expected);
        assert_eq!(lattice.num_probes(), expected);
        assert_eq!(hashes[2], 18446744073709491044);
        assert_eq!(hashes[3], 18446744073709491043);
    }
}

// ============================================================================
// PROBE TABLE
// ============================================================================

#[test]
fn test_probe_counts() {
    assert_eq!(num_probes(1, 30).unwrap(), 62);
    assert_eq!(num_probes(5, 3).unwrap(), 42);
    assert_eq!(num_probes(32, 4).unwrap(), 396);
    assert_eq!(num_probes(2, 1).unwrap(), 6);
    assert_eq!(num_probes(3, 0).unwrap(), 4);
}

#[test]
fn test_zero_probes_dim2() {
    assert_eq!(
        zero_probes(2, 2).unwrap(),
        vec![vec![0, 0, 0], vec![-1, 0, 1], vec![0, -1, 1], vec![-1, 1, 0]]
    );
}

// ============================================================================
// CONSTRUCTION BOUNDARIES
// ============================================================================

#[test]
fn test_construction_boundaries() {
    assert!(AStarLattice::new(2, 1.0, MAX_NUM_SHELLS).is_ok());
    assert_eq!(
        AStarLattice::new(2, 1.0, 31).unwrap_err(),
        LatticeError::InvalidShellCount {
            requested: 31,
            max: MAX_NUM_SHELLS
        }
    );
    assert_eq!(
        AStarLattice::new(2, 0.0, 1).unwrap_err(),
        LatticeError::InvalidPackingRadius(0.0)
    );
    assert_eq!(
        AStarLattice::new(2, -1.0, 1).unwrap_err(),
        LatticeError::InvalidPackingRadius(-1.0)
    );
    assert_eq!(AStarLattice::new(0, 1.0, 1).unwrap_err(), LatticeError::ZeroDimension);

    // finite input too large to decode is rejected, not wrapped
    let lattice = AStarLattice::new(2, 1.0, 1).unwrap();
    assert!(matches!(
        lattice.delaunay_hashes(&[1e300, 0.0]),
        Err(LatticeError::CoordinateOutOfRange { .. })
    ));
    assert!(matches!(
        lattice.nearest_hash(&[1e300, 0.0]),
        Err(LatticeError::CoordinateOutOfRange { .. })
    ));
    assert!(matches!(
        lattice.nearest_hash(&[f64::NAN, 0.0]),
        Err(LatticeError::CoordinateOutOfRange { index: 0, .. })
    ));

    // dim is checked before shells, shells before radius
    assert_eq!(AStarLattice::new(0, -1.0, 99).unwrap_err(), LatticeError::ZeroDimension);
    assert!(matches!(
        AStarLattice::new(4, -1.0, 99),
        Err(LatticeError::InvalidShellCount { .. })
    ));
}

#[test]
fn test_config_round_trip() {
    let config = LatticeConfig::new(3).with_packing_radius(0.5).with_num_shells(4);
    let json = serde_json::to_string(&config).unwrap();
    let loaded: LatticeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded, config);

    let lattice = AStarLattice::from_config(&loaded).unwrap();
    assert_eq!(lattice.num_probes(), num_probes(3, 4).unwrap());
}

// ============================================================================
// INDEX AND STORE
// ============================================================================

#[test]
fn test_index_scenario() {
    init_tracing();
    let mut index = LatticeIndex::new(3, 1.0, 1).unwrap();
    let v = [6.1, -0.2, 0.8];

    index.put(&v, 123).unwrap();
    index.put(&v, 456).unwrap();
    assert_eq!(index.get(&v).unwrap(), &[123, 456]);
    assert_eq!(index.get(&[6.1, -0.3, 0.8]).unwrap(), &[123, 456]);
    assert_eq!(index.get_hash(18446744073709491044), &[123, 456]);

    // wrong length leaves the index untouched
    assert!(index.put(&[1.0, 2.0], 789).is_err());
    assert_eq!(index.num_elements(), 2);

    index.clear_by_vector(&v).unwrap();
    assert!(index.get(&v).unwrap().is_empty());
    assert!(index.is_empty());
}

#[test]
fn test_store_scenario() {
    init_tracing();
    let mut store = LshStore::new(3, 1.0, 7).unwrap();
    store.insert(vec![6.1, -0.2, 0.8], "left").unwrap();
    store.insert(vec![6.1, 0.3, 0.8], "right").unwrap();

    let hit = store.query(&[6.1, 0.3, 0.8]).unwrap().unwrap();
    assert_eq!(*hit.payload, "right");
    assert_eq!(hit.id, 1);
    assert_eq!(hit.distance, 0.0);

    // the neighbouring cell is among the extended probes
    let hit = store.query(&[6.1, -0.3, 0.8]).unwrap().unwrap();
    assert_eq!(*hit.payload, "left");
    assert_eq!(store.count(&[6.1, -0.3, 0.8]).unwrap(), 2);

    assert!(store.insert(vec![1.0], "short").is_err());
    assert_eq!(store.len(), 2);

    store.clear();
    assert!(store.query(&[6.1, 0.3, 0.8]).unwrap().is_none());
}
