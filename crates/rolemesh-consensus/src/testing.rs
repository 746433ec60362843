//! Shared test fixtures.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rolemesh_topology::{NodeId, Topology};

use crate::PreferenceMatrix;

/// A random connected graph: a random spanning tree plus up to `n` extra edges.
pub(crate) fn random_connected(n: usize, seed: u64) -> Topology {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for i in 1..n {
        edges.push((NodeId(i), NodeId(rng.gen_range(0..i))));
    }
    for _ in 0..n {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            edges.push((NodeId(a), NodeId(b)));
        }
    }
    Topology::from_edges(n, edges).expect("generated edges are in range")
}

/// Build a preference matrix from literal rows.
pub(crate) fn prefs(rows: &[&[f64]]) -> PreferenceMatrix {
    PreferenceMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect())
        .expect("literal preference rows are square")
}
