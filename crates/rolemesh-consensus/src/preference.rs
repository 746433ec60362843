//! Per-node preference scores over roles.
//!
//! Row `i` is node `i`'s preference vector; column `r` is role `r`. Scores are
//! opaque: only their order within a row matters, and higher is better.

use rand::Rng;
use rolemesh_topology::NodeId;

use crate::error::{Error, Result};
use crate::RoleId;

/// An N×N matrix of finite preference scores.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl PreferenceMatrix {
    /// Build from rows, one per node.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(Error::PreferenceShape {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            if let Some(role) = values.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFinitePreference {
                    node: NodeId(row),
                    role: RoleId(role),
                });
            }
            scores.extend(values);
        }

        Ok(Self { size, scores })
    }

    /// Uniform random scores in `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let scores = (0..size * size).map(|_| rng.gen::<f64>()).collect();
        Self { size, scores }
    }

    /// Number of nodes (and roles).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Node `node`'s preference vector.
    pub fn row(&self, node: NodeId) -> &[f64] {
        let start = node.0 * self.size;
        &self.scores[start..start + self.size]
    }

    /// A single score.
    pub fn score(&self, node: NodeId, role: RoleId) -> f64 {
        self.row(node)[role.0]
    }

    /// Node `node`'s roles from most to least preferred.
    pub fn ranking(&self, node: NodeId) -> Vec<RoleId> {
        rank_roles(self.row(node))
    }

    /// Node `node`'s most preferred role.
    pub fn top_choice(&self, node: NodeId) -> Option<RoleId> {
        self.ranking(node).first().copied()
    }
}

/// Roles ordered from most to least preferred.
///
/// Exact score ties go to the lower role index.
pub fn rank_roles(scores: &[f64]) -> Vec<RoleId> {
    let mut roles: Vec<RoleId> = (0..scores.len()).map(RoleId).collect();
    roles.sort_by(|a, b| scores[b.0].total_cmp(&scores[a.0]).then(a.cmp(b)));
    roles
}
