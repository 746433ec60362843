//! Triangle grid swarm networks.
//!
//! A network is an ordered list of occupied grid points; node `i` sits at
//! `positions[i]`. Links follow grid adjacency, so the topology is fully
//! determined by the layout.
//!
//! # Layout File Format
//!
//! ```text
//! 0 0
//! 1 0
//! 0 1
//! ```
//!
//! One node per line, `x` and `y` separated by whitespace. Blank lines are ignored.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rand::Rng;

use crate::error::{Result, TopologyError};
use crate::{GridCoord, NodeId, Topology};

/// A swarm laid out on the triangle grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriGridNetwork {
    positions: Vec<GridCoord>,
}

impl TriGridNetwork {
    /// Build a network from explicit positions.
    pub fn from_positions(positions: Vec<GridCoord>) -> Result<Self> {
        if positions.is_empty() {
            return Err(TopologyError::EmptyNetwork);
        }
        let mut seen = HashSet::with_capacity(positions.len());
        for &pos in &positions {
            if !seen.insert(pos) {
                return Err(TopologyError::DuplicatePosition(pos));
            }
        }
        Ok(Self { positions })
    }

    /// Grow a random connected network of `size` nodes.
    ///
    /// Starts with a node at the origin and keeps a pool of free grid points
    /// bordering the network. Each step moves a uniformly chosen pool point into
    /// the network, so every new node is adjacent to at least one placed node.
    /// A `size` of zero still yields the single origin node.
    pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let size = size.max(1);
        let mut positions = Vec::with_capacity(size);
        let mut placed = HashSet::with_capacity(size);
        let mut pool: Vec<GridCoord> = Vec::new();
        let mut pooled: HashSet<GridCoord> = HashSet::new();

        let mut place = |pos: GridCoord,
                         positions: &mut Vec<GridCoord>,
                         pool: &mut Vec<GridCoord>| {
            positions.push(pos);
            placed.insert(pos);
            for next in pos.neighbors() {
                if !placed.contains(&next) && pooled.insert(next) {
                    pool.push(next);
                }
            }
        };

        place(GridCoord::ORIGIN, &mut positions, &mut pool);
        while positions.len() < size {
            let pick = rng.gen_range(0..pool.len());
            let pos = pool.swap_remove(pick);
            place(pos, &mut positions, &mut pool);
        }

        Self { positions }
    }

    /// Parse the plain-text layout format.
    pub fn parse(text: &str) -> Result<Self> {
        let mut positions = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || TopologyError::Parse {
                line: idx + 1,
                content: raw.to_string(),
            };

            let mut fields = line.split_whitespace();
            let x = fields.next().and_then(|f| f.parse().ok()).ok_or_else(malformed)?;
            let y = fields.next().and_then(|f| f.parse().ok()).ok_or_else(malformed)?;
            if fields.next().is_some() {
                return Err(malformed());
            }
            positions.push(GridCoord::new(x, y));
        }

        Self::from_positions(positions)
    }

    /// Read a layout file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Render the layout in file format.
    pub fn to_file_string(&self) -> String {
        self.positions
            .iter()
            .map(|p| format!("{} {}\n", p.x, p.y))
            .collect()
    }

    /// Write a layout file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_file_string())?;
        Ok(())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the network has no nodes.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Grid position of a node.
    pub fn position(&self, node: NodeId) -> Option<GridCoord> {
        self.positions.get(node.0).copied()
    }

    /// All positions in node order.
    pub fn positions(&self) -> &[GridCoord] {
        &self.positions
    }

    /// Link every pair of grid-adjacent nodes.
    pub fn topology(&self) -> Topology {
        let index: HashMap<GridCoord, usize> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i))
            .collect();

        let edges = self.positions.iter().enumerate().flat_map(|(i, pos)| {
            let index = &index;
            pos.neighbors()
                .into_iter()
                .filter_map(move |n| index.get(&n).copied())
                .filter(move |&j| j > i)
                .map(move |j| (NodeId(i), NodeId(j)))
        });

        // Endpoints come from the position index, so they are in range and distinct.
        Topology::from_edges(self.positions.len(), edges).unwrap_or_default()
    }
}
