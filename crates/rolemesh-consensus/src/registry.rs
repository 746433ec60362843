//! Role registry: which nodes a node believes claim each role.
//!
//! Updated incrementally whenever a claim entry changes, never rebuilt. The
//! registry also tracks how many roles have exactly one claimant, which makes
//! the local convergence test O(1).

use rolemesh_topology::NodeId;

use crate::RoleId;

/// Per-role claimant sets as seen from one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    buckets: Vec<Vec<NodeId>>,
    singly_claimed: usize,
}

impl RoleRegistry {
    /// An empty registry over `roles` roles.
    pub fn new(roles: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); roles],
            singly_claimed: 0,
        }
    }

    /// Record that `node` now claims `role`.
    pub fn insert(&mut self, role: RoleId, node: NodeId) {
        let bucket = &mut self.buckets[role.0];
        if bucket.contains(&node) {
            return;
        }
        match bucket.len() {
            0 => self.singly_claimed += 1,
            1 => self.singly_claimed -= 1,
            _ => {}
        }
        bucket.push(node);
    }

    /// Record that `node` no longer claims `role`.
    pub fn remove(&mut self, role: RoleId, node: NodeId) {
        let bucket = &mut self.buckets[role.0];
        let Some(pos) = bucket.iter().position(|&n| n == node) else {
            return;
        };
        bucket.swap_remove(pos);
        match bucket.len() {
            0 => self.singly_claimed -= 1,
            1 => self.singly_claimed += 1,
            _ => {}
        }
    }

    /// Move `node` from `old` (if any) to `new`.
    pub fn reassign(&mut self, node: NodeId, old: Option<RoleId>, new: RoleId) {
        if old == Some(new) {
            return;
        }
        if let Some(old) = old {
            self.remove(old, node);
        }
        self.insert(new, node);
    }

    /// Nodes believed to claim `role`, in no particular order.
    pub fn claimants(&self, role: RoleId) -> &[NodeId] {
        &self.buckets[role.0]
    }

    /// Whether anyone is believed to claim `role`.
    pub fn is_occupied(&self, role: RoleId) -> bool {
        !self.buckets[role.0].is_empty()
    }

    /// Every role has exactly one claimant.
    pub fn is_bijective(&self) -> bool {
        self.singly_claimed == self.buckets.len()
    }

    /// Roles claimed by more than one node.
    pub fn contested(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.len() > 1)
            .map(|(r, _)| RoleId(r))
    }
}
