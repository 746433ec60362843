//! Message router: one hop of gradient-directed propagation per round.
//!
//! A claim accepted by node `j` in round `t` is queued for every neighbor in
//! `forward_targets(source, j)` and processed by them in round `t + 1`. The
//! router never inspects payloads; loop freedom comes entirely from the
//! forwarding table.

use rolemesh_topology::NodeId;

use crate::{ClaimMessage, GradientField};

/// A message on one link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delivery {
    /// The relaying node
    pub from: NodeId,
    /// The receiving node
    pub to: NodeId,
    /// The claim carried
    pub message: ClaimMessage,
}

/// Next-round inboxes built from the forwarding table.
#[derive(Debug, Clone)]
pub struct Router {
    field: GradientField,
    pending: Vec<Vec<Delivery>>,
    in_flight: usize,
    transmissions: usize,
}

impl Router {
    /// Create a router over a precomputed gradient field.
    pub fn new(field: GradientField) -> Self {
        let size = field.size();
        Self {
            field,
            pending: vec![Vec::new(); size],
            in_flight: 0,
            transmissions: 0,
        }
    }

    /// The routing tables.
    pub fn field(&self) -> &GradientField {
        &self.field
    }

    /// Queue `message`, relayed by `from`, for all of `from`'s forward targets.
    ///
    /// Returns the number of links used.
    pub fn relay(&mut self, from: NodeId, message: ClaimMessage) -> usize {
        let targets = self.field.forward_targets(message.source, from);
        for &to in targets {
            self.pending[to.0].push(Delivery { from, to, message });
        }
        self.in_flight += targets.len();
        self.transmissions += targets.len();
        targets.len()
    }

    /// Hand over everything queued so far and start a fresh round buffer.
    pub fn take_inboxes(&mut self) -> Vec<Vec<Delivery>> {
        let fresh = vec![Vec::new(); self.pending.len()];
        self.in_flight = 0;
        std::mem::replace(&mut self.pending, fresh)
    }

    /// Deliveries queued for `node` next round.
    pub fn pending_for(&self, node: NodeId) -> &[Delivery] {
        &self.pending[node.0]
    }

    /// Messages queued for next round.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Messages sent since creation.
    pub fn transmissions(&self) -> usize {
        self.transmissions
    }
}
