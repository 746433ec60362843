//! Node agent: one node's partial view of the global assignment.
//!
//! Each agent owns a claim table (its latest belief about every node's claim)
//! and a role registry derived from it. Once per round it:
//!
//! 1. **Ingests** delivered claims, keeping only those newer than its belief
//! 2. **Checks** whether a fresh claim beats its own on the same role
//! 3. **Yields** if so, reselecting its best role not believed taken
//! 4. **Relays** every fresh claim, plus its own after a yield
//! 5. **Tests** local convergence: every role has exactly one believed claimant
//!
//! An agent never reads another agent's state. Everything it knows arrived as
//! a [`ClaimMessage`].

use rolemesh_topology::NodeId;
use tracing::trace;

use crate::error::{Error, Result};
use crate::preference::rank_roles;
use crate::registry::RoleRegistry;
use crate::{Claim, ClaimMessage, RoleId, Round};

/// Protocol state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// Holding a claim, view not yet conflict-free
    Claimed,
    /// Gave up its claim this round and picked a new one
    Yielding,
    /// Every role has exactly one claimant in this node's view
    LocallyConverged,
}

/// A node abandoning one role for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YieldRecord {
    /// The yielding node
    pub node: NodeId,
    /// Role given up
    pub from: RoleId,
    /// Role claimed instead
    pub to: RoleId,
}

/// What a node did in one round.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Claims to hand to the router, relayed from this node
    pub relays: Vec<ClaimMessage>,
    /// Set if the node yielded this round
    pub yielded: Option<YieldRecord>,
    /// Local convergence after this round
    pub converged: bool,
}

/// Per-node protocol state and logic.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAgent {
    id: NodeId,
    preferences: Vec<f64>,
    /// Roles by descending preference, fixed at creation
    ranking: Vec<RoleId>,
    own: Claim,
    /// Beliefs about other nodes; the slot for `id` stays `None`
    claims: Vec<Option<Claim>>,
    registry: RoleRegistry,
    state: AgentState,
}

impl NodeAgent {
    /// Create an agent claiming its most preferred role at round 0.
    ///
    /// `preferences` holds one score per role, and there are as many roles as nodes.
    pub fn new(id: NodeId, node_count: usize, preferences: &[f64]) -> Result<Self> {
        let ranking = rank_roles(preferences);
        let role = match ranking.first() {
            Some(&role) if preferences.len() == node_count && id.0 < node_count => role,
            _ => {
                return Err(Error::PreferenceShape {
                    row: id.0,
                    len: preferences.len(),
                    expected: node_count,
                })
            }
        };

        let own = Claim {
            role,
            strength: preferences[role.0],
            timestamp: Round::ZERO,
        };
        let mut registry = RoleRegistry::new(preferences.len());
        registry.insert(role, id);

        let mut agent = Self {
            id,
            preferences: preferences.to_vec(),
            ranking,
            own,
            claims: vec![None; node_count],
            registry,
            state: AgentState::Claimed,
        };
        agent.update_state(false);
        Ok(agent)
    }

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's current claim.
    pub fn claim(&self) -> Claim {
        self.own
    }

    /// Current protocol state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Whether this node's view is conflict-free and complete.
    pub fn is_converged(&self) -> bool {
        self.state == AgentState::LocallyConverged
    }

    /// Whether this node believes someone else shares its role.
    pub fn in_conflict(&self) -> bool {
        self.registry.claimants(self.own.role).len() > 1
    }

    /// This node's belief about `node`'s claim, `None` if never heard from.
    pub fn belief(&self, node: NodeId) -> Option<Claim> {
        if node == self.id {
            Some(self.own)
        } else {
            self.claims.get(node.0).copied().flatten()
        }
    }

    /// The derived role registry.
    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// This node's own claim as a message, for the initial broadcast.
    pub fn announcement(&self) -> ClaimMessage {
        ClaimMessage::new(self.id, self.own)
    }

    /// Apply one delivered claim.
    ///
    /// Returns `Ok(true)` if the claim was newer than the stored belief and was
    /// applied. Stale and duplicate claims return `Ok(false)` without touching
    /// any state.
    pub fn ingest(&mut self, message: &ClaimMessage) -> Result<bool> {
        if message.source == self.id {
            return Err(Error::SelfMessage { node: self.id });
        }

        let Some(entry) = self.claims.get_mut(message.source.0) else {
            return Err(Error::UnknownSource {
                node: self.id,
                source_node: message.source,
            });
        };
        if entry.is_some_and(|known| message.claim.timestamp <= known.timestamp) {
            return Ok(false);
        }
        let previous = entry.map(|known| known.role);
        *entry = Some(message.claim);

        self.registry
            .reassign(message.source, previous, message.claim.role);
        trace!(
            node = %self.id,
            source = %message.source,
            role = %message.claim.role,
            timestamp = %message.claim.timestamp,
            "belief updated"
        );
        Ok(true)
    }

    /// Run one round over this node's inbox.
    pub fn step<'a, I>(&mut self, round: Round, inbox: I) -> Result<StepOutcome>
    where
        I: IntoIterator<Item = &'a ClaimMessage>,
    {
        let mut fresh = Vec::new();
        for message in inbox {
            if self.ingest(message)? {
                fresh.push(message.source);
            }
        }
        fresh.sort_unstable();
        fresh.dedup();

        let own = self.own;
        let beaten = fresh.iter().any(|&source| {
            self.claims[source.0].is_some_and(|c| {
                c.role == own.role && c.beats(source, self.id, own.strength)
            })
        });

        let yielded = if beaten {
            let to = self.reselect(own.role)?;
            self.own = Claim {
                role: to,
                strength: self.preferences[to.0],
                timestamp: round,
            };
            self.registry.insert(to, self.id);
            trace!(node = %self.id, from = %own.role, to = %to, %round, "yielded role");
            Some(YieldRecord {
                node: self.id,
                from: own.role,
                to,
            })
        } else {
            None
        };

        let mut relays: Vec<ClaimMessage> = fresh
            .iter()
            .filter_map(|&source| self.claims[source.0].map(|c| ClaimMessage::new(source, c)))
            .collect();
        if yielded.is_some() {
            relays.push(self.announcement());
        }

        let converged = self.update_state(yielded.is_some());
        Ok(StepOutcome {
            relays,
            yielded,
            converged,
        })
    }

    /// Vacate `vacated` and pick the best role nobody is believed to hold.
    fn reselect(&mut self, vacated: RoleId) -> Result<RoleId> {
        self.registry.remove(vacated, self.id);
        self.ranking
            .iter()
            .copied()
            .find(|&r| r != vacated && !self.registry.is_occupied(r))
            .ok_or(Error::NoAvailableRole {
                node: self.id,
                vacated,
            })
    }

    fn update_state(&mut self, yielded: bool) -> bool {
        let converged = self.registry.is_bijective();
        self.state = if converged {
            AgentState::LocallyConverged
        } else if yielded {
            AgentState::Yielding
        } else {
            AgentState::Claimed
        };
        converged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn msg(source: usize, role: usize, strength: f64, ts: u64) -> ClaimMessage {
        ClaimMessage::new(
            NodeId(source),
            Claim {
                role: RoleId(role),
                strength,
                timestamp: Round(ts),
            },
        )
    }

    #[test]
    fn starts_on_top_choice() {
        let agent = NodeAgent::new(NodeId(1), 3, &[0.2, 0.1, 0.7]).unwrap();

        assert_eq!(agent.claim().role, RoleId(2));
        assert_eq!(agent.claim().strength, 0.7);
        assert_eq!(agent.claim().timestamp, Round::ZERO);
        assert_eq!(agent.state(), AgentState::Claimed);
        assert_eq!(agent.belief(NodeId(0)), None);
        assert_eq!(agent.announcement().source, NodeId(1));
    }

    #[test]
    fn lone_node_is_converged_immediately() {
        let agent = NodeAgent::new(NodeId(0), 1, &[0.5]).unwrap();
        assert!(agent.is_converged());
    }

    #[test]
    fn empty_preferences_rejected() {
        assert!(matches!(
            NodeAgent::new(NodeId(0), 2, &[]),
            Err(Error::PreferenceShape { row: 0, len: 0, expected: 2 })
        ));
    }

    #[test]
    fn self_message_is_fatal() {
        let mut agent = NodeAgent::new(NodeId(2), 3, &[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(
            agent.ingest(&msg(2, 0, 0.9, 1)),
            Err(Error::SelfMessage { node: NodeId(2) })
        );
    }

    #[test]
    fn newer_claim_moves_registry_bucket() {
        let mut agent = NodeAgent::new(NodeId(0), 2, &[0.9, 0.1]).unwrap();

        assert!(agent.ingest(&msg(1, 0, 0.3, 0)).unwrap());
        assert_eq!(agent.registry().claimants(RoleId(0)).len(), 2);

        assert!(agent.ingest(&msg(1, 1, 0.8, 2)).unwrap());
        assert_eq!(agent.registry().claimants(RoleId(0)), &[NodeId(0)]);
        assert_eq!(agent.registry().claimants(RoleId(1)), &[NodeId(1)]);
        assert_eq!(agent.belief(NodeId(1)).map(|c| c.role), Some(RoleId(1)));
    }

    #[test]
    fn stale_claim_discarded() {
        let mut agent = NodeAgent::new(NodeId(0), 2, &[0.9, 0.1]).unwrap();
        agent.ingest(&msg(1, 1, 0.8, 3)).unwrap();

        let before = agent.clone();
        assert!(!agent.ingest(&msg(1, 0, 0.3, 2)).unwrap());
        assert!(!agent.ingest(&msg(1, 1, 0.8, 3)).unwrap());
        assert_eq!(agent, before);
    }

    #[test]
    fn weaker_node_yields_to_stronger() {
        let mut agent = NodeAgent::new(NodeId(1), 3, &[0.5, 0.3, 0.8]).unwrap();
        let inbox = [msg(0, 2, 0.9, 0), msg(2, 0, 0.9, 0)];

        let outcome = agent.step(Round(1), &inbox).unwrap();

        // Role 2 lost, role 0 taken by node 2, so role 1 is next
        assert_eq!(
            outcome.yielded,
            Some(YieldRecord { node: NodeId(1), from: RoleId(2), to: RoleId(1) })
        );
        assert_eq!(agent.claim().role, RoleId(1));
        assert_eq!(agent.claim().strength, 0.3);
        assert_eq!(agent.claim().timestamp, Round(1));
        assert!(agent.is_converged());

        // Both fresh claims relayed, then its own new claim
        let sources: Vec<_> = outcome.relays.iter().map(|m| m.source).collect();
        assert_eq!(sources, vec![NodeId(0), NodeId(2), NodeId(1)]);
    }

    #[test]
    fn stronger_node_holds() {
        let mut agent = NodeAgent::new(NodeId(0), 3, &[0.1, 0.2, 0.9]).unwrap();
        let outcome = agent.step(Round(1), &[msg(1, 2, 0.8, 0)]).unwrap();

        assert_eq!(outcome.yielded, None);
        assert_eq!(agent.claim().role, RoleId(2));
        assert!(agent.in_conflict());
        assert_eq!(agent.state(), AgentState::Claimed);
        assert_eq!(outcome.relays.len(), 1);
    }

    #[test]
    fn equal_strength_lower_id_keeps_role() {
        let mut low = NodeAgent::new(NodeId(0), 2, &[0.5, 0.1]).unwrap();
        let mut high = NodeAgent::new(NodeId(1), 2, &[0.5, 0.1]).unwrap();

        let low_out = low.step(Round(1), &[msg(1, 0, 0.5, 0)]).unwrap();
        let high_out = high.step(Round(1), &[msg(0, 0, 0.5, 0)]).unwrap();

        assert!(low_out.yielded.is_none());
        assert_eq!(high_out.yielded.map(|y| y.to), Some(RoleId(1)));
    }

    #[test]
    fn stale_conflict_does_not_trigger_yield() {
        let mut agent = NodeAgent::new(NodeId(0), 2, &[0.4, 0.1]).unwrap();
        agent.ingest(&msg(1, 1, 0.2, 5)).unwrap();

        // An older claim by node 1 on our role is ignored
        let outcome = agent.step(Round(6), &[msg(1, 0, 0.9, 1)]).unwrap();
        assert!(outcome.yielded.is_none());
        assert!(outcome.relays.is_empty());
    }

    #[test]
    fn duplicate_deliveries_relayed_once() {
        let mut agent = NodeAgent::new(NodeId(2), 3, &[0.1, 0.2, 0.3]).unwrap();
        let m = msg(0, 0, 0.9, 0);

        let outcome = agent.step(Round(1), &[m, m]).unwrap();
        assert_eq!(outcome.relays, vec![m]);
    }

    #[test]
    fn yield_with_partial_view_passes_through_yielding() {
        let mut agent = NodeAgent::new(NodeId(1), 3, &[0.5, 0.3, 0.8]).unwrap();
        let outcome = agent.step(Round(1), &[msg(0, 2, 0.9, 0)]).unwrap();

        // Node 2 is still unheard of, so role 0 looks free
        assert_eq!(
            outcome.yielded,
            Some(YieldRecord { node: NodeId(1), from: RoleId(2), to: RoleId(0) })
        );
        assert!(!outcome.converged);
        assert_eq!(agent.state(), AgentState::Yielding);

        let quiet: [ClaimMessage; 0] = [];
        let outcome = agent.step(Round(2), &quiet).unwrap();
        assert!(outcome.yielded.is_none());
        assert!(!outcome.converged);
        assert_eq!(agent.state(), AgentState::Claimed);
    }

    #[test]
    fn preference_length_must_match_node_count() {
        assert_eq!(
            NodeAgent::new(NodeId(0), 3, &[0.5, 0.4]),
            Err(Error::PreferenceShape { row: 0, len: 2, expected: 3 })
        );
        assert!(matches!(
            NodeAgent::new(NodeId(3), 2, &[0.5, 0.4]),
            Err(Error::PreferenceShape { row: 3, .. })
        ));
    }

    #[test]
    fn claim_from_unknown_node_rejected() {
        let mut agent = NodeAgent::new(NodeId(0), 2, &[0.9, 0.1]).unwrap();
        let before = agent.clone();

        assert_eq!(
            agent.ingest(&msg(5, 0, 0.3, 1)),
            Err(Error::UnknownSource { node: NodeId(0), source_node: NodeId(5) })
        );
        assert_eq!(agent, before);
    }

    proptest! {
        #[test]
        fn replaying_seen_claims_changes_nothing(
            claims in proptest::collection::vec((1usize..6, 0usize..6, 0.0f64..1.0, 0u64..10), 1..30)
        ) {
            let mut agent = NodeAgent::new(NodeId(0), 6, &[0.6, 0.5, 0.4, 0.3, 0.2, 0.1]).unwrap();
            let messages: Vec<_> = claims
                .iter()
                .map(|&(s, r, p, t)| msg(s, r, p, t))
                .collect();

            for m in &messages {
                agent.ingest(m).unwrap();
            }
            let settled = agent.clone();

            for m in &messages {
                prop_assert!(!agent.ingest(m).unwrap());
            }
            prop_assert_eq!(agent, settled);
        }
    }
}
