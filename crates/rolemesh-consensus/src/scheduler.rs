//! Round scheduler: synchronous rounds until global convergence.
//!
//! Each round:
//!
//! 1. Take the inboxes queued during the previous round
//! 2. Step every agent over its own inbox
//! 3. Only then hand all relays to the router for the next round
//!
//! Agents never observe each other's in-round changes, so the order in which
//! they are stepped does not matter. The run ends once every agent is locally
//! converged and no message is in flight.

use rolemesh_topology::{Adjacency, NodeId};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::router::Router;
use crate::{GradientField, NodeAgent, PreferenceMatrix, RoleId, Round, YieldRecord};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Rounds after which a run gives up without converging
    pub max_rounds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { max_rounds: 10_000 }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunStatus {
    /// All nodes converged with nothing in flight
    Converged,
    /// The caller stopped the run at a round boundary
    Aborted,
    /// `max_rounds` elapsed first
    RoundLimit,
}

/// Observability output for one round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    /// The round just completed
    pub round: Round,
    /// Messages sent during this round
    pub transmissions: usize,
    /// Messages sent since the initial announcement, inclusive
    pub total_transmissions: usize,
    /// Messages queued for the next round
    pub in_flight: usize,
    /// Nodes that gave up their role this round
    pub yields: Vec<YieldRecord>,
    /// Nodes still sharing their role with another claimant in their own view
    pub conflicted: Vec<NodeId>,
    /// Local convergence per node
    pub converged: Vec<bool>,
    /// Every node converged and nothing in flight
    pub all_converged: bool,
}

impl RoundReport {
    /// Number of locally converged nodes.
    pub fn converged_count(&self) -> usize {
        self.converged.iter().filter(|&&c| c).count()
    }
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// How the run ended
    pub status: RunStatus,
    /// Rounds executed
    pub rounds: Round,
    /// Messages sent in total
    pub total_transmissions: usize,
    /// Role claimed by each node, indexed by node id
    pub assignment: Vec<RoleId>,
}

/// Drives all node agents and the router in lockstep.
#[derive(Debug)]
pub struct RoundScheduler {
    config: SchedulerConfig,
    agents: Vec<NodeAgent>,
    router: Router,
    round: Round,
    all_converged: bool,
}

impl RoundScheduler {
    /// Set up agents and routing, and queue every node's initial announcement.
    pub fn new<G: Adjacency + ?Sized>(
        graph: &G,
        preferences: &PreferenceMatrix,
        config: SchedulerConfig,
    ) -> Result<Self> {
        let n = graph.node_count();
        if preferences.size() != n {
            return Err(Error::PreferenceSize {
                rows: preferences.size(),
                nodes: n,
            });
        }

        let field = GradientField::build(graph)?;
        let agents = (0..n)
            .map(|i| NodeAgent::new(NodeId(i), n, preferences.row(NodeId(i))))
            .collect::<Result<Vec<_>>>()?;

        let mut router = Router::new(field);
        for agent in &agents {
            router.relay(agent.id(), agent.announcement());
        }

        let all_converged = router.in_flight() == 0 && agents.iter().all(NodeAgent::is_converged);
        debug!(
            nodes = n,
            diameter = router.field().diameter(),
            announcements = router.in_flight(),
            "role assignment initialized"
        );

        Ok(Self {
            config,
            agents,
            router,
            round: Round::ZERO,
            all_converged,
        })
    }

    /// Execute one synchronous round.
    pub fn step(&mut self) -> Result<RoundReport> {
        let round = self.round.next();
        let inboxes = self.router.take_inboxes();

        let mut outcomes = Vec::with_capacity(self.agents.len());
        for (agent, inbox) in self.agents.iter_mut().zip(&inboxes) {
            outcomes.push(agent.step(round, inbox.iter().map(|d| &d.message))?);
        }

        let sent_before = self.router.transmissions();
        let mut yields = Vec::new();
        for (i, outcome) in outcomes.into_iter().enumerate() {
            for message in outcome.relays {
                self.router.relay(NodeId(i), message);
            }
            yields.extend(outcome.yielded);
        }

        let converged: Vec<bool> = self.agents.iter().map(NodeAgent::is_converged).collect();
        let conflicted = self
            .agents
            .iter()
            .filter(|a| a.in_conflict() && !yields.iter().any(|y| y.node == a.id()))
            .map(NodeAgent::id)
            .collect();

        self.round = round;
        self.all_converged = self.router.in_flight() == 0 && converged.iter().all(|&c| c);

        let report = RoundReport {
            round,
            transmissions: self.router.transmissions() - sent_before,
            total_transmissions: self.router.transmissions(),
            in_flight: self.router.in_flight(),
            yields,
            conflicted,
            converged,
            all_converged: self.all_converged,
        };
        debug!(
            %round,
            transmissions = report.transmissions,
            yields = report.yields.len(),
            converged = report.converged_count(),
            "round complete"
        );
        Ok(report)
    }

    /// Run until convergence or the round limit.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.run_with(|_| true)
    }

    /// Run until convergence, the round limit, or `should_continue` returns false.
    ///
    /// `should_continue` sees every round's report.
    pub fn run_with<F>(&mut self, mut should_continue: F) -> Result<RunSummary>
    where
        F: FnMut(&RoundReport) -> bool,
    {
        let status = loop {
            if self.all_converged {
                break RunStatus::Converged;
            }
            if self.round.0 >= self.config.max_rounds {
                warn!(rounds = self.round.0, "round limit reached before convergence");
                break RunStatus::RoundLimit;
            }

            let report = self.step()?;
            let keep_going = should_continue(&report);
            if report.all_converged {
                break RunStatus::Converged;
            }
            if !keep_going {
                warn!(round = %report.round, "run aborted");
                break RunStatus::Aborted;
            }
        };

        let summary = self.summary(status);
        if status == RunStatus::Converged {
            info!(
                rounds = summary.rounds.0,
                transmissions = summary.total_transmissions,
                "role assignment converged"
            );
        }
        Ok(summary)
    }

    /// Termination signal: all nodes converged, nothing in flight.
    pub fn is_converged(&self) -> bool {
        self.all_converged
    }

    /// Rounds completed so far.
    pub fn round(&self) -> Round {
        self.round
    }

    /// Each node's currently claimed role.
    pub fn assignment(&self) -> Vec<RoleId> {
        self.agents.iter().map(|a| a.claim().role).collect()
    }

    /// Read-only access to a node's agent.
    pub fn agent(&self, node: NodeId) -> Option<&NodeAgent> {
        self.agents.get(node.0)
    }

    /// All agents in node order.
    pub fn agents(&self) -> &[NodeAgent] {
        &self.agents
    }

    /// The router, including next round's queued deliveries.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Messages sent so far.
    pub fn total_transmissions(&self) -> usize {
        self.router.transmissions()
    }

    fn summary(&self, status: RunStatus) -> RunSummary {
        RunSummary {
            status,
            rounds: self.round,
            total_transmissions: self.router.transmissions(),
            assignment: self.assignment(),
        }
    }
}
