//! Swarm simulation: network and preference setup, run, event recording.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use rand::{rngs::StdRng, SeedableRng};
use rolemesh_consensus::{
    AgentState, PreferenceMatrix, RoundReport, RoundScheduler, RunSummary, SchedulerConfig,
};
use rolemesh_topology::{GridCoord, NodeId, TriGridNetwork};
use tracing::info;

use crate::error::{Error, Result};
use crate::events::{AssignmentSnapshot, NodeSnapshot, SimEvent};

/// Where the swarm layout comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSource {
    /// Grow a random connected layout of `size` nodes from the seed
    Generate { size: usize },
    /// Load a layout file
    File(PathBuf),
}

/// Configuration for the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Seed for network growth and preference draws
    pub seed: u64,
    /// Swarm layout
    pub network: NetworkSource,
    /// Rounds before giving up
    pub max_rounds: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            network: NetworkSource::Generate { size: 30 },
            max_rounds: SchedulerConfig::default().max_rounds,
        }
    }
}

impl SimulationConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// `ROLEMESH_NETWORK_FILE` takes precedence over `ROLEMESH_NETWORK_SIZE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed = parse_var(&lookup, "ROLEMESH_SEED")?.unwrap_or(defaults.seed);
        let max_rounds =
            parse_var(&lookup, "ROLEMESH_MAX_ROUNDS")?.unwrap_or(defaults.max_rounds);

        let network = match lookup("ROLEMESH_NETWORK_FILE").filter(|p| !p.is_empty()) {
            Some(path) => NetworkSource::File(PathBuf::from(path)),
            None => match parse_var(&lookup, "ROLEMESH_NETWORK_SIZE")? {
                Some(size) => NetworkSource::Generate { size },
                None => defaults.network,
            },
        };

        Ok(Self {
            seed,
            network,
            max_rounds,
        })
    }
}

/// Parse `value` as `T`, reporting `key` on failure.
pub fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| parse_value(key, &v)).transpose()
}

/// A swarm running the role assignment protocol, with its event timeline.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    network: TriGridNetwork,
    scheduler: RoundScheduler,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Build the network, draw preferences and queue the initial announcements.
    ///
    /// Deterministic for a given config.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = match &config.network {
            NetworkSource::Generate { size } => TriGridNetwork::generate(*size, &mut rng),
            NetworkSource::File(path) => TriGridNetwork::load(path)?,
        };
        let topology = network.topology();
        let preferences = PreferenceMatrix::random(network.len(), &mut rng);

        let scheduler = RoundScheduler::new(
            &topology,
            &preferences,
            SchedulerConfig {
                max_rounds: config.max_rounds,
            },
        )?;

        let ready = SimEvent::NetworkReady {
            nodes: network.len(),
            links: topology.edge_count(),
            diameter: scheduler.router().field().diameter(),
            announcements: scheduler.total_transmissions(),
        };
        info!(
            nodes = network.len(),
            links = topology.edge_count(),
            seed = config.seed,
            "network ready"
        );

        Ok(Self {
            config,
            network,
            scheduler,
            events: vec![ready],
        })
    }

    /// Run until convergence or the round limit.
    pub fn run(&mut self) -> Result<RunSummary> {
        self.run_with(|_| true)
    }

    /// Run until convergence, the round limit, or `should_continue` returns false.
    pub fn run_with<F>(&mut self, mut should_continue: F) -> Result<RunSummary>
    where
        F: FnMut(&RoundReport) -> bool,
    {
        let events = &mut self.events;
        let summary = self.scheduler.run_with(|report| {
            events.push(SimEvent::from(report));
            should_continue(report)
        })?;

        self.events.push(SimEvent::Finished {
            status: summary.status,
            rounds: summary.rounds,
            total_transmissions: summary.total_transmissions,
            assignment: summary.assignment.clone(),
        });
        Ok(summary)
    }

    /// Current state of every node.
    pub fn snapshot(&self) -> AssignmentSnapshot {
        let nodes: Vec<NodeSnapshot> = self
            .scheduler
            .agents()
            .iter()
            .zip(self.network.positions())
            .map(|(agent, &position)| {
                let claim = agent.claim();
                NodeSnapshot {
                    id: agent.id(),
                    position,
                    cartesian: position.to_cartesian(),
                    role: claim.role,
                    strength: claim.strength,
                    state: agent.state(),
                    in_conflict: agent.in_conflict(),
                }
            })
            .collect();

        AssignmentSnapshot {
            round: self.scheduler.round(),
            converged_count: nodes.iter().filter(|n| n.state == AgentState::LocallyConverged).count(),
            nodes,
            all_converged: self.scheduler.is_converged(),
            total_transmissions: self.scheduler.total_transmissions(),
        }
    }

    /// Where `node` sits on the grid.
    pub fn position(&self, node: NodeId) -> Option<GridCoord> {
        self.network.position(node)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn network(&self) -> &TriGridNetwork {
        &self.network
    }

    pub fn scheduler(&self) -> &RoundScheduler {
        &self.scheduler
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }
}
