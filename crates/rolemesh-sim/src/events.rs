//! Simulation events and snapshots for external renderers.

use rolemesh_consensus::{AgentState, RoleId, Round, RoundReport, RunStatus, YieldRecord};
use rolemesh_topology::{GridCoord, NodeId};
use serde::{Deserialize, Serialize};

/// Events recorded over a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// The network is built and initial claims are announced
    NetworkReady {
        nodes: usize,
        links: usize,
        diameter: u32,
        announcements: usize,
    },

    /// One synchronous round finished
    RoundCompleted {
        round: Round,
        transmissions: usize,
        total_transmissions: usize,
        in_flight: usize,
        yields: Vec<YieldRecord>,
        conflicted: Vec<NodeId>,
        converged_count: usize,
    },

    /// The run ended
    Finished {
        status: RunStatus,
        rounds: Round,
        total_transmissions: usize,
        assignment: Vec<RoleId>,
    },
}

impl SimEvent {
    /// Round this event belongs to.
    pub fn round(&self) -> Round {
        match self {
            SimEvent::NetworkReady { .. } => Round::ZERO,
            SimEvent::RoundCompleted { round, .. } => *round,
            SimEvent::Finished { rounds, .. } => *rounds,
        }
    }
}

impl From<&RoundReport> for SimEvent {
    fn from(report: &RoundReport) -> Self {
        SimEvent::RoundCompleted {
            round: report.round,
            transmissions: report.transmissions,
            total_transmissions: report.total_transmissions,
            in_flight: report.in_flight,
            yields: report.yields.clone(),
            conflicted: report.conflicted.clone(),
            converged_count: report.converged_count(),
        }
    }
}

/// One node as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub position: GridCoord,
    /// `(x, y)` in the plane, unit edge length
    pub cartesian: (f64, f64),
    pub role: RoleId,
    pub strength: f64,
    pub state: AgentState,
    pub in_conflict: bool,
}

/// The whole swarm at a round boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSnapshot {
    pub round: Round,
    pub nodes: Vec<NodeSnapshot>,
    pub converged_count: usize,
    pub all_converged: bool,
    pub total_transmissions: usize,
}

impl AssignmentSnapshot {
    /// Nodes believing their role is shared.
    pub fn conflicted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter(|n| n.in_conflict).map(|n| n.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = SimEvent::NetworkReady {
            nodes: 3,
            links: 3,
            diameter: 1,
            announcements: 6,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "NetworkReady");
        assert_eq!(json["announcements"], 6);
    }

    #[test]
    fn round_report_becomes_round_event() {
        let report = RoundReport {
            round: Round(3),
            transmissions: 4,
            total_transmissions: 10,
            in_flight: 4,
            yields: vec![YieldRecord {
                node: NodeId(1),
                from: RoleId(0),
                to: RoleId(2),
            }],
            conflicted: vec![NodeId(0)],
            converged: vec![true, false, true],
            all_converged: false,
        };

        let event = SimEvent::from(&report);
        assert_eq!(event.round(), Round(3));

        let json = serde_json::to_string(&event).unwrap();
        let back: SimEvent = serde_json::from_str(&json).unwrap();
        match back {
            SimEvent::RoundCompleted { converged_count, yields, .. } => {
                assert_eq!(converged_count, 2);
                assert_eq!(yields[0].to, RoleId(2));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
