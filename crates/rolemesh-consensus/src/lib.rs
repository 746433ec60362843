//! Leaderless Role Assignment
//!
//! N nodes on a connected graph agree on a one-to-one mapping to N abstract
//! roles. There is no coordinator and no node ever sees global state: each one
//! decides from the claims that have reached it so far.
//!
//! # Core Insight
//!
//! A contested role is settled by **strength**, not by arrival order. Whoever
//! prefers the role more keeps it; everyone else yields to the best role they
//! believe is still free. Since claims only get newer and routing only goes
//! outward, every node's view eventually matches reality.
//!
//! # Protocol
//!
//! 1. Every node claims its most preferred role and broadcasts the claim
//! 2. Claims travel one hop per round along gradient-descending edges
//! 3. A node that sees a stronger claim on its role yields and re-announces
//! 4. A node is locally converged when every role has exactly one claimant
//!    in its view
//! 5. The run ends when all nodes are converged and nothing is in flight
//!
//! # Ties
//!
//! Two claims of exactly equal strength on one role are settled by node id:
//! the lower id keeps the role.

mod agent;
mod claim;
mod error;
mod gradient;
mod preference;
mod registry;
mod router;
mod scheduler;

#[cfg(test)]
mod testing;

pub use agent::{AgentState, NodeAgent, StepOutcome, YieldRecord};
pub use claim::{Claim, ClaimMessage, RoleId, Round};
pub use error::{Error, Result};
pub use gradient::GradientField;
pub use preference::{rank_roles, PreferenceMatrix};
pub use registry::RoleRegistry;
pub use router::{Delivery, Router};
pub use scheduler::{RoundReport, RoundScheduler, RunStatus, RunSummary, SchedulerConfig};

pub use rolemesh_topology::NodeId;
