//! Rolemesh Swarm Simulation
//!
//! Runs the role assignment protocol on a triangle grid swarm and records what
//! happened for external renderers.
//!
//! # Architecture
//!
//! - **Simulation**: Builds the network and preferences from a seed, drives the scheduler
//! - **Events**: A serde-tagged timeline, one entry per round
//! - **Snapshot**: Per-node position, role and conflict state at a round boundary
//!
//! # Usage
//!
//! ```ignore
//! let mut sim = Simulation::new(SimulationConfig::from_env()?)?;
//! let summary = sim.run()?;
//!
//! for event in sim.events() {
//!     println!("{}", serde_json::to_string(event)?);
//! }
//! ```

mod error;
mod events;
mod simulation;

pub use error::{Error, Result};
pub use events::{AssignmentSnapshot, NodeSnapshot, SimEvent};
pub use simulation::{parse_value, NetworkSource, Simulation, SimulationConfig};
