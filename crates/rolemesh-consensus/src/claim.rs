//! Claims and the messages that carry them.

use rolemesh_topology::NodeId;

/// An abstract role index in `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleId(pub usize);

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A discrete protocol round, also used as claim timestamp.
///
/// Round 0 is the initial announcement; message processing starts at round 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round(pub u64);

impl Round {
    /// The announcement round.
    pub const ZERO: Self = Self(0);

    /// The round after this one.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node's asserted role choice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Claim {
    /// The claimed role
    pub role: RoleId,
    /// The claimant's preference score for that role
    pub strength: f64,
    /// Round in which the claimant made this choice
    pub timestamp: Round,
}

impl Claim {
    /// Whether `challenger`'s claim on the same role beats `holder`'s.
    ///
    /// Strictly stronger wins; on an exact strength tie the lower node id wins.
    pub fn beats(&self, challenger: NodeId, holder: NodeId, holder_strength: f64) -> bool {
        self.strength > holder_strength
            || (self.strength == holder_strength && challenger < holder)
    }
}

/// A claim in transit, tagged with the node it describes.
///
/// There is no destination: the router relays it along the source's
/// forwarding edges.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimMessage {
    /// The node whose claim this is
    pub source: NodeId,
    /// The claim as last known by the relaying node
    pub claim: Claim,
}

impl ClaimMessage {
    /// Create a message.
    pub const fn new(source: NodeId, claim: Claim) -> Self {
        Self { source, claim }
    }
}
