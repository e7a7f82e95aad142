//! Pacing policy selection.

use serde::{Deserialize, Serialize};

/// How a gate spreads calls across a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingPolicy {
    /// Enforce a uniform minimum interval between consecutive calls.
    #[default]
    Steady,
    /// Let an entire window's quota pass unthrottled, then pause out the
    /// remainder of the window.
    Greedy,
}

impl PacingPolicy {
    /// Whether this policy allows bursting.
    pub fn is_greedy(&self) -> bool {
        matches!(self, PacingPolicy::Greedy)
    }
}

impl std::fmt::Display for PacingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacingPolicy::Steady => write!(f, "steady"),
            PacingPolicy::Greedy => write!(f, "greedy"),
        }
    }
}
