//! Approval stages, statuses and decisions

use crate::PermitError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── Approval Stage ───────────────────────────────────────────────────

/// One station of the fixed approval pipeline.
///
/// Declaration order is pipeline order: a request only ever moves to
/// [`ApprovalStage::next`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApprovalStage {
    Business,
    Technical,
    #[serde(rename = "AM Team")]
    AmTeam,
}

impl ApprovalStage {
    /// The full pipeline, in order
    pub const ALL: [ApprovalStage; 3] = [Self::Business, Self::Technical, Self::AmTeam];

    pub fn first() -> Self {
        Self::ALL[0]
    }

    pub fn last() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    /// Position in the pipeline, starting at zero
    pub fn index(&self) -> usize {
        match self {
            Self::Business => 0,
            Self::Technical => 1,
            Self::AmTeam => 2,
        }
    }

    /// The following stage, or `None` for the last one
    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Technical => "Technical",
            Self::AmTeam => "AM Team",
        }
    }
}

impl std::fmt::Display for ApprovalStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApprovalStage {
    type Err = PermitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "business" => Ok(Self::Business),
            "technical" => Ok(Self::Technical),
            "amteam" => Ok(Self::AmTeam),
            _ => Err(PermitError::UnknownStage(s.to_string())),
        }
    }
}

// ── Approval Status ──────────────────────────────────────────────────

/// Overall lifecycle status of a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Denied,
}

impl ApprovalStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Denied => write!(f, "Denied"),
        }
    }
}

// ── Decision ─────────────────────────────────────────────────────────

/// Outcome recorded by one approver at one stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    /// Imperative form used in messages ("approve", "deny")
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Approved => "approve",
            Self::Denied => "deny",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "Approved"),
            Self::Denied => write!(f, "Denied"),
        }
    }
}

impl From<Decision> for ApprovalStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Denied => Self::Denied,
        }
    }
}
