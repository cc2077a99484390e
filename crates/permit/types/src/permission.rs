//! Permission catalog entries and requested access types

use crate::PermitError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── Permission Kind ──────────────────────────────────────────────────

/// The native kind of a Graph permission as listed in the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionKind {
    /// The caller acts independently, without a signed-in user
    Application,
    /// The caller acts on behalf of a signed-in user
    Delegated,
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Application => write!(f, "Application"),
            Self::Delegated => write!(f, "Delegated"),
        }
    }
}

// ── Permission ───────────────────────────────────────────────────────

/// A catalog entry. Reference data: loaded once and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Native permission kind
    pub permission_type: PermissionKind,
    /// Unique identifier, e.g. `User.Read`
    pub permission: String,
    /// Human readable summary
    pub description: String,
    /// Requires a GLR compliance review
    #[serde(default)]
    pub glr: bool,
    /// Requires an automated API scan
    #[serde(default)]
    pub api_scan: bool,
}

impl Permission {
    pub fn new(
        permission_type: PermissionKind,
        permission: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            permission_type,
            permission: permission.into(),
            description: description.into(),
            glr: false,
            api_scan: false,
        }
    }

    pub fn with_glr(mut self) -> Self {
        self.glr = true;
        self
    }

    pub fn with_api_scan(mut self) -> Self {
        self.api_scan = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.permission
    }

    /// Whether any offline review is attached to this permission.
    ///
    /// Only flagged permissions accept supplementary evidence.
    pub fn requires_review(&self) -> bool {
        self.glr || self.api_scan
    }

    /// Review requirements in display order (GLR first)
    pub fn requirements(&self) -> Vec<Requirement> {
        let mut reqs = Vec::new();
        if self.glr {
            reqs.push(Requirement::Glr);
        }
        if self.api_scan {
            reqs.push(Requirement::ApiScan);
        }
        reqs
    }

    /// Case-insensitive substring match on identifier or description
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.permission.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Offline review attached to a permission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    Glr,
    ApiScan,
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Glr => write!(f, "Requires GLR"),
            Self::ApiScan => write!(f, "Requires API Scan"),
        }
    }
}

// ── Access Type ──────────────────────────────────────────────────────

/// The access type chosen for one permission in a request.
///
/// Backed by a pair of checkboxes (Application, Delegated). `Both` is a
/// legal choice that is flagged as a conflict; `None` means both boxes
/// were cleared and counts as no choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    Application,
    Delegated,
    Both,
    #[default]
    None,
}

impl AccessType {
    /// Whether a usable type has been chosen
    pub fn is_chosen(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Application and Delegated requested together
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Both)
    }

    pub fn includes_application(&self) -> bool {
        matches!(self, Self::Application | Self::Both)
    }

    pub fn includes_delegated(&self) -> bool {
        matches!(self, Self::Delegated | Self::Both)
    }

    /// Result of setting the Application checkbox to `checked`
    pub fn toggle_application(self, checked: bool) -> Self {
        match (self, checked) {
            (Self::Delegated | Self::Both, true) => Self::Both,
            (Self::Delegated | Self::Both, false) => Self::Delegated,
            (_, true) => Self::Application,
            (_, false) => Self::None,
        }
    }

    /// Result of setting the Delegated checkbox to `checked`
    pub fn toggle_delegated(self, checked: bool) -> Self {
        match (self, checked) {
            (Self::Application | Self::Both, true) => Self::Both,
            (Self::Application | Self::Both, false) => Self::Application,
            (_, true) => Self::Delegated,
            (_, false) => Self::None,
        }
    }
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Application => write!(f, "Application"),
            Self::Delegated => write!(f, "Delegated"),
            Self::Both => write!(f, "Both"),
            Self::None => write!(f, "None"),
        }
    }
}

impl FromStr for AccessType {
    type Err = PermitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "application" => Ok(Self::Application),
            "delegated" => Ok(Self::Delegated),
            "both" => Ok(Self::Both),
            "none" => Ok(Self::None),
            _ => Err(PermitError::UnknownAccessType(s.to_string())),
        }
    }
}
