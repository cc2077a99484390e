//! Permission requests: submitted drafts travelling through the approval pipeline
//!
//! A PermissionRequest records what was asked for, where it currently sits
//! in the pipeline, and every decision taken on it so far.

use crate::{AccessType, ApprovalStage, ApprovalStatus, Decision, Permission, RequestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Request State ────────────────────────────────────────────────────

/// Lifecycle state of a request.
///
/// The stage is carried wherever it is meaningful so a terminal request
/// cannot lose it: an approved request sits at the last stage, a denied
/// request remembers the stage that denied it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum RequestState {
    Pending { stage: ApprovalStage },
    Approved,
    Denied { stage: ApprovalStage },
}

impl RequestState {
    /// Initial state of every submitted request
    pub fn initial() -> Self {
        Self::Pending {
            stage: ApprovalStage::first(),
        }
    }

    pub fn status(&self) -> ApprovalStatus {
        match self {
            Self::Pending { .. } => ApprovalStatus::Pending,
            Self::Approved => ApprovalStatus::Approved,
            Self::Denied { .. } => ApprovalStatus::Denied,
        }
    }

    pub fn current_stage(&self) -> ApprovalStage {
        match self {
            Self::Pending { stage } | Self::Denied { stage } => *stage,
            Self::Approved => ApprovalStage::last(),
        }
    }

    /// The stage awaiting a decision, if any
    pub fn pending_stage(&self) -> Option<ApprovalStage> {
        match self {
            Self::Pending { stage } => Some(*stage),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending { stage } => write!(f, "Pending@{}", stage),
            Self::Approved => write!(f, "Approved"),
            Self::Denied { stage } => write!(f, "Denied@{}", stage),
        }
    }
}

// ── Approval History ─────────────────────────────────────────────────

/// Immutable record of one decision
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalHistoryEntry {
    /// Stage the request was at when the decision was taken
    pub stage: ApprovalStage,
    pub outcome: Decision,
    /// Who decided, resolved from the stage
    pub approver: String,
    pub decided_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl ApprovalHistoryEntry {
    pub fn new(stage: ApprovalStage, outcome: Decision, approver: impl Into<String>) -> Self {
        Self {
            stage,
            outcome,
            approver: approver.into(),
            decided_at: Utc::now(),
            comments: None,
        }
    }

    /// Attach a comment; blank comments are dropped
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        let comments = comments.into();
        if !comments.trim().is_empty() {
            self.comments = Some(comments);
        }
        self
    }
}

// ── Evidence ─────────────────────────────────────────────────────────

/// Supplementary material supplied for a flagged permission
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Attachment file names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
    /// Site references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<String>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty() && self.links.is_empty() && self.sites.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attachments.len() + self.links.len() + self.sites.len()
    }
}

// ── Permission Request ───────────────────────────────────────────────

/// A submitted permission request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PermissionRequest {
    pub id: RequestId,
    pub state: RequestState,
    /// Approver of the current stage
    pub approver: String,
    /// Requested catalog entries, in selection order
    pub permissions: Vec<Permission>,
    /// Access type per permission id
    pub access_types: HashMap<String, AccessType>,
    /// Justification text per permission id
    pub justifications: HashMap<String, String>,
    /// Supplementary evidence per permission id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub evidence: HashMap<String, Evidence>,
    pub created_at: DateTime<Utc>,
    /// Decisions in the order they were taken
    pub approval_history: Vec<ApprovalHistoryEntry>,
}

impl PermissionRequest {
    /// Create a freshly submitted request at the first stage
    pub fn new(id: RequestId, approver: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            id,
            state: RequestState::initial(),
            approver: approver.into(),
            permissions,
            access_types: HashMap::new(),
            justifications: HashMap::new(),
            evidence: HashMap::new(),
            created_at: Utc::now(),
            approval_history: Vec::new(),
        }
    }

    pub fn with_access_types(mut self, access_types: HashMap<String, AccessType>) -> Self {
        self.access_types = access_types;
        self
    }

    pub fn with_justifications(mut self, justifications: HashMap<String, String>) -> Self {
        self.justifications = justifications;
        self
    }

    pub fn with_evidence(mut self, evidence: HashMap<String, Evidence>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn status(&self) -> ApprovalStatus {
        self.state.status()
    }

    pub fn current_stage(&self) -> ApprovalStage {
        self.state.current_stage()
    }

    pub fn is_pending(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn contains_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.permission == permission)
    }

    pub fn permission_ids(&self) -> Vec<&str> {
        self.permissions.iter().map(|p| p.id()).collect()
    }

    /// When the request was denied, if it was
    pub fn denied_at(&self) -> Option<DateTime<Utc>> {
        self.approval_history
            .iter()
            .rev()
            .find(|entry| entry.outcome == Decision::Denied)
            .map(|entry| entry.decided_at)
    }
}
