//! Error types for permission requests

use crate::{ApprovalStage, Decision, RequestId, ValidationReport};

/// Errors that can occur in permission request operations
#[derive(Debug, thiserror::Error)]
pub enum PermitError {
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("Illegal transition for {request_id}: cannot {} at {stage}: {reason}", .action.verb())]
    IllegalTransition {
        request_id: RequestId,
        action: Decision,
        stage: ApprovalStage,
        reason: String,
    },

    #[error("Comments are required before approving or denying")]
    CommentRequired,

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    #[error("Duplicate permission in catalog: {0}")]
    DuplicatePermission(String),

    #[error("Permission selected more than once: {0}")]
    DuplicateSelection(String),

    #[error("Permission not selected: {0}")]
    NotSelected(String),

    #[error("Permission does not accept supplementary evidence: {0}")]
    EvidenceNotAccepted(String),

    #[error("Unknown approval stage: {0}")]
    UnknownStage(String),

    #[error("Unknown access type: {0}")]
    UnknownAccessType(String),

    #[error("Could not generate a unique request id after {attempts} attempts")]
    IdExhausted { attempts: u32 },
}

impl PermitError {
    /// Whether the error is a user-correctable validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for permission request operations
pub type PermitResult<T> = Result<T, PermitError>;
