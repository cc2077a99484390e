//! State machine: legal approve/deny transitions for a request
//!
//! ```text
//! Pending@Business ─approve─▶ Pending@Technical ─approve─▶ Pending@AM Team ─approve─▶ Approved
//!        │                           │                            │
//!        └──────deny───────┬─────────┴────────────deny────────────┘
//!                          ▼
//!                       Denied (stage frozen)
//! ```
//!
//! A transition is planned against the current state first and only then
//! applied, so a rejected action leaves the request untouched.

use crate::approvers::ApproverDirectory;
use permit_types::{
    ApprovalHistoryEntry, ApprovalStage, Decision, PermissionRequest, PermitError, PermitResult,
    RequestState,
};

/// A checked, not yet applied, transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: RequestState,
    pub to: RequestState,
    /// The decision that drives it
    pub decision: Decision,
    /// Stage at which the decision is recorded
    pub stage: ApprovalStage,
}

impl Transition {
    /// Stage whose approver takes over, when the request moves on
    pub fn handover_stage(&self) -> Option<ApprovalStage> {
        self.to.pending_stage()
    }
}

/// Applies approval decisions to requests
#[derive(Clone, Copy, Debug, Default)]
pub struct ApprovalStateMachine;

impl ApprovalStateMachine {
    pub fn new() -> Self {
        Self
    }

    /// Check whether `decision` at `stage` is legal for `request` and
    /// compute the resulting state.
    pub fn plan(
        &self,
        request: &PermissionRequest,
        decision: Decision,
        stage: ApprovalStage,
    ) -> PermitResult<Transition> {
        let illegal = |reason: String| PermitError::IllegalTransition {
            request_id: request.id.clone(),
            action: decision,
            stage,
            reason,
        };

        let current = match request.state {
            RequestState::Pending { stage: current } => current,
            RequestState::Approved => {
                return Err(illegal("request is already Approved".into()));
            }
            RequestState::Denied { .. } => {
                return Err(illegal("request is already Denied".into()));
            }
        };

        if current != stage {
            return Err(illegal(format!("request is pending at {}", current)));
        }

        let to = match decision {
            Decision::Approved => match stage.next() {
                Some(next) => RequestState::Pending { stage: next },
                None => RequestState::Approved,
            },
            Decision::Denied => RequestState::Denied { stage },
        };

        Ok(Transition {
            from: request.state,
            to,
            decision,
            stage,
        })
    }

    /// Plan and apply a decision, appending exactly one history entry.
    ///
    /// Returns a copy of the appended entry.
    pub fn apply(
        &self,
        request: &mut PermissionRequest,
        decision: Decision,
        stage: ApprovalStage,
        approvers: &dyn ApproverDirectory,
        comments: &str,
    ) -> PermitResult<ApprovalHistoryEntry> {
        let transition = self.plan(request, decision, stage)?;

        let entry = ApprovalHistoryEntry::new(stage, decision, approvers.approver_for(stage))
            .with_comments(comments);

        request.approval_history.push(entry.clone());
        request.state = transition.to;
        if let Some(next) = transition.handover_stage() {
            request.approver = approvers.approver_for(next);
        }

        tracing::debug!(
            request_id = %request.id,
            from = %transition.from,
            to = %transition.to,
            "Request transitioned"
        );

        Ok(entry)
    }
}
