//! Approver directory: resolves who decides at each stage
//!
//! The directory is an external collaborator. The engine only asks it for
//! a name; it never stores approver state of its own.

use crate::config::StageApprovers;
use permit_types::ApprovalStage;

/// Lookup from approval stage to the responsible approver
pub trait ApproverDirectory: Send + Sync {
    fn approver_for(&self, stage: ApprovalStage) -> String;
}

/// Fixed stage → approver table
#[derive(Clone, Debug, Default)]
pub struct StaticApproverDirectory {
    approvers: StageApprovers,
}

impl StaticApproverDirectory {
    pub fn new(approvers: StageApprovers) -> Self {
        Self { approvers }
    }
}

impl ApproverDirectory for StaticApproverDirectory {
    fn approver_for(&self, stage: ApprovalStage) -> String {
        self.approvers.for_stage(stage).to_string()
    }
}
