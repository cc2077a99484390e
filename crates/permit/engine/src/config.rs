//! Engine configuration

use permit_types::ApprovalStage;
use serde::{Deserialize, Serialize};

/// Default number of id generation attempts before submission gives up
pub const DEFAULT_ID_ATTEMPTS: u32 = 8;

/// Named approver for each stage of the pipeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageApprovers {
    pub business: String,
    pub technical: String,
    pub am_team: String,
}

impl StageApprovers {
    pub fn for_stage(&self, stage: ApprovalStage) -> &str {
        match stage {
            ApprovalStage::Business => &self.business,
            ApprovalStage::Technical => &self.technical,
            ApprovalStage::AmTeam => &self.am_team,
        }
    }
}

impl Default for StageApprovers {
    fn default() -> Self {
        Self {
            business: "John Doe".into(),
            technical: "Jane Smith".into(),
            am_team: "Mike Johnson".into(),
        }
    }
}

/// Configuration for a [`PermitController`](crate::PermitController)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reject approve/deny calls that carry a blank comment
    pub require_comments: bool,
    /// How many fresh ids to try when a generated id is already taken
    pub id_attempts: u32,
    /// Approver directory contents
    pub approvers: StageApprovers,
}

impl EngineConfig {
    pub fn with_require_comments(mut self, require: bool) -> Self {
        self.require_comments = require;
        self
    }

    pub fn with_approvers(mut self, approvers: StageApprovers) -> Self {
        self.approvers = approvers;
        self
    }

    pub fn with_id_attempts(mut self, attempts: u32) -> Self {
        self.id_attempts = attempts;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            require_comments: false,
            id_attempts: DEFAULT_ID_ATTEMPTS,
            approvers: StageApprovers::default(),
        }
    }
}
