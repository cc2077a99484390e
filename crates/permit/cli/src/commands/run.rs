//! Session replay
//!
//! A session file is an ordered list of steps run against a fresh
//! controller. Submissions may carry a label that later steps use to
//! refer to the request; anything that is not a label is taken as a
//! literal request id.
//!
//! A rejected step is reported and the replay moves on, so a session can
//! demonstrate illegal transitions alongside the happy path.

use crate::error::{CliError, CliResult};
use crate::files::{self, DraftDocument};
use crate::output::{self, print_error, print_info, print_success, OutputFormat};
use permit_engine::{PermitController, StoreSummary};
use permit_types::{ApprovalStage, Decision, PermissionRequest, RequestId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tabled::Tabled;

// ── Session Documents ────────────────────────────────────────────────

/// A scripted sequence of submissions and decisions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDocument {
    #[serde(default)]
    pub steps: Vec<SessionStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionStep {
    Submit {
        #[serde(default)]
        label: Option<String>,
        #[serde(flatten)]
        draft: DraftDocument,
    },
    Approve {
        request: String,
        stage: String,
        #[serde(default)]
        comments: String,
    },
    Deny {
        request: String,
        stage: String,
        #[serde(default)]
        comments: String,
    },
}

impl SessionStep {
    fn action(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Approve { .. } => "approve",
            Self::Deny { .. } => "deny",
        }
    }
}

// ── Replay ───────────────────────────────────────────────────────────

/// What happened to one step
#[derive(Debug, Serialize)]
struct StepOutcome {
    step: usize,
    action: &'static str,
    request: Option<RequestId>,
    accepted: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct SessionReport<'a> {
    steps: Vec<StepOutcome>,
    summary: StoreSummary,
    requests: Vec<&'a PermissionRequest>,
}

/// Applies steps and remembers submission labels
struct Replay<'c> {
    controller: &'c mut PermitController,
    labels: HashMap<String, RequestId>,
}

impl Replay<'_> {
    fn resolve(&self, reference: &str) -> RequestId {
        self.labels
            .get(reference)
            .cloned()
            .unwrap_or_else(|| RequestId::new(reference))
    }

    /// Request a decision step refers to; submissions have none until they succeed
    fn target(&self, step: &SessionStep) -> Option<RequestId> {
        match step {
            SessionStep::Submit { .. } => None,
            SessionStep::Approve { request, .. } | SessionStep::Deny { request, .. } => {
                Some(self.resolve(request))
            }
        }
    }

    /// Apply one step and record what happened to it
    fn run_step(&mut self, index: usize, step: &SessionStep) -> StepOutcome {
        let target = self.target(step);
        match self.apply(step) {
            Ok((id, message)) => StepOutcome {
                step: index + 1,
                action: step.action(),
                request: Some(id),
                accepted: true,
                message,
            },
            Err(err) => {
                tracing::debug!(step = index + 1, error = %err, "Session step rejected");
                StepOutcome {
                    step: index + 1,
                    action: step.action(),
                    request: target,
                    accepted: false,
                    message: err.to_string(),
                }
            }
        }
    }

    fn apply(&mut self, step: &SessionStep) -> CliResult<(RequestId, String)> {
        match step {
            SessionStep::Submit { label, draft } => {
                if let Some(label) = label {
                    if self.labels.contains_key(label) {
                        return Err(CliError::InvalidInput(format!(
                            "label '{}' is already in use",
                            label
                        )));
                    }
                }
                let draft = draft.to_draft(self.controller.catalog())?;
                let request = self.controller.submit_draft(&draft)?;
                if let Some(label) = label {
                    self.labels.insert(label.clone(), request.id.clone());
                }
                let message = format!(
                    "submitted {} permission(s), waiting on {}",
                    request.permissions.len(),
                    request.approver
                );
                Ok((request.id, message))
            }
            SessionStep::Approve {
                request,
                stage,
                comments,
            } => self.decide(request, Decision::Approved, stage, comments),
            SessionStep::Deny {
                request,
                stage,
                comments,
            } => self.decide(request, Decision::Denied, stage, comments),
        }
    }

    fn decide(
        &mut self,
        reference: &str,
        decision: Decision,
        stage: &str,
        comments: &str,
    ) -> CliResult<(RequestId, String)> {
        let stage: ApprovalStage = stage.parse()?;
        let id = self.resolve(reference);
        let request = self.controller.decide(&id, decision, stage, comments)?;
        let message = format!("{} at {}, now {}", decision, stage, request.state);
        Ok((id, message))
    }
}

// ── Display Rows ─────────────────────────────────────────────────────

/// Table row for request display
#[derive(Debug, Serialize, Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Approver")]
    approver: String,
    #[tabled(rename = "Permissions")]
    permissions: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&PermissionRequest> for RequestRow {
    fn from(r: &PermissionRequest) -> Self {
        Self {
            id: r.id.to_string(),
            status: r.status().to_string(),
            stage: r.current_stage().to_string(),
            approver: r.approver.clone(),
            permissions: r.permission_ids().join(", "),
            created: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Table row for one approval history entry
#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Request")]
    request: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Approver")]
    approver: String,
    #[tabled(rename = "Comments")]
    comments: String,
    #[tabled(rename = "Decided")]
    decided: String,
}

fn history_rows(requests: &[&PermissionRequest]) -> Vec<HistoryRow> {
    requests
        .iter()
        .flat_map(|r| {
            r.approval_history.iter().map(|entry| HistoryRow {
                request: r.id.to_string(),
                stage: entry.stage.to_string(),
                outcome: entry.outcome.to_string(),
                approver: entry.approver.clone(),
                comments: entry.comments.clone().unwrap_or_else(|| "-".into()),
                decided: entry.decided_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            })
        })
        .collect()
}

/// Replay a session file and print the resulting requests
pub fn execute(
    controller: &mut PermitController,
    file: &str,
    history: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let session: SessionDocument = files::read_document(file)?;
    tracing::info!(file, steps = session.steps.len(), "Replaying session");

    let mut replay = Replay {
        controller,
        labels: HashMap::new(),
    };
    let outcomes: Vec<StepOutcome> = session
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| replay.run_step(index, step))
        .collect();

    let controller = replay.controller;
    let requests = controller.requests();

    match format {
        OutputFormat::Table => {
            for outcome in &outcomes {
                let line = match &outcome.request {
                    Some(id) => format!(
                        "step {} {} {}: {}",
                        outcome.step, outcome.action, id, outcome.message
                    ),
                    None => format!(
                        "step {} {}: {}",
                        outcome.step, outcome.action, outcome.message
                    ),
                };
                if outcome.accepted {
                    print_success(&line);
                } else {
                    print_error(&line);
                }
            }
            println!();
            output::print_output(requests.iter().copied().map(RequestRow::from).collect(), format)?;
            if history {
                println!();
                output::print_output(history_rows(&requests), format)?;
            }
            let rejected = outcomes.iter().filter(|o| !o.accepted).count();
            print_info(&format!(
                "{} step(s) applied, {} rejected",
                outcomes.len() - rejected,
                rejected
            ));
        }
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(
            &SessionReport {
                steps: outcomes,
                summary: controller.store().summary(),
                requests,
            },
            format,
        )?,
    }
    Ok(())
}
