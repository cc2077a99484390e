//! Pre-submission validation and advisory warnings
//!
//! Validation is a gate: a draft that fails it is never stored. Every rule
//! runs independently and all failures are reported together.
//!
//! Advisories are informational only. Requesting both access types, a
//! permission that needs GLR or an API scan, or one that was denied
//! before never blocks a submission.

use crate::store::RequestStore;
use chrono::{DateTime, Utc};
use permit_types::{AccessType, RequestDraft, Requirement, ValidationReport};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Check a selection against the submission rules.
///
/// `selected` is in selection order; error messages list offending
/// permissions in that order, each once.
pub fn validate(
    selected: &[String],
    access_types: &HashMap<String, AccessType>,
    justifications: &HashMap<String, String>,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let selected = distinct(selected);

    if selected.is_empty() {
        report.push("Please select at least one permission");
    }

    let missing_types: Vec<&str> = selected
        .iter()
        .copied()
        .filter(|p| !access_types.get(*p).is_some_and(AccessType::is_chosen))
        .collect();
    if !missing_types.is_empty() {
        report.push(format!(
            "Please select a type for: {}",
            missing_types.join(", ")
        ));
    }

    let missing_justifications: Vec<&str> = selected
        .iter()
        .copied()
        .filter(|p| justifications.get(*p).map_or(true, |j| j.trim().is_empty()))
        .collect();
    if !missing_justifications.is_empty() {
        report.push(format!(
            "Please provide justification for: {}",
            missing_justifications.join(", ")
        ));
    }

    report
}

/// Selection ids in order, repeats dropped
fn distinct(selected: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    selected
        .iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

pub fn validate_draft(draft: &RequestDraft) -> ValidationReport {
    validate(
        &draft.selected_ids(),
        draft.access_types(),
        draft.justifications(),
    )
}

// ── Advisories ───────────────────────────────────────────────────────

/// A non-blocking note about one selected permission
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Application and Delegated were both requested
    BothSelected { permission: String },
    /// The permission carries an offline review
    Requirement {
        permission: String,
        requirement: Requirement,
    },
    /// An earlier request for the same permission was denied
    DeniedEarlier {
        permission: String,
        denied_at: DateTime<Utc>,
    },
}

impl Advisory {
    pub fn permission(&self) -> &str {
        match self {
            Self::BothSelected { permission }
            | Self::Requirement { permission, .. }
            | Self::DeniedEarlier { permission, .. } => permission,
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BothSelected { permission } => {
                write!(f, "{}: Why selecting both?", permission)
            }
            Self::Requirement {
                permission,
                requirement,
            } => write!(f, "{}: {}", permission, requirement),
            Self::DeniedEarlier {
                permission,
                denied_at,
            } => write!(
                f,
                "{}: Denied earlier on {}",
                permission,
                denied_at.format("%m/%d/%Y")
            ),
        }
    }
}

/// Advisories for every selected permission, in selection order
pub fn advisories(draft: &RequestDraft, store: &RequestStore) -> Vec<Advisory> {
    let mut notes = Vec::new();
    for permission in draft.selected() {
        let id = permission.id();
        if draft.access_type(id).is_conflict() {
            notes.push(Advisory::BothSelected {
                permission: id.to_string(),
            });
        }
        for requirement in permission.requirements() {
            notes.push(Advisory::Requirement {
                permission: id.to_string(),
                requirement,
            });
        }
        if let Some(denied_at) = store.last_denial(id) {
            notes.push(Advisory::DeniedEarlier {
                permission: id.to_string(),
                denied_at,
            });
        }
    }
    notes
}
