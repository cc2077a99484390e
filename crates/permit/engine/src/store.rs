//! Request store: every submitted request, newest first
//!
//! Requests are never removed. The store itself performs no transition
//! checks; mutation goes through the controller.

use chrono::{DateTime, Utc};
use permit_types::{ApprovalStage, ApprovalStatus, Decision, PermissionRequest, RequestId};
use serde::Serialize;
use std::collections::HashMap;

/// In-memory request collection
#[derive(Clone, Debug, Default)]
pub struct RequestStore {
    requests: HashMap<RequestId, PermissionRequest>,
    /// Ids ordered newest submission first
    order: Vec<RequestId>,
}

/// Request counts by status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub denied: usize,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new request at the front of the listing.
    ///
    /// Returns `false`, leaving the store unchanged, when the id is taken.
    pub fn insert(&mut self, request: PermissionRequest) -> bool {
        if self.requests.contains_key(&request.id) {
            return false;
        }
        self.order.insert(0, request.id.clone());
        self.requests.insert(request.id.clone(), request);
        true
    }

    pub fn get(&self, id: &RequestId) -> Option<&PermissionRequest> {
        self.requests.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &RequestId) -> Option<&mut PermissionRequest> {
        self.requests.get_mut(id)
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.requests.contains_key(id)
    }

    /// All requests, newest first
    pub fn list(&self) -> Vec<&PermissionRequest> {
        self.order
            .iter()
            .filter_map(|id| self.requests.get(id))
            .collect()
    }

    /// Pending requests waiting on `stage`, newest first
    pub fn pending_for(&self, stage: ApprovalStage) -> Vec<&PermissionRequest> {
        self.list()
            .into_iter()
            .filter(|r| r.state.pending_stage() == Some(stage))
            .collect()
    }

    pub fn with_status(&self, status: ApprovalStatus) -> Vec<&PermissionRequest> {
        self.list()
            .into_iter()
            .filter(|r| r.status() == status)
            .collect()
    }

    pub fn summary(&self) -> StoreSummary {
        let mut summary = StoreSummary {
            total: self.requests.len(),
            ..StoreSummary::default()
        };
        for request in self.requests.values() {
            match request.status() {
                ApprovalStatus::Pending => summary.pending += 1,
                ApprovalStatus::Approved => summary.approved += 1,
                ApprovalStatus::Denied => summary.denied += 1,
            }
        }
        summary
    }

    /// Most recent denial of any request that asked for `permission`
    pub fn last_denial(&self, permission: &str) -> Option<DateTime<Utc>> {
        self.requests
            .values()
            .filter(|r| r.contains_permission(permission))
            .flat_map(|r| r.approval_history.iter())
            .filter(|entry| entry.outcome == Decision::Denied)
            .map(|entry| entry.decided_at)
            .max()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
