//! Permit controller: the single owner of request state
//!
//! The controller is the only mutation entry point. It:
//! 1. Validates drafts and submits them as new requests
//! 2. Applies approve/deny decisions through the state machine
//! 3. Answers dashboard and admin queue queries
//!
//! Every operation runs to completion synchronously. A failed operation
//! leaves the store exactly as it was.

use crate::{
    validation, Advisory, ApprovalStateMachine, ApproverDirectory, EngineConfig,
    PermissionCatalog, RequestIdGenerator, RequestStore, StaticApproverDirectory,
    TimestampIdGenerator,
};
use permit_types::*;
use std::collections::{HashMap, HashSet};

/// Owns the catalog, the store and the collaborators that drive them
pub struct PermitController {
    config: EngineConfig,
    catalog: PermissionCatalog,
    approvers: Box<dyn ApproverDirectory>,
    id_generator: Box<dyn RequestIdGenerator>,
    state_machine: ApprovalStateMachine,
    store: RequestStore,
}

impl PermitController {
    /// Controller with the built-in catalog and the configured approvers
    pub fn new(config: EngineConfig) -> Self {
        let approvers = StaticApproverDirectory::new(config.approvers.clone());
        Self {
            config,
            catalog: PermissionCatalog::builtin(),
            approvers: Box::new(approvers),
            id_generator: Box::new(TimestampIdGenerator::new()),
            state_machine: ApprovalStateMachine::new(),
            store: RequestStore::new(),
        }
    }

    pub fn with_catalog(mut self, catalog: PermissionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_approvers(mut self, approvers: impl ApproverDirectory + 'static) -> Self {
        self.approvers = Box::new(approvers);
        self
    }

    pub fn with_id_generator(mut self, generator: impl RequestIdGenerator + 'static) -> Self {
        self.id_generator = Box::new(generator);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &RequestStore {
        &self.store
    }

    // ── Validation ───────────────────────────────────────────────────

    pub fn validate(
        &self,
        selected: &[String],
        access_types: &HashMap<String, AccessType>,
        justifications: &HashMap<String, String>,
    ) -> ValidationReport {
        validation::validate(selected, access_types, justifications)
    }

    pub fn validate_draft(&self, draft: &RequestDraft) -> ValidationReport {
        validation::validate_draft(draft)
    }

    /// Non-blocking notes for a draft, including earlier denials in the store
    pub fn advisories(&self, draft: &RequestDraft) -> Vec<Advisory> {
        validation::advisories(draft, &self.store)
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Validate and submit a selection as a new pending request
    pub fn submit(
        &mut self,
        selected: &[String],
        access_types: &HashMap<String, AccessType>,
        justifications: &HashMap<String, String>,
    ) -> PermitResult<PermissionRequest> {
        self.submit_parts(selected, access_types, justifications, &HashMap::new())
    }

    /// Validate and submit a draft, evidence included.
    ///
    /// The draft is left untouched; callers reset it after success.
    pub fn submit_draft(&mut self, draft: &RequestDraft) -> PermitResult<PermissionRequest> {
        self.submit_parts(
            &draft.selected_ids(),
            draft.access_types(),
            draft.justifications(),
            draft.evidence(),
        )
    }

    fn submit_parts(
        &mut self,
        selected: &[String],
        access_types: &HashMap<String, AccessType>,
        justifications: &HashMap<String, String>,
        evidence: &HashMap<String, Evidence>,
    ) -> PermitResult<PermissionRequest> {
        let mut seen = HashSet::new();
        if let Some(repeated) = selected.iter().find(|id| !seen.insert(id.as_str())) {
            tracing::debug!(permission = %repeated, "Submission rejected: permission repeated");
            return Err(PermitError::DuplicateSelection(repeated.clone()));
        }

        let report = validation::validate(selected, access_types, justifications);
        if !report.is_valid() {
            tracing::debug!(errors = %report, "Submission rejected by validation");
            return Err(PermitError::Validation(report));
        }

        let permissions = selected
            .iter()
            .map(|id| self.catalog.require(id).cloned())
            .collect::<PermitResult<Vec<_>>>()?;

        let chosen_types = selected
            .iter()
            .filter_map(|id| access_types.get(id).map(|t| (id.clone(), *t)))
            .collect();
        let chosen_justifications = selected
            .iter()
            .filter_map(|id| justifications.get(id).map(|j| (id.clone(), j.clone())))
            .collect();
        let chosen_evidence = selected
            .iter()
            .filter_map(|id| {
                evidence
                    .get(id)
                    .filter(|e| !e.is_empty())
                    .map(|e| (id.clone(), e.clone()))
            })
            .collect();

        let id = self.fresh_id()?;
        let first_stage = ApprovalStage::first();
        let approver = self.approvers.approver_for(first_stage);
        let request = PermissionRequest::new(id, approver, permissions)
            .with_access_types(chosen_types)
            .with_justifications(chosen_justifications)
            .with_evidence(chosen_evidence);

        tracing::info!(
            request_id = %request.id,
            permissions = request.permissions.len(),
            approver = %request.approver,
            "Permission request submitted"
        );

        self.store.insert(request.clone());
        Ok(request)
    }

    /// Draw ids until one is free in the store
    fn fresh_id(&self) -> PermitResult<RequestId> {
        let attempts = self.config.id_attempts.max(1);
        for attempt in 1..=attempts {
            let id = self.id_generator.generate();
            if !self.store.contains(&id) {
                return Ok(id);
            }
            tracing::warn!(request_id = %id, attempt, "Generated request id already in use");
        }
        Err(PermitError::IdExhausted { attempts })
    }

    // ── Decisions ────────────────────────────────────────────────────

    /// Approve a request at its current stage
    pub fn approve(
        &mut self,
        request_id: &RequestId,
        stage: ApprovalStage,
        comments: &str,
    ) -> PermitResult<&PermissionRequest> {
        self.decide(request_id, Decision::Approved, stage, comments)
    }

    /// Deny a request at its current stage
    pub fn deny(
        &mut self,
        request_id: &RequestId,
        stage: ApprovalStage,
        comments: &str,
    ) -> PermitResult<&PermissionRequest> {
        self.decide(request_id, Decision::Denied, stage, comments)
    }

    /// Apply one decision; the request is unchanged on any error
    pub fn decide(
        &mut self,
        request_id: &RequestId,
        decision: Decision,
        stage: ApprovalStage,
        comments: &str,
    ) -> PermitResult<&PermissionRequest> {
        if self.config.require_comments && comments.trim().is_empty() {
            return Err(PermitError::CommentRequired);
        }

        let request = self
            .store
            .get_mut(request_id)
            .ok_or_else(|| PermitError::RequestNotFound(request_id.clone()))?;

        match self
            .state_machine
            .apply(request, decision, stage, self.approvers.as_ref(), comments)
        {
            Ok(entry) => {
                tracing::info!(
                    request_id = %request_id,
                    stage = %entry.stage,
                    outcome = %entry.outcome,
                    approver = %entry.approver,
                    state = %request.state,
                    "Approval decision recorded"
                );
                Ok(&*request)
            }
            Err(err) => {
                tracing::debug!(request_id = %request_id, error = %err, "Decision rejected");
                Err(err)
            }
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, request_id: &RequestId) -> PermitResult<&PermissionRequest> {
        self.store
            .get(request_id)
            .ok_or_else(|| PermitError::RequestNotFound(request_id.clone()))
    }

    /// All requests, newest first
    pub fn requests(&self) -> Vec<&PermissionRequest> {
        self.store.list()
    }

    /// Requests waiting on a given stage
    pub fn queue(&self, stage: ApprovalStage) -> Vec<&PermissionRequest> {
        self.store.pending_for(stage)
    }
}

impl Default for PermitController {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequentialIdGenerator;

    fn controller() -> PermitController {
        PermitController::default().with_id_generator(SequentialIdGenerator::new())
    }

    fn user_read_draft(controller: &PermitController) -> RequestDraft {
        let mut draft = RequestDraft::new();
        draft.select(controller.catalog().get("User.Read").unwrap());
        draft.set_access_type("User.Read", AccessType::Delegated);
        draft.set_justification("User.Read", "needed for login");
        draft
    }

    #[test]
    fn test_submit_creates_pending_request() {
        let mut c = controller();
        let draft = user_read_draft(&c);
        let req = c.submit_draft(&draft).unwrap();

        assert_eq!(req.id.as_str(), "REQ-001");
        assert_eq!(req.state, RequestState::initial());
        assert_eq!(req.approver, "John Doe");
        assert!(req.approval_history.is_empty());
        assert_eq!(req.access_types["User.Read"], AccessType::Delegated);
        assert_eq!(c.requests().len(), 1);
    }

    #[test]
    fn test_submit_invalid_stores_nothing() {
        let mut c = controller();
        let err = c
            .submit(&[], &HashMap::new(), &HashMap::new())
            .unwrap_err();
        assert!(err.is_validation());
        assert!(c.store().is_empty());
    }

    #[test]
    fn test_submit_unknown_permission() {
        let mut c = controller();
        let selected = vec!["Calendars.Read".to_string()];
        let types = HashMap::from([("Calendars.Read".to_string(), AccessType::Delegated)]);
        let texts = HashMap::from([("Calendars.Read".to_string(), "meetings".to_string())]);
        let err = c.submit(&selected, &types, &texts).unwrap_err();
        assert!(matches!(err, PermitError::UnknownPermission(id) if id == "Calendars.Read"));
        assert!(c.store().is_empty());
    }

    #[test]
    fn test_submit_rejects_repeated_permission() {
        let mut c = controller();
        let selected = vec!["User.Read".to_string(), "User.Read".to_string()];
        let types = HashMap::from([("User.Read".to_string(), AccessType::Delegated)]);
        let texts = HashMap::from([("User.Read".to_string(), "login".to_string())]);

        let err = c.submit(&selected, &types, &texts).unwrap_err();
        assert!(matches!(err, PermitError::DuplicateSelection(id) if id == "User.Read"));
        assert!(c.store().is_empty());
    }

    #[test]
    fn test_custom_approver_directory() {
        struct Rotation;
        impl ApproverDirectory for Rotation {
            fn approver_for(&self, stage: ApprovalStage) -> String {
                format!("{} on-call", stage)
            }
        }

        let mut c = controller().with_approvers(Rotation);
        let draft = user_read_draft(&c);
        let id = c.submit_draft(&draft).unwrap().id;
        assert_eq!(c.get(&id).unwrap().approver, "Business on-call");

        let req = c.approve(&id, ApprovalStage::Business, "ok").unwrap();
        assert_eq!(req.approver, "Technical on-call");
        assert_eq!(req.approval_history[0].approver, "Business on-call");
    }

    #[test]
    fn test_submit_keeps_only_selected_fields() {
        let mut c = controller();
        let mut draft = user_read_draft(&c);
        draft.set_justification("Mail.Send", "left over from an earlier edit");
        let req = c.submit_draft(&draft).unwrap();
        assert_eq!(req.justifications.len(), 1);
        assert!(req.evidence.is_empty());
    }

    #[test]
    fn test_submit_carries_evidence() {
        let mut c = controller();
        let mut draft = RequestDraft::new();
        draft.select(c.catalog().get("Mail.Read").unwrap());
        draft.set_access_type("Mail.Read", AccessType::Delegated);
        draft.set_justification("Mail.Read", "shared mailbox triage");
        draft
            .add_link("Mail.Read", "https://contoso.example/glr/1187")
            .unwrap();

        let req = c.submit_draft(&draft).unwrap();
        assert_eq!(req.evidence["Mail.Read"].links.len(), 1);
    }

    #[test]
    fn test_unknown_request() {
        let mut c = controller();
        let err = c
            .approve(&RequestId::new("REQ-404"), ApprovalStage::Business, "ok")
            .unwrap_err();
        assert!(matches!(err, PermitError::RequestNotFound(_)));
    }

    #[test]
    fn test_comment_policy() {
        let mut c = PermitController::new(EngineConfig::default().with_require_comments(true))
            .with_id_generator(SequentialIdGenerator::new());
        let draft = user_read_draft(&c);
        let id = c.submit_draft(&draft).unwrap().id;

        let err = c.approve(&id, ApprovalStage::Business, "  ").unwrap_err();
        assert!(matches!(err, PermitError::CommentRequired));
        assert!(c.get(&id).unwrap().approval_history.is_empty());

        c.approve(&id, ApprovalStage::Business, "fine").unwrap();
        assert_eq!(c.get(&id).unwrap().approval_history.len(), 1);
    }

    #[test]
    fn test_id_collision_retries_then_exhausts() {
        struct Fixed;
        impl RequestIdGenerator for Fixed {
            fn generate(&self) -> RequestId {
                RequestId::new("REQ-SAME")
            }
        }

        let mut c = PermitController::new(EngineConfig::default().with_id_attempts(3))
            .with_id_generator(Fixed);
        let draft = user_read_draft(&c);
        c.submit_draft(&draft).unwrap();

        let err = c.submit_draft(&draft).unwrap_err();
        assert!(matches!(err, PermitError::IdExhausted { attempts: 3 }));
        assert_eq!(c.requests().len(), 1);
    }

    #[test]
    fn test_queue_and_denial_advisory() {
        let mut c = controller();
        let draft = user_read_draft(&c);
        let first = c.submit_draft(&draft).unwrap().id;
        let second = c.submit_draft(&draft).unwrap().id;

        c.approve(&first, ApprovalStage::Business, "ok").unwrap();
        assert_eq!(c.queue(ApprovalStage::Business).len(), 1);
        assert_eq!(c.queue(ApprovalStage::Technical)[0].id, first);

        c.deny(&second, ApprovalStage::Business, "duplicate").unwrap();
        let notes = c.advisories(&draft);
        assert!(notes.iter().any(|n| matches!(
            n,
            Advisory::DeniedEarlier { permission, .. } if permission == "User.Read"
        )));
    }
}
