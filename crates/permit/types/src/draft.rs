//! Request drafts: the editable form behind a submission
//!
//! A draft holds the selected catalog entries in selection order along
//! with the per-permission access type, justification and evidence.
//! Nothing in a draft is checked until validation runs.

use crate::{AccessType, Evidence, Permission, PermitError, PermitResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An unsubmitted permission request
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RequestDraft {
    selected: Vec<Permission>,
    access_types: HashMap<String, AccessType>,
    justifications: HashMap<String, String>,
    evidence: HashMap<String, Evidence>,
}

impl RequestDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a permission; selecting it again is a no-op
    pub fn select(&mut self, permission: &Permission) {
        if !self.is_selected(permission.id()) {
            self.selected.push(permission.clone());
        }
    }

    /// Select or deselect a permission. Returns whether it is now selected.
    pub fn toggle(&mut self, permission: &Permission) -> bool {
        if self.is_selected(permission.id()) {
            self.deselect(permission.id());
            false
        } else {
            self.selected.push(permission.clone());
            true
        }
    }

    /// Remove a permission together with everything entered for it
    pub fn deselect(&mut self, permission: &str) {
        self.selected.retain(|p| p.permission != permission);
        self.access_types.remove(permission);
        self.justifications.remove(permission);
        self.evidence.remove(permission);
    }

    pub fn is_selected(&self, permission: &str) -> bool {
        self.selected.iter().any(|p| p.permission == permission)
    }

    pub fn set_access_type(&mut self, permission: impl Into<String>, access_type: AccessType) {
        self.access_types.insert(permission.into(), access_type);
    }

    /// Apply the Application checkbox to a permission's current access type
    pub fn toggle_application(&mut self, permission: &str, checked: bool) -> AccessType {
        let next = self.access_type(permission).toggle_application(checked);
        self.set_access_type(permission, next);
        next
    }

    /// Apply the Delegated checkbox to a permission's current access type
    pub fn toggle_delegated(&mut self, permission: &str, checked: bool) -> AccessType {
        let next = self.access_type(permission).toggle_delegated(checked);
        self.set_access_type(permission, next);
        next
    }

    pub fn set_justification(&mut self, permission: impl Into<String>, text: impl Into<String>) {
        self.justifications.insert(permission.into(), text.into());
    }

    pub fn add_attachment(
        &mut self,
        permission: &str,
        file_name: impl Into<String>,
    ) -> PermitResult<()> {
        self.evidence_mut(permission)?
            .attachments
            .push(file_name.into());
        Ok(())
    }

    pub fn add_link(&mut self, permission: &str, link: impl Into<String>) -> PermitResult<()> {
        self.evidence_mut(permission)?.links.push(link.into());
        Ok(())
    }

    pub fn add_site(&mut self, permission: &str, site: impl Into<String>) -> PermitResult<()> {
        self.evidence_mut(permission)?.sites.push(site.into());
        Ok(())
    }

    /// Evidence is only accepted for selected permissions with a review flag
    fn evidence_mut(&mut self, permission: &str) -> PermitResult<&mut Evidence> {
        let entry = self
            .selected
            .iter()
            .find(|p| p.permission == permission)
            .ok_or_else(|| PermitError::NotSelected(permission.to_string()))?;
        if !entry.requires_review() {
            return Err(PermitError::EvidenceNotAccepted(permission.to_string()));
        }
        Ok(self.evidence.entry(permission.to_string()).or_default())
    }

    /// Current access type for a permission (`None` when never set)
    pub fn access_type(&self, permission: &str) -> AccessType {
        self.access_types
            .get(permission)
            .copied()
            .unwrap_or_default()
    }

    pub fn selected(&self) -> &[Permission] {
        &self.selected
    }

    /// Selected permission ids, in selection order
    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().map(|p| p.permission.clone()).collect()
    }

    pub fn access_types(&self) -> &HashMap<String, AccessType> {
        &self.access_types
    }

    pub fn justifications(&self) -> &HashMap<String, String> {
        &self.justifications
    }

    pub fn evidence(&self) -> &HashMap<String, Evidence> {
        &self.evidence
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Reset the form after a successful submission
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionKind;

    fn mail_read() -> Permission {
        Permission::new(PermissionKind::Delegated, "Mail.Read", "Read user mail")
            .with_glr()
            .with_api_scan()
    }

    fn user_read() -> Permission {
        Permission::new(PermissionKind::Delegated, "User.Read", "Sign in and read user profile")
    }

    #[test]
    fn test_toggle_selection_keeps_order() {
        let mut draft = RequestDraft::new();
        assert!(draft.toggle(&mail_read()));
        assert!(draft.toggle(&user_read()));
        assert_eq!(draft.selected_ids(), vec!["Mail.Read", "User.Read"]);

        assert!(!draft.toggle(&mail_read()));
        assert_eq!(draft.selected_ids(), vec!["User.Read"]);
    }

    #[test]
    fn test_select_twice_is_noop() {
        let mut draft = RequestDraft::new();
        draft.select(&user_read());
        draft.select(&user_read());
        assert_eq!(draft.selected().len(), 1);
    }

    #[test]
    fn test_deselect_drops_entered_fields() {
        let mut draft = RequestDraft::new();
        draft.select(&mail_read());
        draft.set_access_type("Mail.Read", AccessType::Delegated);
        draft.set_justification("Mail.Read", "triage shared inbox");
        draft.add_link("Mail.Read", "https://contoso.example/glr/42").unwrap();

        draft.deselect("Mail.Read");
        assert!(draft.is_empty());
        assert!(draft.access_types().is_empty());
        assert!(draft.justifications().is_empty());
        assert!(draft.evidence().is_empty());
    }

    #[test]
    fn test_checkbox_toggles() {
        let mut draft = RequestDraft::new();
        draft.select(&user_read());
        assert_eq!(draft.access_type("User.Read"), AccessType::None);
        assert_eq!(draft.toggle_delegated("User.Read", true), AccessType::Delegated);
        assert_eq!(draft.toggle_application("User.Read", true), AccessType::Both);
        assert_eq!(draft.toggle_delegated("User.Read", false), AccessType::Application);
        assert_eq!(draft.toggle_application("User.Read", false), AccessType::None);
    }

    #[test]
    fn test_evidence_requires_flagged_selection() {
        let mut draft = RequestDraft::new();
        assert!(matches!(
            draft.add_site("Mail.Read", "contoso.sharepoint.com"),
            Err(PermitError::NotSelected(_))
        ));

        draft.select(&user_read());
        assert!(matches!(
            draft.add_attachment("User.Read", "review.pdf"),
            Err(PermitError::EvidenceNotAccepted(_))
        ));

        draft.select(&mail_read());
        draft.add_attachment("Mail.Read", "review.pdf").unwrap();
        draft.add_site("Mail.Read", "contoso.sharepoint.com").unwrap();
        assert_eq!(draft.evidence()["Mail.Read"].len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut draft = RequestDraft::new();
        draft.select(&user_read());
        draft.set_justification("User.Read", "login");
        draft.clear();
        assert!(draft.is_empty());
        assert!(draft.justifications().is_empty());
    }
}
