//! Permission catalog: the static list of requestable Graph permissions
//!
//! The catalog is reference data. It is loaded once at startup, keeps
//! its declaration order and is never mutated afterwards.

use permit_types::{Permission, PermissionKind, PermitError, PermitResult};
use std::collections::HashSet;

/// Read-only catalog of permissions
#[derive(Clone, Debug)]
pub struct PermissionCatalog {
    entries: Vec<Permission>,
}

impl PermissionCatalog {
    /// The seven entries shipped with the application
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                Permission::new(
                    PermissionKind::Delegated,
                    "User.Read",
                    "Sign in and read user profile",
                ),
                Permission::new(
                    PermissionKind::Delegated,
                    "User.ReadWrite",
                    "Read and write user profile",
                )
                .with_api_scan(),
                Permission::new(PermissionKind::Delegated, "Mail.Read", "Read user mail")
                    .with_glr()
                    .with_api_scan(),
                Permission::new(PermissionKind::Delegated, "Mail.Send", "Send mail as a user")
                    .with_api_scan(),
                Permission::new(
                    PermissionKind::Application,
                    "Application.Read.All",
                    "Read all applications",
                )
                .with_api_scan(),
                Permission::new(
                    PermissionKind::Application,
                    "Directory.Read.All",
                    "Read directory data",
                )
                .with_glr(),
                Permission::new(PermissionKind::Application, "Group.Read.All", "Read all groups")
                    .with_glr(),
            ],
        }
    }

    /// Build a catalog from externally loaded entries.
    ///
    /// Identifiers must be unique.
    pub fn from_entries(entries: Vec<Permission>) -> PermitResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.permission.as_str()) {
                return Err(PermitError::DuplicatePermission(entry.permission.clone()));
            }
        }
        tracing::debug!(entries = entries.len(), "Permission catalog loaded");
        Ok(Self { entries })
    }

    pub fn get(&self, permission: &str) -> Option<&Permission> {
        self.entries.iter().find(|p| p.permission == permission)
    }

    /// Like [`get`](Self::get) but unknown ids are an error
    pub fn require(&self, permission: &str) -> PermitResult<&Permission> {
        self.get(permission)
            .ok_or_else(|| PermitError::UnknownPermission(permission.to_string()))
    }

    /// Entries whose id or description contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&Permission> {
        self.entries.iter().filter(|p| p.matches(query)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[Permission] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_types::Requirement;

    #[test]
    fn test_builtin_entries() {
        let catalog = PermissionCatalog::builtin();
        assert_eq!(catalog.len(), 7);

        let ids: Vec<&str> = catalog.iter().map(|p| p.id()).collect();
        assert_eq!(
            ids,
            vec![
                "User.Read",
                "User.ReadWrite",
                "Mail.Read",
                "Mail.Send",
                "Application.Read.All",
                "Directory.Read.All",
                "Group.Read.All",
            ]
        );
    }

    #[test]
    fn test_builtin_flags() {
        let catalog = PermissionCatalog::builtin();
        let mail_read = catalog.get("Mail.Read").unwrap();
        assert_eq!(
            mail_read.requirements(),
            vec![Requirement::Glr, Requirement::ApiScan]
        );
        assert!(!catalog.get("User.Read").unwrap().requires_review());
        assert_eq!(
            catalog.get("Directory.Read.All").unwrap().permission_type,
            PermissionKind::Application
        );
    }

    #[test]
    fn test_search() {
        let catalog = PermissionCatalog::builtin();
        let mail: Vec<&str> = catalog.search("mail").iter().map(|p| p.id()).collect();
        assert_eq!(mail, vec!["Mail.Read", "Mail.Send"]);

        // Description match
        let profile = catalog.search("PROFILE");
        assert_eq!(profile.len(), 2);

        assert_eq!(catalog.search("").len(), 7);
        assert!(catalog.search("calendar").is_empty());
    }

    #[test]
    fn test_require_unknown() {
        let catalog = PermissionCatalog::builtin();
        assert!(catalog.require("User.Read").is_ok());
        assert!(matches!(
            catalog.require("Calendars.Read"),
            Err(PermitError::UnknownPermission(_))
        ));
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let entry = Permission::new(PermissionKind::Delegated, "User.Read", "Sign in");
        let result = PermissionCatalog::from_entries(vec![entry.clone(), entry]);
        assert!(matches!(result, Err(PermitError::DuplicatePermission(id)) if id == "User.Read"));
    }

    #[test]
    fn test_from_json_entries() {
        let json = r#"[
            {"permissionType": "Application", "permission": "Sites.Read.All",
             "description": "Read items in all site collections", "glr": true, "apiScan": false}
        ]"#;
        let entries: Vec<Permission> = serde_json::from_str(json).unwrap();
        let catalog = PermissionCatalog::from_entries(entries).unwrap();
        assert!(catalog.get("Sites.Read.All").unwrap().glr);
    }
}
