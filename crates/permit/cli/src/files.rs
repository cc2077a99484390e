//! Input documents: catalogs, drafts and sessions (YAML or JSON)

use crate::error::{CliError, CliResult};
use permit_engine::PermissionCatalog;
use permit_types::{AccessType, Permission, RequestDraft};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read a YAML or JSON document, chosen by file extension
pub fn read_document<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let contents = std::fs::read_to_string(path)?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_str(&contents)?)
    }
}

/// The catalog file when given, the built-in catalog otherwise
pub fn load_catalog(path: Option<&str>) -> CliResult<PermissionCatalog> {
    match path {
        Some(path) => {
            let entries: Vec<Permission> = read_document(path)?;
            let catalog = PermissionCatalog::from_entries(entries)?;
            tracing::debug!(path, entries = catalog.len(), "Loaded permission catalog");
            Ok(catalog)
        }
        None => Ok(PermissionCatalog::builtin()),
    }
}

// ── Draft Documents ──────────────────────────────────────────────────

/// A request draft as written in a file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftDocument {
    #[serde(default)]
    pub permissions: Vec<DraftEntry>,
}

/// One requested permission and everything entered for it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftEntry {
    pub permission: String,
    /// Application, Delegated, Both or None
    #[serde(rename = "type", default)]
    pub access_type: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub sites: Vec<String>,
}

impl DraftDocument {
    /// Fill a draft from catalog entries.
    ///
    /// Unknown permissions, unparseable access types and evidence on
    /// permissions without a review flag are input errors. Missing types
    /// and justifications are left for validation to report.
    pub fn to_draft(&self, catalog: &PermissionCatalog) -> CliResult<RequestDraft> {
        let mut draft = RequestDraft::new();
        for entry in &self.permissions {
            let permission = catalog.require(&entry.permission)?;
            if draft.is_selected(permission.id()) {
                return Err(CliError::InvalidInput(format!(
                    "{} is listed more than once",
                    permission.id()
                )));
            }
            draft.select(permission);

            let id = permission.id();
            if let Some(access_type) = &entry.access_type {
                draft.set_access_type(id, access_type.parse::<AccessType>()?);
            }
            if let Some(text) = &entry.justification {
                draft.set_justification(id, text.as_str());
            }
            for file in &entry.attachments {
                draft.add_attachment(id, file.as_str())?;
            }
            for link in &entry.links {
                draft.add_link(id, link.as_str())?;
            }
            for site in &entry.sites {
                draft.add_site(id, site.as_str())?;
            }
        }
        Ok(draft)
    }
}
