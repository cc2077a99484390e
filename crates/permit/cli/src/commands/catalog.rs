//! Catalog listing

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use permit_engine::PermissionCatalog;
use permit_types::Permission;
use serde::Serialize;
use tabled::Tabled;

/// Table row for catalog display
#[derive(Debug, Serialize, Tabled)]
struct CatalogRow {
    #[tabled(rename = "Permission")]
    permission: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Reviews")]
    reviews: String,
}

impl From<&Permission> for CatalogRow {
    fn from(p: &Permission) -> Self {
        let reviews: Vec<String> = p.requirements().iter().map(ToString::to_string).collect();
        Self {
            permission: p.permission.clone(),
            kind: p.permission_type.to_string(),
            description: p.description.clone(),
            reviews: if reviews.is_empty() {
                "-".into()
            } else {
                reviews.join(", ")
            },
        }
    }
}

/// List catalog entries, optionally filtered by a search query
pub fn execute(
    catalog: &PermissionCatalog,
    search: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    let entries = catalog.search(search.unwrap_or_default());
    match format {
        OutputFormat::Table => {
            output::print_output(entries.into_iter().map(CatalogRow::from).collect(), format)
        }
        // Same layout as a --catalog file
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(&entries, format),
    }
}
