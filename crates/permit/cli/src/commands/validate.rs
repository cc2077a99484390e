//! Draft validation

use crate::error::{CliError, CliResult};
use crate::files::{self, DraftDocument};
use crate::output::{self, print_error, print_success, print_warning, OutputFormat};
use permit_engine::{Advisory, PermitController};
use serde::Serialize;

/// Validation result for one draft file
#[derive(Debug, Serialize)]
struct DraftReport<'a> {
    file: &'a str,
    valid: bool,
    errors: &'a [String],
    advisories: &'a [Advisory],
}

/// Validate a draft file against the controller's catalog.
///
/// Advisories are printed for valid and invalid drafts alike. An invalid
/// draft is reported as an error so the process exits non-zero.
pub fn execute(controller: &PermitController, file: &str, format: OutputFormat) -> CliResult<()> {
    let document: DraftDocument = files::read_document(file)?;
    let draft = document.to_draft(controller.catalog())?;

    let report = controller.validate_draft(&draft);
    let advisories = controller.advisories(&draft);
    tracing::debug!(
        file,
        selected = draft.selected().len(),
        errors = report.errors().len(),
        advisories = advisories.len(),
        "Validated draft"
    );

    match format {
        OutputFormat::Table => {
            for error in report.errors() {
                print_error(error);
            }
            for advisory in &advisories {
                print_warning(&advisory.to_string());
            }
            if report.is_valid() {
                print_success(&format!(
                    "{}: {} permission(s) ready to submit",
                    file,
                    draft.selected().len()
                ));
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => output::print_single(
            &DraftReport {
                file,
                valid: report.is_valid(),
                errors: report.errors(),
                advisories: &advisories,
            },
            format,
        )?,
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err(CliError::InvalidInput(format!(
            "{} failed validation with {} error(s)",
            file,
            report.errors().len()
        )))
    }
}
