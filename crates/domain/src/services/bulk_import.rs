//! Bulk insertion of selected import candidates.

use crate::models::{BulkImportOutcome, BulkImportReport, ImportOutcomeStatus, ImportableTemplate};

use super::template_store::TemplateStore;

/// Creates one template per selected, valid candidate.
///
/// Candidates are processed in order. A failed create is recorded and the
/// loop moves on; templates created earlier in the batch are kept.
pub async fn import_selected(
    store: &dyn TemplateStore,
    candidates: &[ImportableTemplate],
) -> BulkImportReport {
    let mut report = BulkImportReport::default();

    for candidate in candidates {
        let name = candidate.template.name.trim().to_string();

        if !candidate.is_selected || !candidate.is_valid() {
            report.record(BulkImportOutcome {
                candidate_id: candidate.id.clone(),
                name,
                status: ImportOutcomeStatus::Skipped,
                template_id: None,
                error: None,
            });
            continue;
        }

        match store.create_template(candidate.to_new_template()).await {
            Ok(created) => {
                tracing::debug!(
                    candidate_id = %candidate.id,
                    template_id = %created.id,
                    "Imported template"
                );
                report.record(BulkImportOutcome {
                    candidate_id: candidate.id.clone(),
                    name,
                    status: ImportOutcomeStatus::Created,
                    template_id: Some(created.id),
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!(
                    candidate_id = %candidate.id,
                    name = %name,
                    error = %e,
                    "Failed to import template"
                );
                report.record(BulkImportOutcome {
                    candidate_id: candidate.id.clone(),
                    name,
                    status: ImportOutcomeStatus::Failed,
                    template_id: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    tracing::info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failed,
        skipped = report.skipped,
        "Bulk template import finished"
    );

    report
}
