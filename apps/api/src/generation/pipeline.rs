//! Draft pipeline: orchestrates the full job-description-to-email flow.
//!
//! Flow: normalize_text → extract_jobs → first job → draft_email → split_subject_body.
//!
//! Strictly sequential. The drafting call cannot start before extraction has produced a job.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::email_drafter::draft_email;
use crate::generation::email_parser::{split_subject_body, EmailDraft};
use crate::generation::job_extractor::{extract_jobs, JobRecord};
use crate::llm_client::CompletionService;
use crate::text::normalize_text;

/// A ready-to-review draft plus the job it was written for.
#[derive(Debug, Clone, Serialize)]
pub struct DraftOutcome {
    pub job: JobRecord,
    pub draft: EmailDraft,
}

/// Runs the whole pipeline on raw job-description text and raw resume text.
///
/// Only the first extracted job is drafted for.
pub async fn generate_draft(
    job_text: &str,
    resume_text: &str,
    llm: &dyn CompletionService,
) -> Result<DraftOutcome, AppError> {
    let normalized = normalize_text(job_text);
    if normalized.is_empty() {
        return Err(AppError::Validation(
            "Job description has no usable text after cleaning".to_string(),
        ));
    }
    info!(
        "Normalized job description: {} -> {} chars",
        job_text.len(),
        normalized.len()
    );

    let job = extract_jobs(&normalized, llm)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            AppError::UnprocessableEntity(
                "Could not extract job details from the provided description".to_string(),
            )
        })?;

    let raw_email = draft_email(&job, resume_text, llm).await?;
    let draft = split_subject_body(&raw_email);
    info!("Draft ready: subject='{}'", draft.subject);

    Ok(DraftOutcome { job, draft })
}
