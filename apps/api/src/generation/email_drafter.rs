//! Email Drafter: asks the model for a cold application email tailored to one job.
//!
//! Returns the model text verbatim. Structure (subject line first) is requested in the
//! prompt but checked nowhere here; `email_parser` copes with whatever comes back.

use tracing::info;

use crate::errors::AppError;
use crate::generation::job_extractor::JobRecord;
use crate::generation::prompts::{EMAIL_DRAFT_PROMPT_TEMPLATE, EMAIL_DRAFT_SYSTEM};
use crate::llm_client::prompts::{DETERMINISTIC_TEMPERATURE, NO_PREAMBLE_INSTRUCTION};
use crate::llm_client::CompletionService;

/// Text form of a job record as embedded in the drafting prompt.
pub fn job_details_block(job: &JobRecord) -> String {
    [
        ("Title", &job.title),
        ("Company", &job.company),
        ("Role", &job.role),
        ("Experience", &job.experience),
        ("Skills", &job.skills),
        ("Description", &job.description),
    ]
    .iter()
    .map(|(label, value)| format!("{label}: {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Substitutes every placeholder in one left-to-right pass over the template.
/// Inserted values are never rescanned, so placeholder text inside them stays literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn build_draft_prompt(job: &JobRecord, resume_text: &str) -> String {
    let job_details = job_details_block(job);
    fill_template(
        EMAIL_DRAFT_PROMPT_TEMPLATE,
        &[
            ("{job_details}", job_details.as_str()),
            ("{no_preamble}", NO_PREAMBLE_INSTRUCTION),
            ("{resume_data}", resume_text),
        ],
    )
}

/// Drafts the raw email text (subject line plus body, by convention only).
pub async fn draft_email(
    job: &JobRecord,
    resume_text: &str,
    llm: &dyn CompletionService,
) -> Result<String, AppError> {
    let prompt = build_draft_prompt(job, resume_text);
    info!("Drafting email for '{}' at '{}'", job.title, job.company);
    let raw = llm
        .complete(EMAIL_DRAFT_SYSTEM, &prompt, DETERMINISTIC_TEMPERATURE)
        .await?;
    Ok(raw)
}
