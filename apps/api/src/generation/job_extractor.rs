//! Job Extractor: turns normalized job-description text into structured job records.
//!
//! The prompt asks the model for the six keys and an "N/A" sentinel, but nothing forces it
//! to comply. Every parsed record is normalized afterwards so the six-key contract holds
//! regardless of what the model emitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{JOB_EXTRACT_PROMPT_TEMPLATE, JOB_EXTRACT_SYSTEM};
use crate::llm_client::prompts::{DETERMINISTIC_TEMPERATURE, JSON_ONLY_SYSTEM};
use crate::llm_client::{strip_json_fences, CompletionService};

/// Placeholder for any field the source text did not mention.
pub const NOT_AVAILABLE: &str = "N/A";

/// One job posting as extracted from a description. All six fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub role: String,
    pub experience: String,
    pub skills: String,
    pub description: String,
}

impl JobRecord {
    /// Builds a record from one JSON object, defaulting absent or null keys to `N/A`.
    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let field = |key: &str| {
            object
                .get(key)
                .map_or_else(|| NOT_AVAILABLE.to_string(), render_field)
        };
        Self {
            title: field("title"),
            company: field("company"),
            role: field("role"),
            experience: field("experience"),
            skills: field("skills"),
            description: field("description"),
        }
    }
}

/// Renders a loosely typed model value as a field string.
fn render_field(value: &Value) -> String {
    let rendered = match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_field)
            .filter(|s| !s.is_empty() && s != NOT_AVAILABLE)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    if rendered.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        rendered
    }
}

/// Parses raw model output into job records.
///
/// The whole reply is tried first; failing that, the first fenced block anywhere in it.
/// An object becomes a one-element list, an array is kept in order. Anything else,
/// including arrays holding non-objects, is a `JsonParse` error.
pub fn parse_job_records(raw: &str) -> Result<Vec<JobRecord>, AppError> {
    let value: Value = serde_json::from_str(raw.trim())
        .or_else(|err| {
            let fenced = strip_json_fences(raw);
            if fenced == raw.trim() {
                Err(err)
            } else {
                serde_json::from_str(fenced)
            }
        })
        .map_err(|e| AppError::JsonParse(e.to_string()))?;

    match value {
        Value::Object(object) => Ok(vec![JobRecord::from_object(&object)]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(object) => Ok(JobRecord::from_object(object)),
                _ => Err(AppError::JsonParse(format!(
                    "array element {i} is not a JSON object"
                ))),
            })
            .collect(),
        _ => Err(AppError::JsonParse(
            "expected a JSON object or array".to_string(),
        )),
    }
}

/// Extracts job records from already-normalized description text.
pub async fn extract_jobs(
    normalized_text: &str,
    llm: &dyn CompletionService,
) -> Result<Vec<JobRecord>, AppError> {
    let prompt = JOB_EXTRACT_PROMPT_TEMPLATE.replace("{page_data}", normalized_text);
    let system = format!("{JOB_EXTRACT_SYSTEM} {JSON_ONLY_SYSTEM}");
    let raw = llm
        .complete(&system, &prompt, DETERMINISTIC_TEMPERATURE)
        .await?;
    let jobs = parse_job_records(&raw)?;
    info!("Extracted {} job record(s)", jobs.len());
    Ok(jobs)
}
