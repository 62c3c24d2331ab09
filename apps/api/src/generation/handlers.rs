//! Axum route handlers for the Draft API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::job_extractor::{extract_jobs, JobRecord};
use crate::generation::pipeline::generate_draft;
use crate::resume::extract_resume_text;
use crate::state::AppState;
use crate::text::normalize_text;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractJobsRequest {
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractJobsResponse {
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DraftEmailRequest {
    pub job_text: String,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct DraftEmailResponse {
    pub subject: String,
    pub body: String,
    pub job_title: String,
    pub company: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeTextResponse {
    pub filename: Option<String>,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/extract
///
/// Cleans a raw job description and returns the structured job records.
/// Useful for previewing extraction before drafting.
pub async fn handle_extract_jobs(
    State(state): State<AppState>,
    Json(request): Json<ExtractJobsRequest>,
) -> Result<Json<ExtractJobsResponse>, AppError> {
    let normalized = normalize_text(&request.job_text);
    if normalized.is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    let jobs = extract_jobs(&normalized, state.llm.as_ref()).await?;

    Ok(Json(ExtractJobsResponse { jobs }))
}

/// POST /api/v1/emails/draft
///
/// Full pipeline: clean → extract → draft → split. Drafts for the first job found.
pub async fn handle_draft_email(
    State(state): State<AppState>,
    Json(request): Json<DraftEmailRequest>,
) -> Result<Json<DraftEmailResponse>, AppError> {
    if request.job_text.trim().is_empty() || request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "job_text and resume_text are both required".to_string(),
        ));
    }

    let outcome =
        generate_draft(&request.job_text, &request.resume_text, state.llm.as_ref()).await?;

    Ok(Json(DraftEmailResponse {
        subject: outcome.draft.subject,
        body: outcome.draft.body,
        job_title: outcome.job.title,
        company: outcome.job.company,
    }))
}

/// POST /api/v1/resume/extract
///
/// Multipart upload with a single `file` field holding a PDF resume.
pub async fn handle_extract_resume(
    mut multipart: Multipart,
) -> Result<Json<ResumeTextResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        let text = extract_resume_text(data).await?;
        return Ok(Json(ResumeTextResponse { filename, text }));
    }

    Err(AppError::Validation(
        "Multipart field 'file' with a PDF resume is required".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::generation::test_support::StubCompletion;
    use crate::llm_client::LlmError;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn app(responses: Vec<Result<String, LlmError>>) -> Router {
        build_router(AppState {
            llm: Arc::new(StubCompletion::new(responses)),
            mailer: None,
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_extract_returns_normalized_records() {
        let app = app(vec![Ok(r#"{"title":"Engineer","company":"Acme"}"#.to_string())]);
        let (status, body) =
            post_json(app, "/api/v1/jobs/extract", json!({"job_text": "Engineer at Acme"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"][0]["title"], "Engineer");
        assert_eq!(body["jobs"][0]["skills"], "N/A");
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_text() {
        let (status, body) =
            post_json(app(vec![]), "/api/v1/jobs/extract", json!({"job_text": " <p></p> "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_parse_failure_is_422_with_hint() {
        let app = app(vec![Ok("not json".to_string())]);
        let (status, body) =
            post_json(app, "/api/v1/jobs/extract", json!({"job_text": "Engineer"})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "JSON_PARSE_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Try shortening the input"));
    }

    #[tokio::test]
    async fn test_draft_returns_subject_body_and_job() {
        let app = app(vec![
            Ok(r#"{"title":"Data Engineer","company":"Globex"}"#.to_string()),
            Ok("Subject: Data Engineer role\n\nHello,\nI love pipelines.".to_string()),
        ]);
        let (status, body) = post_json(
            app,
            "/api/v1/emails/draft",
            json!({"job_text": "Data Engineer at Globex", "resume_text": "Jane Doe"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"], "Data Engineer role");
        assert_eq!(body["body"], "Hello,\nI love pipelines.");
        assert_eq!(body["job_title"], "Data Engineer");
        assert_eq!(body["company"], "Globex");
    }

    #[tokio::test]
    async fn test_draft_requires_resume_text() {
        let (status, _) = post_json(
            app(vec![]),
            "/api/v1/emails/draft",
            json!({"job_text": "Engineer", "resume_text": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let app = app(vec![Err(LlmError::Api {
            status: 429,
            message: "rate limited".to_string(),
        })]);
        let (status, body) =
            post_json(app, "/api/v1/jobs/extract", json!({"job_text": "Engineer"})).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("429"));
    }

    #[tokio::test]
    async fn test_resume_upload_rejects_non_pdf() {
        let boundary = "XBOUNDARY";
        let multipart = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"resume.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nJane Doe\r\n--{boundary}--\r\n"
        );
        let response = app(vec![])
            .oneshot(
                Request::post("/api/v1/resume/extract")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(multipart))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
