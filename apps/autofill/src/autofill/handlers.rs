//! Axum route handlers for the Autofill API.

use axum::{
    extract::{Multipart, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::autofill::document::{Control, Document};
use crate::autofill::engine::AutofillReport;
use crate::autofill::memory::{MemoryDocument, Mutation};
use crate::autofill::plan::{build_plan, FillPlan};
use crate::errors::AppError;
use crate::models::{Profile, ResumeAttachment};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: FillPlan,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub report: AutofillReport,
    pub controls: Vec<Control>,
    pub journal: Vec<Mutation>,
}

/// Parts collected from the preview multipart body.
#[derive(Default)]
struct PreviewForm {
    html: Option<String>,
    profile: Option<Profile>,
    resume: Option<ResumeAttachment>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/autofill/plan
///
/// Returns what would be written for a profile, without any document.
pub async fn handle_plan(Json(request): Json<PlanRequest>) -> Json<PlanResponse> {
    Json(PlanResponse {
        plan: build_plan(&request.profile),
    })
}

/// POST /api/v1/autofill/preview
///
/// Multipart fields: `html` (required), `profile` (JSON, optional), `resume`
/// (file, optional). Without a `profile` part the bearer token is used to load
/// profile and resume from the backend.
pub async fn handle_preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<PreviewResponse>, AppError> {
    let form = read_preview_form(multipart).await?;

    let html = form
        .html
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| AppError::Validation("html cannot be empty".to_string()))?;

    let (profile, resume) = match form.profile {
        Some(profile) => (profile, form.resume),
        None => {
            let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
            debug!("Loading profile from backend at {}", state.config.backend_url);
            let profile = state.backend.fetch_profile(token).await?;
            let resume = match form.resume {
                Some(resume) => Some(resume),
                None => state.backend.fetch_resume(token).await?,
            };
            (profile, resume)
        }
    };

    let document = Mutex::new(MemoryDocument::parse(&html));
    let report = state.engine.run(&document, &profile, resume.as_ref()).await;

    let document = document.into_inner();
    Ok(Json(PreviewResponse {
        report,
        controls: document.controls(),
        journal: document.journal().to_vec(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_preview_form(mut multipart: Multipart) -> Result<PreviewForm, AppError> {
    let mut form = PreviewForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "html" => {
                form.html = Some(field.text().await.map_err(multipart_error)?);
            }
            "profile" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let profile = serde_json::from_str::<Profile>(&raw)
                    .map_err(|e| AppError::Validation(format!("profile is not valid JSON: {e}")))?;
                form.profile = Some(profile);
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/pdf")
                    .to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                if !content.is_empty() {
                    form.resume = Some(ResumeAttachment {
                        content,
                        filename,
                        content_type,
                    });
                }
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }

    Ok(form)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart field: {e}"))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
