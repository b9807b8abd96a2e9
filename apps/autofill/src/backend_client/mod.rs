/// Backend client: fetches the caller's saved profile and resume from the
/// job-tracker backend.
///
/// The bearer token is passed through untouched; issuing and validating it is
/// the backend's business.
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Profile, ResumeAttachment};

const PROFILE_PATH: &str = "getProfile";
const RESUME_PATH: &str = "resume";
const FILENAME_HEADER: &str = "x-filename";
const DEFAULT_RESUME_FILENAME: &str = "resume.pdf";
const DEFAULT_RESUME_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error body shape the backend uses for every failure.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    /// GET /getProfile
    pub async fn fetch_profile(&self, token: &str) -> Result<Profile, BackendError> {
        let response = self
            .client
            .get(self.endpoint(PROFILE_PATH))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let profile: Profile = serde_json::from_str(&body)?;
        debug!("Fetched profile from backend");
        Ok(profile)
    }

    /// GET /resume
    ///
    /// The backend answers 500 when the user never uploaded a resume, so that
    /// status (and 404) means "no resume" rather than a failure.
    pub async fn fetch_resume(&self, token: &str) -> Result<Option<ResumeAttachment>, BackendError> {
        let response = self
            .client
            .get(self.endpoint(RESUME_PATH))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("Backend has no resume for this user (status {status})");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let headers = response.headers();
        let filename = header_str(headers, FILENAME_HEADER)
            .unwrap_or(DEFAULT_RESUME_FILENAME)
            .to_string();
        let content_type = header_str(headers, header::CONTENT_TYPE.as_str())
            .unwrap_or(DEFAULT_RESUME_MIME)
            .to_string();
        let content = response.bytes().await?;

        debug!("Fetched resume '{filename}' ({} bytes)", content.len());
        Ok(Some(ResumeAttachment {
            content,
            filename,
            content_type,
        }))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn header_str<'a>(headers: &'a header::HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Builds an `Api` error, preferring the backend's `{"error": ...}` message.
fn api_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<BackendErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string());
    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}
