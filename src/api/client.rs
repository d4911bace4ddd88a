// HTTP client for the compliance API.
//
// Thin request/response wrapper: attaches the stored API key as an
// `X-API-Key` header when present, maps HTTP 429 to a distinguished
// rate-limit error so the UI can prompt for a key, and maps every other
// non-2xx or transport failure to a generic error carrying the response
// body's message. No retries, no backoff.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use reqwest::multipart;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::types::{ApiResponse, DocumentsPage, PoliciesPage};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Header carrying the user's API key on every request when one is stored.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Longest error-body excerpt surfaced to the UI.
const MAX_MESSAGE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 429: the demo-mode quota is exhausted. Routes the caller to the
    /// add-an-API-key flow instead of a generic failure message.
    #[error("rate limit reached: {message}")]
    RateLimited { message: String },

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Client for the compliance API.
///
/// The API key is behind an `RwLock` so the save/remove flows in the UI can
/// swap it at runtime while spawned request tasks hold the client in an
/// `Arc`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
    api_key: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a client for the given server. `api_key` is the key loaded
    /// from the local store at startup, if any.
    pub fn new(
        base_url: impl Into<String>,
        api_version: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            http: reqwest::Client::new(),
            base_url,
            api_version: api_version.into(),
            api_key: RwLock::new(api_key.filter(|k| !k.is_empty())),
        }
    }

    /// Store a key; subsequent requests carry it as `X-API-Key`.
    pub fn set_api_key(&self, key: String) {
        if let Ok(mut guard) = self.api_key.write() {
            *guard = Some(key).filter(|k| !k.is_empty());
        }
    }

    /// Drop the stored key, returning the client to demo mode.
    pub fn clear_api_key(&self) {
        if let Ok(mut guard) = self.api_key.write() {
            *guard = None;
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}{}", self.base_url, self.api_version, path)
    }

    /// Attach the stored API key header, if any.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.api_key.read() {
            Ok(guard) => match guard.as_deref() {
                Some(key) => request.header(API_KEY_HEADER, key),
                None => request,
            },
            Err(_) => request,
        }
    }

    // -- read operations ----------------------------------------------------

    /// `GET /health`. Succeeds when the server answers with any 2xx.
    pub async fn check_health(&self) -> Result<(), ApiError> {
        let url = self.endpoint("/health");
        debug!(%url, "health check");
        let response = self.authorize(self.http.get(url)).send().await?;
        decode::<ApiResponse<serde_json::Value>>(response)
            .await
            .map(|_| ())
    }

    /// `GET /policies?page&page_size`.
    pub async fn get_policies(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<PoliciesPage, ApiError> {
        let url = format!(
            "{}?page={page}&page_size={page_size}",
            self.endpoint("/policies")
        );
        let response = self.authorize(self.http.get(url)).send().await?;
        Ok(decode::<ApiResponse<PoliciesPage>>(response).await?.data)
    }

    /// `GET /documents?page&page_size`.
    pub async fn get_documents(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<DocumentsPage, ApiError> {
        let url = format!(
            "{}?page={page}&page_size={page_size}",
            self.endpoint("/documents")
        );
        let response = self.authorize(self.http.get(url)).send().await?;
        Ok(decode::<ApiResponse<DocumentsPage>>(response).await?.data)
    }

    // -- mutations ----------------------------------------------------------

    /// `POST /document`: multipart upload of a customer document for
    /// analysis against the given policy. Returns the server's message.
    pub async fn upload_document(
        &self,
        file: &Path,
        policy_id: &str,
    ) -> Result<String, ApiError> {
        let form = file_form(file)
            .await?
            .text("policy_id", policy_id.to_string());
        let response = self
            .authorize(self.http.post(self.endpoint("/document")))
            .multipart(form)
            .send()
            .await?;
        Ok(decode::<ApiResponse<serde_json::Value>>(response)
            .await?
            .message)
    }

    /// `POST /policy`: multipart upload of a new policy framework document.
    pub async fn upload_policy(
        &self,
        file: &Path,
        title: &str,
        category: &str,
    ) -> Result<String, ApiError> {
        let form = file_form(file)
            .await?
            .text("title", title.to_string())
            .text("category", category.to_string());
        let response = self
            .authorize(self.http.post(self.endpoint("/policy")))
            .multipart(form)
            .send()
            .await?;
        Ok(decode::<ApiResponse<serde_json::Value>>(response)
            .await?
            .message)
    }

    /// `DELETE /document/{id}`.
    pub async fn delete_document(&self, document_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/document/{document_id}"));
        let response = self.authorize(self.http.delete(url)).send().await?;
        decode::<ApiResponse<serde_json::Value>>(response)
            .await
            .map(|_| ())
    }

    /// `DELETE /policy/{id}`. Also deletes the policy's rules server-side.
    pub async fn delete_policy(&self, policy_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/policy/{policy_id}"));
        let response = self.authorize(self.http.delete(url)).send().await?;
        decode::<ApiResponse<serde_json::Value>>(response)
            .await
            .map(|_| ())
    }

    /// `DELETE /policy/{policyId}/rule/{ruleId}`.
    pub async fn delete_rule(
        &self,
        policy_id: &str,
        rule_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/policy/{policy_id}/rule/{rule_id}"));
        let response = self.authorize(self.http.delete(url)).send().await?;
        decode::<ApiResponse<serde_json::Value>>(response)
            .await
            .map(|_| ())
    }

    /// `PATCH /policy/{policyId}/rule/{ruleId}` with `{ "rule_text": ... }`.
    pub async fn update_rule(
        &self,
        policy_id: &str,
        rule_id: &str,
        rule_text: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/policy/{policy_id}/rule/{rule_id}"));
        let body = serde_json::json!({ "rule_text": rule_text });
        let response = self
            .authorize(self.http.patch(url))
            .json(&body)
            .send()
            .await?;
        decode::<ApiResponse<serde_json::Value>>(response)
            .await
            .map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Response decoding helpers
// ---------------------------------------------------------------------------

/// Build a multipart form with the file contents under the `file` field.
async fn file_form(path: &Path) -> Result<multipart::Form, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ApiError::File {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let part = multipart::Part::bytes(bytes).file_name(file_name);
    Ok(multipart::Form::new().part("file", part))
}

/// Map the response status, then deserialize the body.
///
/// 429 becomes `RateLimited`, other non-2xx become `Status` with the body's
/// message, and a 2xx body that doesn't parse becomes `Decode`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ApiError::RateLimited {
            message: extract_message(&body),
        });
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: extract_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pull a human-readable message out of an error body.
///
/// Prefers the envelope's `message` field, then an `error` field, then the
/// trimmed raw body (truncated).
pub(crate) fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            if !msg.is_empty() {
                return msg.to_string();
            }
        }
        if let Some(msg) = value.get("error").and_then(|m| m.as_str()) {
            if !msg.is_empty() {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    let mut excerpt: String = trimmed.chars().take(MAX_MESSAGE_LEN).collect();
    if excerpt.len() < trimmed.len() {
        excerpt.push_str("...");
    }
    excerpt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
