// src/web/types.rs

use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::AiConfig;
use crate::document::ResumeParser;
use crate::storage::KvStore;
use crate::types::job::JobPosting;

/// Shared state behind every route.
pub struct ServerState {
    pub store: KvStore,
    pub ai_defaults: AiConfig,
    pub parser: ResumeParser,
    /// Posting from the most recent detection; `analyze-job` reuses it when
    /// called without a page.
    pub last_job: RwLock<Option<JobPosting>>,
}

impl ServerState {
    pub fn new(store: KvStore, ai_defaults: AiConfig) -> Self {
        Self {
            store,
            ai_defaults,
            parser: ResumeParser::new(),
            last_job: RwLock::new(None),
        }
    }
}

#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    pub resume_file: TempFile<'f>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ParseTextRequest {
    pub text: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct PageRequest {
    pub url: String,
    pub title: Option<String>,
    pub html: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CompanyRequest {
    pub company: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message: message.into(),
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: &str, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code: error_code.to_string(),
            suggestions,
        }
    }
}

pub type ApiError = (Status, Json<StandardErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn api_error(
    status: Status,
    error: impl Into<String>,
    error_code: &str,
    suggestions: &[&str],
) -> ApiError {
    (
        status,
        Json(StandardErrorResponse::new(
            error.into(),
            error_code,
            suggestions.iter().map(|s| s.to_string()).collect(),
        )),
    )
}
