// src/web/handlers/job_handlers.rs
use crate::ai::{resolve_ai_config, JobAnalyzer};
use crate::job::{detect, HtmlPage, JobDetection};
use crate::storage::StorageKey;
use crate::types::job::JobAnalysis;
use crate::types::response::CompanyProfile;
use crate::web::handlers::storage_error;
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::{Error as JsonError, Json};
use rocket::State;
use tracing::{error, info, warn};

// The parsed page is not Send, so it never lives across an await.
fn detect_page(request: &PageRequest) -> JobDetection {
    let page = HtmlPage::parse(&request.url, request.title.as_deref(), &request.html);
    detect(&page)
}

pub async fn detect_job_handler(
    request: Json<PageRequest>,
    state: &State<ServerState>,
) -> Json<DataResponse<JobDetection>> {
    let detection = detect_page(&request);
    *state.last_job.write().await = detection.posting.clone();

    let message = if detection.detected {
        "Job posting detected"
    } else {
        "No job posting detected"
    };
    info!("{} on {}", message, request.url);
    Json(DataResponse::success(message, detection))
}

// Only a blank body falls back to the last detected posting.
fn page_request(
    request: Result<Json<PageRequest>, JsonError<'_>>,
) -> Result<Option<Json<PageRequest>>, ApiError> {
    match request {
        Ok(request) => Ok(Some(request)),
        Err(JsonError::Parse(body, _)) if body.trim().is_empty() => Ok(None),
        Err(JsonError::Parse(_, e)) => {
            warn!("Rejected analyze-job body: {}", e);
            Err(api_error(
                Status::UnprocessableEntity,
                format!("Invalid job page request: {}", e),
                "INVALID_BODY",
                &[
                    "Send url and html (title optional)",
                    "Send an empty body to analyze the last detected job",
                ],
            ))
        }
        Err(JsonError::Io(e)) => {
            warn!("Failed to read analyze-job body: {}", e);
            Err(api_error(
                Status::BadRequest,
                format!("Failed to read request body: {}", e),
                "BAD_REQUEST",
                &["Check the request body size and encoding"],
            ))
        }
    }
}

/// Analyzes the posting in the body, or the last detected one when the body
/// is empty. A body that is present but malformed is rejected.
pub async fn analyze_job_handler(
    request: Result<Json<PageRequest>, JsonError<'_>>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<JobAnalysis>> {
    let posting = match page_request(request)? {
        Some(request) => {
            let detection = detect_page(&request);
            *state.last_job.write().await = detection.posting.clone();
            detection.posting.ok_or_else(|| {
                api_error(
                    Status::UnprocessableEntity,
                    format!("No job posting detected on {}", request.url),
                    "NO_JOB_DETECTED",
                    &["Open the job details page before analyzing"],
                )
            })?
        }
        None => state.last_job.read().await.clone().ok_or_else(|| {
            api_error(
                Status::BadRequest,
                "No job posting to analyze",
                "NO_JOB_POSTING",
                &[
                    "Detect a job with POST /api/detect-job first",
                    "Send url, title and html in the request body",
                ],
            )
        })?,
    };

    let ai_config = resolve_ai_config(&state.store, &state.ai_defaults)
        .await
        .map_err(storage_error)?;
    let analysis = JobAnalyzer::new(&ai_config).analyze(&posting).await;

    state
        .store
        .set(StorageKey::JobAnalysis, &analysis)
        .await
        .map_err(storage_error)?;

    info!(
        "Analyzed {} at {}: {} keywords, industry {}",
        analysis.title,
        analysis.company,
        analysis.keywords.len(),
        analysis.industry
    );
    Ok(Json(DataResponse::success("Job analyzed", analysis)))
}

pub async fn analyze_company_handler(
    request: Json<CompanyRequest>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<CompanyProfile>> {
    let ai_config = resolve_ai_config(&state.store, &state.ai_defaults)
        .await
        .map_err(storage_error)?;

    match JobAnalyzer::new(&ai_config)
        .analyze_company(&request.company, &state.store)
        .await
    {
        Ok(profile) => Ok(Json(DataResponse::success("Company analyzed", profile))),
        Err(e) => {
            error!("Company analysis failed for {}: {:#}", request.company, e);
            Err(api_error(
                Status::BadGateway,
                format!("Company analysis failed: {}", e),
                "COMPANY_ANALYSIS_FAILED",
                &[
                    "Set an API key with PUT /api/ai-config",
                    "Try again in a few moments",
                ],
            ))
        }
    }
}
