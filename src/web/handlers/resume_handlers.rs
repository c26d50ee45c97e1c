// src/web/handlers/resume_handlers.rs
use crate::document::{DocumentError, DocumentFormat, SUPPORTED_EXTENSIONS};
use crate::storage::StorageKey;
use crate::types::resume::ResumeRecord;
use crate::web::handlers::storage_error;
use crate::web::types::*;

use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

fn document_error(e: DocumentError) -> ApiError {
    match e {
        DocumentError::UnsupportedFormat(_) | DocumentError::MissingExtension(_) => {
            warn!("Rejected resume upload: {}", e);
            let supported = format!("Supported formats: .{}", SUPPORTED_EXTENSIONS.join(", ."));
            api_error(
                Status::BadRequest,
                e.to_string(),
                "UNSUPPORTED_FORMAT",
                &[supported.as_str(), "Convert the resume to plain text (.txt)"],
            )
        }
        DocumentError::Read { .. } => {
            error!("Failed to read uploaded resume: {}", e);
            api_error(
                Status::InternalServerError,
                "Failed to process uploaded file",
                "FILE_READ_ERROR",
                &["Try uploading the file again"],
            )
        }
    }
}

fn parsed(record: ResumeRecord) -> Json<DataResponse<ResumeRecord>> {
    let message = if record.is_sentinel() {
        "No resume fields found, please review manually"
    } else {
        "Resume parsed"
    };
    Json(DataResponse::success(message, record))
}

pub async fn parse_resume_handler(
    mut upload: Form<ResumeUploadForm<'_>>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<ResumeRecord>> {
    // Full client-supplied name: the sanitized one drops the extension
    let file_name = upload
        .resume_file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(|raw| raw.rsplit(|c: char| c == '/' || c == '\\').next())
        .unwrap_or_default()
        .to_string();

    info!(
        "Resume upload: {} ({} bytes)",
        file_name,
        upload.resume_file.len()
    );
    DocumentFormat::from_file_name(&file_name).map_err(document_error)?;

    let temp_path =
        std::env::temp_dir().join(format!("resume_upload_{}", uuid::Uuid::new_v4()));
    if let Err(e) = upload.resume_file.persist_to(&temp_path).await {
        error!("Failed to save uploaded file: {}", e);
        return Err(api_error(
            Status::InternalServerError,
            "Failed to process uploaded file",
            "FILE_SAVE_ERROR",
            &["Try uploading the file again"],
        ));
    }

    let read = tokio::fs::read(&temp_path).await;
    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        warn!("Failed to remove {}: {}", temp_path.display(), e);
    }
    let bytes = read.map_err(|source| {
        document_error(DocumentError::Read {
            path: temp_path.clone(),
            source,
        })
    })?;

    let record = state
        .parser
        .parse_bytes(&file_name, &bytes)
        .map_err(document_error)?;
    Ok(parsed(record))
}

pub async fn parse_resume_text_handler(
    request: Json<ParseTextRequest>,
    state: &State<ServerState>,
) -> Json<DataResponse<ResumeRecord>> {
    info!("Parsing pasted resume text ({} chars)", request.text.len());
    parsed(state.parser.parse_text(&request.text))
}

pub async fn get_resume_handler(state: &State<ServerState>) -> ApiResult<DataResponse<ResumeRecord>> {
    let record = state
        .store
        .get::<ResumeRecord>(StorageKey::ResumeData)
        .await
        .map_err(storage_error)?;

    match record {
        Some(record) => Ok(Json(DataResponse::success("Stored resume", record))),
        None => Err(api_error(
            Status::NotFound,
            "No resume stored yet",
            "RESUME_NOT_FOUND",
            &["Upload a resume with POST /api/parse-resume", "Save one with PUT /api/resume"],
        )),
    }
}

pub async fn save_resume_handler(
    request: Json<ResumeRecord>,
    state: &State<ServerState>,
) -> ApiResult<TextResponse> {
    let record = request.into_inner();
    state
        .store
        .set(StorageKey::ResumeData, &record)
        .await
        .map_err(storage_error)?;

    info!("Saved resume for {}", record.full_name);
    Ok(Json(TextResponse::success("Resume saved")))
}
