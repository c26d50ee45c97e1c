// src/web/handlers/system_handlers.rs
use crate::config::AiConfig;
use crate::storage::StorageKey;
use crate::web::handlers::storage_error;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn update_ai_config_handler(
    request: Json<AiConfig>,
    state: &State<ServerState>,
) -> ApiResult<TextResponse> {
    let ai_config = request.into_inner();
    state
        .store
        .set(StorageKey::AiConfig, &ai_config)
        .await
        .map_err(storage_error)?;

    info!(
        "AI configuration updated (model {}, key {})",
        ai_config.model,
        if ai_config.has_api_key() { "set" } else { "unset" }
    );
    Ok(Json(TextResponse::success("AI configuration saved")))
}

pub async fn health_handler() -> Json<TextResponse> {
    info!("Health check");
    Json(TextResponse::success("Service is healthy"))
}
