use alttext_core::ResultBundle;
use axum::Json;
use axum::extract::Multipart;
use axum::extract::State;
use axum::extract::multipart::MultipartRejection;
use serde_json::Value;
use serde_json::json;

use super::error::HttpError;
use super::upload::read_generation_form;
use crate::AppState;

pub const ROOT_MESSAGE: &str = "Alt text generator backend with vision is running";

pub async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

pub async fn healthz_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn generate_alt_text_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResultBundle>, HttpError> {
    let multipart =
        multipart.map_err(|rejection| HttpError::InvalidMultipart(rejection.body_text()))?;
    let request = read_generation_form(multipart, state.config.max_upload_bytes).await?;
    let bundle = state.service.generate(request).await?;
    Ok(Json(bundle))
}
