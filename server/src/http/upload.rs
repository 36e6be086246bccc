//! Multipart form decoding for `POST /generate-alt-text`.

use alttext_core::GenerationRequest;
use axum::extract::Multipart;
use axum::extract::multipart::Field;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use super::error::HttpError;

pub(crate) const IMAGE_FIELD: &str = "image";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Read every field of the form. A missing image leaves `image` empty; the
/// service reports that as `MissingInput`.
pub(crate) async fn read_generation_form(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<GenerationRequest, HttpError> {
    let mut request = GenerationRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => {
                request.mime_type = field_mime_type(&field);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_upload_bytes))?;
                if bytes.len() > max_upload_bytes {
                    return Err(HttpError::PayloadTooLarge {
                        limit: max_upload_bytes,
                    });
                }
                request.image = bytes.to_vec();
            }
            "contextText" => {
                request.context_text = Some(read_text(field, max_upload_bytes).await?);
            }
            "rules" => request.rules = Some(read_text(field, max_upload_bytes).await?),
            "dos" => request.dos = Some(read_text(field, max_upload_bytes).await?),
            "donts" => request.donts = Some(read_text(field, max_upload_bytes).await?),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(request)
}

async fn read_text(field: Field<'_>, max_upload_bytes: usize) -> Result<String, HttpError> {
    field
        .text()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))
}

/// Declared content type, else a guess from the file name.
fn field_mime_type(field: &Field<'_>) -> String {
    if let Some(content_type) = field.content_type().filter(|ct| !ct.trim().is_empty()) {
        return content_type.to_string();
    }
    field
        .file_name()
        .and_then(|name| mime_guess::from_path(name).first_raw())
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

fn multipart_error(err: MultipartError, max_upload_bytes: usize) -> HttpError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpError::PayloadTooLarge {
            limit: max_upload_bytes,
        }
    } else {
        HttpError::InvalidMultipart(err.body_text())
    }
}
