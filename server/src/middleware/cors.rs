//! Origin allow-list.
//!
//! Requests without an `Origin` header (curl, server-to-server) pass through
//! untouched. Browser requests must come from a configured origin.

use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::AppState;
use crate::http::error::HttpError;

const ALLOWED_METHODS: &str = "GET, POST";
const ALLOWED_HEADERS: &str = "Content-Type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OriginCheck {
    NoOrigin,
    Allowed(HeaderValue),
    Rejected(String),
}

pub(crate) fn check_origin(headers: &HeaderMap, allowed_origins: &[String]) -> OriginCheck {
    let Some(origin) = headers.get(header::ORIGIN) else {
        return OriginCheck::NoOrigin;
    };
    match origin.to_str() {
        Ok(value) if allowed_origins.iter().any(|allowed| allowed == value) => {
            OriginCheck::Allowed(origin.clone())
        }
        Ok(value) => OriginCheck::Rejected(value.to_string()),
        Err(_) => OriginCheck::Rejected("<non-ascii origin>".to_string()),
    }
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
}

pub async fn cors_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = match check_origin(request.headers(), &state.config.allowed_origins) {
        OriginCheck::NoOrigin => return next.run(request).await,
        OriginCheck::Rejected(origin) => {
            return HttpError::OriginNotAllowed(origin).into_response();
        }
        OriginCheck::Allowed(origin) => origin,
    };

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    apply_cors_headers(response.headers_mut(), origin);
    response
}
