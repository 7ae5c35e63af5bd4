//! Deploy confirmation handler.

use axum::response::{Html, IntoResponse, Response};
use http::{header::ALLOW, HeaderValue, Method, Uri};

use super::fallback;
use crate::config::{ALLOWED_METHODS, DEPLOY_MESSAGE};

/// Dispatches every method sent to `/`.
///
/// Unsupported methods get the plain not-found page, without an `Allow` header.
pub async fn root(method: Method, uri: Uri) -> Response {
    match method {
        Method::GET | Method::HEAD => index().await.into_response(),
        Method::OPTIONS => options().await.into_response(),
        _ => fallback::not_found(method, uri).await.into_response(),
    }
}

/// Answers `GET /` with the fixed deploy message.
///
/// Query parameters, headers, and the request body are ignored.
pub async fn index() -> Html<&'static str> {
    Html(DEPLOY_MESSAGE)
}

/// Answers `OPTIONS /` with the methods the route accepts.
pub async fn options() -> impl IntoResponse {
    (
        [(ALLOW, HeaderValue::from_static(ALLOWED_METHODS))],
        Html(ALLOWED_METHODS),
    )
}
