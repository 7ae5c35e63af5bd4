//! Catch-all for requests no route handles.

use http::{Method, Uri};

use crate::error::AppError;

/// Answers any unmatched method or path with 404 `Cannot <METHOD> <path>`.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound {
        method,
        path: uri.path().to_string(),
    }
}
