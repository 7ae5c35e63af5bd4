use axum::response::{Html, IntoResponse, Response};
use http::{Method, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Cannot {method} {path}")]
    NotFound { method: Method, path: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        };

        tracing::debug!(status = status.as_u16(), "{}", self);

        let body = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Error</title>
</head>
<body>
<pre>{}</pre>
</body>
</html>
"#,
            escape_html(&self.to_string())
        );

        (status, Html(body)).into_response()
    }
}

/// Escape the characters that matter inside an HTML text node.
///
/// Same character set Express escapes in its default not-found page.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
