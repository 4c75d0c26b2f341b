//! Response construction.
//!
//! # Responsibilities
//! - Content type per response kind
//! - Cache-disabling headers for the form page and error page
//! - The 500 error document

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

/// `Cache-Control` value for pages that must never be cached.
pub const NO_CACHE: &str = "private, no-cache, no-store, must-revalidate";

/// Headers for an HTML page that must always be refetched.
pub fn html_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    headers.insert(header::EXPIRES, HeaderValue::from_static("-1"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}

/// Headers for a static asset of the given content type.
pub fn asset_headers(content_type: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, value);
    headers
}

/// Assemble a response from status, headers, and body.
pub fn build(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// HTML document shown when a response could not be produced.
pub fn error_page(detail: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body><h1>An Error Has Occurred</h1><p>{}</p></body></html>",
        escape_html(detail)
    )
}

/// 500 response carrying `detail`.
pub fn error_response(detail: &str) -> Response {
    build(
        StatusCode::INTERNAL_SERVER_ERROR,
        html_headers(),
        error_page(detail).into_bytes(),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
