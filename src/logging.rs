//! Middleware for logging requests and responses.

use axum::{
    extract::Request, http::Method, http::header::CONTENT_TYPE, middleware::Next,
    response::Response,
};

const LOG_BODY_LENGTH_LIMIT: usize = 256;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `debug` level. If a body
/// is longer than [LOG_BODY_LENGTH_LIMIT] bytes, only its length is logged.
/// Password fields in JSON request bodies are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not buffer request body: {}", error);
            return Response::builder()
                .status(axum::http::StatusCode::BAD_REQUEST)
                .body(axum::body::Body::empty())
                .unwrap_or_default();
        }
    };

    let body_text = String::from_utf8_lossy(&body_bytes).to_string();
    let is_json = parts.headers.get(CONTENT_TYPE)
        == Some(&"application/json".parse().expect("valid header value"));

    let display_text = if is_json && matches!(parts.method, Method::POST | Method::PUT) {
        redact_field(&body_text, "password")
    } else {
        body_text.clone()
    };

    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &display_text,
    );

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let body_text = String::from_utf8_lossy(&body_bytes).to_string();

    log_body(
        &format!("Sending response: {}", parts.status),
        &body_text,
    );

    Response::from_parts(parts, body_text.into())
}

fn log_body(prefix: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("{} body: <{} bytes>", prefix, body.len());
    } else {
        tracing::debug!("{} body: {:?}", prefix, body);
    }
}

/// Replace the string value of `field_name` in a JSON `body_text` with
/// asterisks.
///
/// Works on the raw text rather than a parsed document so that malformed
/// bodies are still redacted before they are logged.
fn redact_field(body_text: &str, field_name: &str) -> String {
    let field_key = format!("\"{}\"", field_name);

    let key_start = match body_text.find(&field_key) {
        Some(position) => position,
        None => return body_text.to_string(),
    };

    let value_region = &body_text[key_start + field_key.len()..];
    let colon_offset = match value_region.find(':') {
        Some(position) => position,
        None => return body_text.to_string(),
    };

    let value_start = match value_region[colon_offset..].find('"') {
        Some(position) => colon_offset + position + 1,
        None => return body_text.to_string(),
    };

    let value_end = match value_region[value_start..].find('"') {
        Some(position) => value_start + position,
        None => return body_text.to_string(),
    };

    let mut redacted = String::with_capacity(body_text.len());
    redacted.push_str(&body_text[..key_start + field_key.len() + value_start]);
    redacted.push_str("********");
    redacted.push_str(&value_region[value_end..]);

    redacted
}
