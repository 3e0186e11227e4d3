//! Request-shape validation shared by the HTTP handlers.
//!
//! Malformed JSON, unknown fields and wrongly typed values are rejected
//! before a handler runs, with the same error envelope as domain failures.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Maximum accepted JSON body size in bytes.
pub const JSON_LIMIT: usize = 64 * 1024;

fn payload_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected request body");
    let (message, code) = match &err {
        JsonPayloadError::ContentType => ("expected an application/json body", "content_type"),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ("request body too large", "payload_too_large")
        }
        JsonPayloadError::Deserialize(_) => ("invalid request body", "invalid_body"),
        _ => ("unreadable request body", "unreadable_body"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": code, "reason": err.to_string() }))
        .into()
}

/// JSON extractor configuration mapping payload failures to `InvalidRequest`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use hbnb_backend::inbound::http::validation::json_config;
///
/// let app = App::new().app_data(json_config());
/// ```
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(payload_error)
}
