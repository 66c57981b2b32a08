//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type transport agnostic while giving every handler
//! the same response shapes: validation failures as JSON with field details,
//! missing records as a plain-text message naming the identifier, and store
//! failures redacted before they leave the process.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redacted(error: &Error) -> Error {
    let mut redacted = Error::internal("Internal server error");
    if let Some(id) = error.trace_id() {
        redacted = redacted.with_trace_id(id.to_owned());
    }
    redacted
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        match self.code() {
            ErrorCode::NotFound => builder
                .content_type(ContentType::plaintext())
                .body(self.message().to_owned()),
            ErrorCode::InternalError => {
                error!(
                    trace_id = ?self.trace_id(),
                    error = %self,
                    details = ?self.details(),
                    "request failed"
                );
                builder.json(redacted(self))
            }
            ErrorCode::ServiceUnavailable => {
                warn!(trace_id = ?self.trace_id(), error = %self, "record store unavailable");
                builder.json(self)
            }
            ErrorCode::InvalidRequest => builder.json(self),
        }
    }
}

/// `JsonConfig` error handler turning unreadable bodies into 400 responses.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use civic_backend::inbound::http::error::json_error_handler;
///
/// let _config = web::JsonConfig::default().error_handler(json_error_handler);
/// ```
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => {
            "request body must be sent as application/json".to_owned()
        }
        JsonPayloadError::Deserialize(inner) if inner.is_data() => {
            format!("request body has an unexpected shape: {inner}")
        }
        JsonPayloadError::Deserialize(inner) => format!("request body is not valid JSON: {inner}"),
        other => format!("request body could not be read: {other}"),
    };
    Error::invalid_request(message).into()
}
