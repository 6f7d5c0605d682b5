//! Translation of domain errors into HTTP responses.
//!
//! Every failure leaves the process as the JSON [`Error`] payload, with the
//! request's trace identifier echoed in the `trace-id` header. Internal
//! errors are logged in full and sent redacted. Provider and store failures
//! are logged at `warn`; client mistakes only at `debug`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::{debug, error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::UpstreamFailure => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_failure(failure: &Error) {
    match failure.code() {
        ErrorCode::InternalError => error!(
            message = failure.message(),
            details = ?failure.details(),
            trace_id = ?failure.trace_id(),
            "internal error"
        ),
        ErrorCode::UpstreamFailure | ErrorCode::ServiceUnavailable => warn!(
            code = ?failure.code(),
            message = failure.message(),
            trace_id = ?failure.trace_id(),
            "dependency failure"
        ),
        code => debug!(?code, message = failure.message(), "request rejected"),
    }
}

/// The payload a client may see. Internal errors lose their message and
/// details but keep the trace identifier.
fn client_view(failure: &Error) -> Error {
    if failure.code() != ErrorCode::InternalError {
        return failure.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match failure.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        log_failure(self);

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_view(self))
    }
}

/// Framework errors raised before a handler runs. Client-side rejections
/// become `invalid_request`; anything else is an opaque internal error.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        let status = err.as_response_error().status_code();
        if status.is_client_error() {
            debug!(error = %err, %status, "framework rejected the request");
            Self::invalid_request(format!(
                "request rejected: {}",
                status.canonical_reason().unwrap_or("client error")
            ))
        } else {
            error!(error = %err, "framework error promoted to domain error");
            Self::internal(REDACTED_MESSAGE)
        }
    }
}
