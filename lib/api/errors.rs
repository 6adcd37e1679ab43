//! Translation of domain errors into transport status codes.

use axum::http::StatusCode;
use tonic::{Code, Status};

use super::proto::RpcStatus;
use crate::domain::error::{DomainError, ErrorKind};
use crate::logging::format_error_report;

const INTERNAL_MESSAGE: &str = "internal error";

pub fn grpc_code(kind: ErrorKind) -> Code {
    match kind {
        ErrorKind::NotFound => Code::NotFound,
        ErrorKind::AlreadyExists => Code::AlreadyExists,
        ErrorKind::BadRequest => Code::InvalidArgument,
        ErrorKind::Internal => Code::Internal,
    }
}

/// Canonical gRPC code name, used in REST error bodies.
pub fn code_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "NOT_FOUND",
        ErrorKind::AlreadyExists => "ALREADY_EXISTS",
        ErrorKind::BadRequest => "INVALID_ARGUMENT",
        ErrorKind::Internal => "INTERNAL",
    }
}

pub fn http_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message safe to hand to callers. Storage details of internal errors are
/// replaced with a generic message.
pub fn public_message(err: &DomainError) -> String {
    match err {
        DomainError::Internal { .. } => {
            tracing::debug!(report = %format_error_report(err), "masking internal error");
            INTERNAL_MESSAGE.to_string()
        }
        _ => err.to_string(),
    }
}

/// Logs a request that failed before producing a response.
pub fn log_rejection(route: &str, err: &DomainError) {
    match err {
        DomainError::Internal { .. } => tracing::error!(
            route,
            event = "internal_error",
            report = %format_error_report(err),
            "request failed"
        ),
        _ => tracing::info!(route, error = %err, "request rejected"),
    }
}

pub fn to_status(err: &DomainError) -> Status {
    Status::new(grpc_code(err.kind()), public_message(err))
}

pub fn to_rpc_status(err: &DomainError) -> RpcStatus {
    RpcStatus {
        code: grpc_code(err.kind()) as i32,
        message: public_message(err),
    }
}
