use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // standard web stuffs
    #[error("already exists")]
    AlreadyExists,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,

    // account flow
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("email address has not been verified")]
    EmailNotVerified,
    #[error("no pending one-time code for this email")]
    NoPendingOtp,
    #[error("one-time code has expired, request a new one")]
    OtpExpired,
    #[error("one-time code is invalid")]
    InvalidOtp,
    #[error("token has expired")]
    TokenExpired,

    // infra things
    #[error("mail delivery failed: {0}")]
    Mail(String),
    #[error(transparent)]
    Db(sea_orm::DbErr),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbErr> for AppError {
    fn from(e: DbErr) -> Self {
        AppError::from_db(e)
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AppError::Internal(format!("hashing failed: {e}"))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            Self::NoPendingOtp => "NO_PENDING_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Mail(_) => "MAIL_ERROR",
            Self::Db(_) => "DB_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn from_db(err: DbErr) -> Self {
        if let DbErr::RecordNotFound(_) = &err {
            return AppError::NotFound;
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyExists,
            _ => AppError::Db(err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AlreadyExists | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound | Self::NoPendingOtp => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) | Self::InvalidOtp => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::EmailNotVerified => StatusCode::FORBIDDEN,
            Self::OtpExpired => StatusCode::GONE,
            Self::Mail(_) => StatusCode::BAD_GATEWAY,
            Self::Db(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Don't leak driver/infra detail to clients.
        let message = match self {
            Self::Db(_) | Self::Internal(_) | Self::Mail(_) => self.kind().to_string(),
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .json(ErrorBody { error: self.kind(), message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_404() {
        let err: AppError = DbErr::RecordNotFound("User does not exist".into()).into();
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn otp_failures_have_distinct_statuses() {
        assert_eq!(AppError::OtpExpired.status_code(), StatusCode::GONE);
        assert_eq!(AppError::InvalidOtp.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NoPendingOtp.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::EmailNotVerified.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn infra_errors_hide_detail() {
        let resp = AppError::Internal("argon2 blew up".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::Internal("x".into()).kind(), "INTERNAL_ERROR");
    }
}
