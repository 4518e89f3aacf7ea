use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::store::StoreError;

/// Reasons slot generation rejects its input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("at least one date is required")]
    NoDates,
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid start time '{0}', expected HH:MM")]
    InvalidStartTime(String),
    #[error("invalid end time '{0}', expected HH:MM")]
    InvalidEndTime(String),
    #[error("end time {end} is before start time {start}")]
    EndBeforeStart { start: String, end: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    #[error("Meeting not found")]
    NotFound,
    #[error("no free meeting code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("export error: {0}")]
    Export(#[from] csv::Error),
    #[error("worker pool error: {0}")]
    Blocking(#[from] BlockingError),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<SlotError> for AppError {
    fn from(e: SlotError) -> Self {
        let field = match e {
            SlotError::NoDates | SlotError::InvalidDate(_) => "dates",
            SlotError::InvalidStartTime(_) => "startTime",
            SlotError::InvalidEndTime(_) | SlotError::EndBeforeStart { .. } => "endTime",
        };
        AppError::validation(field, e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::CodeSpaceExhausted { .. }
            | AppError::Store(_)
            | AppError::Export(_)
            | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation { field, message } => HttpResponse::BadRequest()
                .json(serde_json::json!({"error": message, "field": field})),
            AppError::NotFound => {
                HttpResponse::NotFound().json(serde_json::json!({"error": self.to_string()}))
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({"error": "Internal server error"}))
            }
        }
    }
}
