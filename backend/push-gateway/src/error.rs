use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use fcm_shared::FcmError;
use thiserror::Error;

use crate::models::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required request field is missing or the body could not be parsed
    #[error("{0}")]
    Validation(String),

    /// The push provider rejected the call
    #[error("{0}")]
    Provider(#[from] FcmError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
