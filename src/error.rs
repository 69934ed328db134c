use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::calendar::CalendarError;
use crate::generation::GenerationError;
use crate::models::UnknownPlatform;
use crate::repo::RepoError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("not found")] NotFound,
    #[error("conflict")] Conflict,
    #[error("bad request: {0}")] BadRequest(String),
    #[error("{0}")] Unprocessable(String),
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => ApiError::NotFound,
            RepoError::Conflict => ApiError::Conflict,
            RepoError::OutOfRange(e) => ApiError::BadRequest(e.to_string()),
            e @ RepoError::InvalidTransition { .. } => ApiError::Unprocessable(e.to_string()),
            RepoError::Generation(e) => e.into(),
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(e: CalendarError) -> Self {
        match e {
            CalendarError::NotDroppable(_) => ApiError::Unprocessable(e.to_string()),
            CalendarError::InvalidMonth { .. } | CalendarError::InvalidOffset(_) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        ApiError::Unprocessable(e.to_string())
    }
}

impl From<UnknownPlatform> for ApiError {
    fn from(e: UnknownPlatform) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        HttpResponse::build(status).json(ApiErrorBody { error: self.to_string() })
    }
}
