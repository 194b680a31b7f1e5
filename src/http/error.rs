use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::order::{OrderError, ParseValueError};

/// Error returned by HTTP handlers, rendered as `{"error": "<message>"}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    InvalidValue(#[from] ParseValueError),

    /// Request body, path or query string could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidValue(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Order(err) => match err {
                OrderError::OrderNotFound(_) | OrderError::ProductNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                OrderError::InvalidTransition { .. }
                | OrderError::TooLateToCancel(_)
                | OrderError::OrderCannotBeEdited(_)
                | OrderError::AddressCannotBeEdited
                | OrderError::ConcurrentModification(_) => StatusCode::CONFLICT,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
