//! Handler error type and its HTTP mapping.
//!
//! | Variant      | Status                          |
//! |--------------|---------------------------------|
//! | `NotFound`   | 404                             |
//! | `Validation` | from the extractor (400 / 422)  |
//! | `Storage`    | 500, underlying message exposed |

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::api_types::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("tracking {0} not found")]
    NotFound(String),

    #[error("{message}")]
    Validation { status: StatusCode, message: String },

    #[error("An error occurred: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { status, .. } => *status,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Storage(e) = &self {
            error!(error = %format!("{e:#}"), "storage failure");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_expose_the_chain() {
        let err = ApiError::from(
            anyhow::anyhow!("UNIQUE constraint failed").context("insert tracking ORD001 failed"),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "An error occurred: insert tracking ORD001 failed: UNIQUE constraint failed"
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::NotFound("ORD404".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "tracking ORD404 not found");
    }
}
