use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog is empty after filtering")]
    EmptyCatalog,

    #[error("Vocabulary is empty: no usable terms in any profile")]
    EmptyVocabulary,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Title '{title}' matches multiple catalog entries: {ids:?}")]
    AmbiguousTitle { title: String, ids: Vec<usize> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Startup-time errors after which no request can be served
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::Catalog(_)
                | AppError::Csv(_)
                | AppError::EmptyCatalog
                | AppError::EmptyVocabulary
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AmbiguousTitle { .. } => (StatusCode::CONFLICT, self.to_string()),
            AppError::Catalog(_)
            | AppError::Csv(_)
            | AppError::EmptyCatalog
            | AppError::EmptyVocabulary
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
