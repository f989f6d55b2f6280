use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A form was submitted with missing or malformed fields. The message is
    /// shown inline on the same page.
    #[error("{0}")]
    InvalidForm(String),

    /// A wizard step was entered before the step that stages its values.
    #[error("Missing session value: {0}")]
    MissingSession(&'static str),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Incorrect booking number or surname")]
    LoginRejected,

    #[error("Unknown meal deal: {0}")]
    UnknownMealDeal(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "All fields are required".to_string());
        AppError::InvalidForm(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidForm(_) | AppError::MissingSession(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRejected => StatusCode::UNAUTHORIZED,
            AppError::UnknownMealDeal(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Session(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::Database(e) => {
                log::error!("database error: {e}");
                "Database error".to_string()
            }
            AppError::Session(e) => {
                log::error!("session error: {e}");
                "Session error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error })
    }
}
