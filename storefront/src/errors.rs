// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront_flow::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Stripe API Error: {0}")]
  Stripe(String),

  #[error("Invalid order metadata: {0}")]
  Metadata(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    AppError::Stripe(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Stripe(m) => HttpResponse::BadGateway().json(json!({"error": "Payment provider error", "detail": m})),
      AppError::Metadata(m) => {
        HttpResponse::UnprocessableEntity().json(json!({"error": "Order metadata could not be read", "detail": m}))
      }
      AppError::Workflow { source } => {
        tracing::error!(flow_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::http::StatusCode;

  #[test]
  fn variants_map_to_status_codes() {
    let status = |e: AppError| e.error_response().status();
    assert_eq!(status(AppError::Validation("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(status(AppError::Stripe("x".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(status(AppError::Metadata("x".into())), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
      status(FlowError::Internal("x".into()).into()),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn anyhow_wrapping_a_database_error_stays_a_database_error() {
    let err: AppError = anyhow::Error::new(sqlx::Error::RowNotFound).into();
    assert!(matches!(err, AppError::Sqlx(sqlx::Error::RowNotFound)));
  }
}
