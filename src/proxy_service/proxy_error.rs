use std::time::Duration;

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
  #[error("Missing URL parameter")]
  MissingUrl,
  #[error("Proxy error: {0}")]
  MalformedUrl(String),
  #[error("Proxy error: unsupported URL scheme '{0}'")]
  UnsupportedScheme(String),
  #[error("Proxy error: upstream did not respond within {}s", .0.as_secs_f32())]
  Timeout(Duration),
  #[error("Proxy error: HTTP status {0}")]
  Status(u16),
  #[error("Proxy error: {0}")]
  Fetch(String),
}

impl ProxyError {
  /// Errors raised before any outbound request was attempted.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      ProxyError::MissingUrl | ProxyError::MalformedUrl(_) | ProxyError::UnsupportedScheme(_)
    )
  }

  pub fn from_fetch(err: reqwest::Error, timeout: Duration) -> Self {
    if err.is_timeout() {
      return ProxyError::Timeout(timeout);
    }

    match err.status() {
      Some(status) => ProxyError::Status(status.as_u16()),
      None => ProxyError::Fetch(err.to_string()),
    }
  }
}

impl ResponseError for ProxyError {
  fn status_code(&self) -> StatusCode {
    match self {
      ProxyError::MissingUrl => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code())
      .insert_header(ContentType::plaintext())
      .body(self.to_string())
  }
}
