use std::time::Duration;

use bytes::Bytes;
use futures_core::future::LocalBoxFuture;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::proxy_service::proxy_error::ProxyError;
use crate::proxy_service::proxy_target::ProxyTarget;

pub struct UpstreamResponse {
  pub content_type: Option<String>,
  pub body: Bytes,
}

/// Performs the single outbound GET behind a proxy call.
pub trait Upstream {
  fn fetch<'a>(&'a self, target: &'a ProxyTarget) -> LocalBoxFuture<'a, Result<UpstreamResponse, ProxyError>>;
}

pub struct ReqwestUpstream {
  http_client: Client,
  timeout: Duration,
}

impl ReqwestUpstream {
  /// `timeout` must be the ceiling the client was built with; it is only used for reporting.
  pub fn new(http_client: Client, timeout: Duration) -> Self {
    Self { http_client, timeout }
  }
}

impl Upstream for ReqwestUpstream {
  fn fetch<'a>(&'a self, target: &'a ProxyTarget) -> LocalBoxFuture<'a, Result<UpstreamResponse, ProxyError>> {
    Box::pin(async move {
      let timeout = self.timeout;
      let response = self
        .http_client
        .get(target.url().clone())
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| ProxyError::from_fetch(err, timeout))?;

      debug!("Upstream {} answered {}", target.url(), response.status());

      let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

      let body = response
        .bytes()
        .await
        .map_err(|err| ProxyError::from_fetch(err, timeout))?;

      Ok(UpstreamResponse { content_type, body })
    })
  }
}
