use std::sync::Arc;

use actix_web::http::header::{ContentType, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, warn};

use crate::proxy_service::proxy_config::ProxyConfig;
use crate::proxy_service::proxy_error::ProxyError;
use crate::proxy_service::proxy_target::ProxyTarget;
use crate::proxy_service::upstream::Upstream;

/// Forwards `GET /api/proxy?url=...` to the target origin and relays the body.
pub struct ProxyRouteService {
  config: ProxyConfig,
  upstream: Arc<dyn Upstream + Send + Sync>,
}

impl ProxyRouteService {
  pub fn new(config: ProxyConfig, upstream: Arc<dyn Upstream + Send + Sync>) -> Self {
    Self { config, upstream }
  }

  pub async fn exec(&self, raw_query: &str) -> Result<HttpResponse, ProxyError> {
    let target = ProxyTarget::from_query(raw_query)?;

    let fetched = self.upstream.fetch(&target).await?;
    debug!("Relaying {} bytes from {}", fetched.body.len(), target.url());

    let content_type = self.config.content_type.resolve(fetched.content_type.as_deref());
    let mut response = HttpResponse::Ok();
    match HeaderValue::from_str(content_type) {
      Ok(value) => response.insert_header((CONTENT_TYPE, value)),
      Err(_) => response.insert_header(ContentType::html()),
    };
    response.insert_header((CONTENT_LENGTH, fetched.body.len()));

    Ok(response.body(fetched.body))
  }
}

pub async fn handle(req: HttpRequest, service: web::Data<ProxyRouteService>) -> Result<HttpResponse, ProxyError> {
  service.exec(req.query_string()).await.map_err(|err| {
    if err.is_validation() {
      debug!("Rejected proxy request '{}': {}", req.query_string(), err);
    } else {
      warn!("Proxy request failed: {}", err);
    }
    err
  })
}
