use std::sync::Arc;

use actix_web::web;

use crate::http_client::HttpClientConfig;
use crate::proxy_service::proxy_config::{ContentTypePolicy, ProxyConfig};
use crate::proxy_service::proxy_route_service::ProxyRouteService;
use crate::proxy_service::upstream::ReqwestUpstream;
use crate::server_config::ProxySettings;

pub mod proxy_config;
pub mod proxy_error;
pub mod proxy_route_service;
pub mod proxy_target;
pub mod upstream;

pub const PROXY_PATH: &str = "/api/proxy";

/// Builds the shared forwarder, or `None` when the proxy route is switched off.
pub fn build(settings: &ProxySettings) -> Result<Option<web::Data<ProxyRouteService>>, reqwest::Error> {
  if !settings.enabled {
    return Ok(None);
  }

  let client_config = HttpClientConfig::from(settings);
  let timeout = client_config.timeout;
  let upstream = ReqwestUpstream::new(client_config.to_client()?, timeout);

  let config = ProxyConfig {
    content_type: ContentTypePolicy::from_preserve_flag(settings.preserve_content_type),
  };

  Ok(Some(web::Data::new(ProxyRouteService::new(config, Arc::new(upstream)))))
}
