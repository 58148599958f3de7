use std::time::Duration;

use reqwest::header::{
  HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::server_config::ProxySettings;

pub const BROWSER_USER_AGENT: &str =
  "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

const MAX_REDIRECTS: usize = 10;

pub struct HttpClientConfig {
  pub http_proxy: Option<String>,
  pub user: Option<String>,
  pub pass: Option<String>,
  pub enable_cookies: bool,
  pub timeout: Duration,
}

impl HttpClientConfig {
  pub fn to_client(self) -> Result<Client, reqwest::Error> {
    let HttpClientConfig {
      http_proxy,
      user,
      pass,
      enable_cookies,
      timeout,
    } = self;
    let mut client_builder = reqwest::ClientBuilder::new();

    if let Some(proxy_url) = http_proxy {
      let mut proxy = reqwest::Proxy::all(proxy_url)?;

      if let (Some(user_name), Some(password)) = (user, pass) {
        proxy = proxy.basic_auth(&user_name, &password);
      }

      client_builder = client_builder.proxy(proxy);
    } else {
      client_builder = client_builder.no_proxy();
    }

    if enable_cookies {
      client_builder = client_builder.cookie_store(true);
    }

    let client = client_builder
      .default_headers(browser_headers())
      .timeout(timeout)
      .redirect(Policy::limited(MAX_REDIRECTS))
      .build()?;

    Ok(client)
  }
}

impl From<&ProxySettings> for HttpClientConfig {
  fn from(settings: &ProxySettings) -> Self {
    HttpClientConfig {
      http_proxy: settings.upstream_proxy.clone(),
      user: settings.upstream_proxy_user.clone(),
      pass: settings.upstream_proxy_pass.clone(),
      enable_cookies: settings.cookies,
      timeout: Duration::from_secs(settings.timeout_secs),
    }
  }
}

/// Header set sent with every outbound fetch. Upstreams that block generic
/// library user agents accept these.
pub fn browser_headers() -> HeaderMap {
  let mut headers = HeaderMap::new();
  headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
  headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
  headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
  headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
  headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
  headers
}
