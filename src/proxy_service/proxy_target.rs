use percent_encoding::percent_decode_str;
use reqwest::Url;

use crate::proxy_service::proxy_error::ProxyError;

const URL_KEY: &str = "url=";

/// Absolute http(s) URL a proxy call is forwarded to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyTarget {
  url: Url,
}

impl ProxyTarget {
  /// Extracts the target from a raw, still percent-encoded query string.
  ///
  /// Everything after `url=` belongs to the target, so an un-encoded target
  /// keeps its own `&`-separated query.
  pub fn from_query(raw_query: &str) -> Result<ProxyTarget, ProxyError> {
    let encoded = raw_url_param(raw_query).ok_or(ProxyError::MissingUrl)?;
    let decoded = percent_decode_str(encoded).decode_utf8_lossy();

    if decoded.is_empty() {
      return Err(ProxyError::MissingUrl);
    }

    let url = Url::parse(&decoded).map_err(|err| ProxyError::MalformedUrl(format!("{}: {}", err, decoded)))?;

    match url.scheme() {
      "http" | "https" => Ok(ProxyTarget { url }),
      other => Err(ProxyError::UnsupportedScheme(other.to_string())),
    }
  }

  pub fn url(&self) -> &Url {
    &self.url
  }
}

fn raw_url_param(raw_query: &str) -> Option<&str> {
  raw_query
    .strip_prefix(URL_KEY)
    .or_else(|| raw_query.split_once(&format!("&{}", URL_KEY)).map(|(_, value)| value))
}
