pub const RELAYED_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type put on relayed upstream bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentTypePolicy {
  /// Always `text/html; charset=utf-8`, whatever the upstream sent.
  #[default]
  ForceHtml,
  /// Keep the upstream content type, `text/html; charset=utf-8` when it sent none.
  PreserveUpstream,
}

impl ContentTypePolicy {
  pub fn from_preserve_flag(preserve: bool) -> Self {
    if preserve {
      ContentTypePolicy::PreserveUpstream
    } else {
      ContentTypePolicy::ForceHtml
    }
  }

  pub fn resolve<'a>(&self, upstream: Option<&'a str>) -> &'a str {
    match (self, upstream) {
      (ContentTypePolicy::PreserveUpstream, Some(content_type)) => content_type,
      _ => RELAYED_CONTENT_TYPE,
    }
  }
}

pub struct ProxyConfig {
  pub content_type: ContentTypePolicy,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_policy_relabels_as_html() {
    let policy = ContentTypePolicy::default();

    assert_eq!(policy.resolve(Some("image/png")), RELAYED_CONTENT_TYPE);
    assert_eq!(policy.resolve(None), RELAYED_CONTENT_TYPE);
  }

  #[test]
  fn preserving_policy_falls_back_to_html() {
    let policy = ContentTypePolicy::from_preserve_flag(true);

    assert_eq!(policy.resolve(Some("application/json")), "application/json");
    assert_eq!(policy.resolve(None), RELAYED_CONTENT_TYPE);
  }
}
