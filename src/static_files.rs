use std::path::Path;

use actix_files::Files;
use actix_web::dev::Service;
use actix_web::guard::Guard;
use actix_web::http::header::{HeaderValue, CONTENT_TYPE};
use actix_web::web::{self, ServiceConfig};

pub const INDEX_FILE: &str = "index.html";

/// Content types forced on successful static responses, by file extension.
pub const MIME_OVERRIDES: [(&str, &str); 4] = [
  ("js", "application/javascript"),
  ("css", "text/css"),
  ("html", "text/html"),
  ("json", "application/json"),
];

pub fn mime_override(path: &str) -> Option<&'static str> {
  let extension = Path::new(path).extension()?.to_str()?;

  MIME_OVERRIDES
    .iter()
    .find(|(ext, _)| *ext == extension)
    .map(|(_, mime)| *mime)
}

/// Mounts `root` at `/`, reachable only for requests `guard` lets through.
pub fn register<G>(cfg: &mut ServiceConfig, root: &Path, guard: G)
where
  G: Guard + 'static,
{
  cfg.service(
    web::scope("")
      .guard(guard)
      .wrap_fn(|req, srv| {
        let mime = mime_override(req.path());
        let response = srv.call(req);

        async move {
          let mut response = response.await?;
          if let Some(mime) = mime {
            if response.status().is_success() {
              response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(mime));
            }
          }
          Ok(response)
        }
      })
      .service(
        Files::new("", root)
          .index_file(INDEX_FILE)
          .show_files_listing()
          .redirect_to_slash_directory(),
      ),
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::static_root;
  use actix_web::guard;
  use actix_web::http::StatusCode;
  use actix_web::test::{self, TestRequest};
  use actix_web::App;
  use pretty_assertions::assert_eq;

  #[test]
  fn overrides_by_extension() {
    assert_eq!(mime_override("/js/app.js"), Some("application/javascript"));
    assert_eq!(mime_override("/style.css"), Some("text/css"));
    assert_eq!(mime_override("/index.html"), Some("text/html"));
    assert_eq!(mime_override("/data/items.json"), Some("application/json"));
    assert_eq!(mime_override("/logo.png"), None);
    assert_eq!(mime_override("/"), None);
  }

  #[actix_web::test]
  async fn serves_files_with_overridden_types() {
    let root = static_root(&[
      ("app.js", "console.log('hi');"),
      ("data.json", "{}"),
      ("index.html", "<h1>home</h1>"),
    ]);
    let app = test::init_service(App::new().configure(|cfg| register(cfg, &root, guard::Any(guard::Get()).or(guard::Head())))).await;

    for (uri, mime) in [("/app.js", "application/javascript"), ("/data.json", "application/json")] {
      let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
      assert_eq!(res.status(), StatusCode::OK, "{}", uri);
      assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), mime);
    }

    let index = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(index.status(), StatusCode::OK);
    assert_eq!(test::read_body(index).await, "<h1>home</h1>");
  }

  #[actix_web::test]
  async fn missing_file_keeps_error_type() {
    let root = static_root(&[]);
    let app = test::init_service(App::new().configure(|cfg| register(cfg, &root, guard::Get()))).await;

    let res = test::call_service(&app, TestRequest::get().uri("/gone.js").to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_ne!(
      res.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
      Some("application/javascript")
    );
  }
}
