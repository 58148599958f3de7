use std::path::PathBuf;

use actix_web::guard::{self, Guard};
use actix_web::http::Method;
use actix_web::web::{self, ServiceConfig};
use actix_web::HttpResponse;

use crate::proxy_service::proxy_route_service::{self, ProxyRouteService};
use crate::proxy_service::PROXY_PATH;
use crate::static_files;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Preflight,
  Proxy,
  Static,
}

/// The single branching decision of the server.
pub fn classify(method: &Method, path: &str, proxy_enabled: bool) -> Route {
  if method == Method::OPTIONS {
    Route::Preflight
  } else if proxy_enabled && method == Method::GET && path == PROXY_PATH {
    Route::Proxy
  } else {
    Route::Static
  }
}

#[derive(Clone)]
pub struct Routes {
  pub static_root: PathBuf,
  pub proxy: Option<web::Data<ProxyRouteService>>,
}

impl Routes {
  fn guard(&self, route: Route) -> impl Guard {
    let proxy_enabled = self.proxy.is_some();
    guard::fn_guard(move |ctx| classify(&ctx.head().method, ctx.head().uri.path(), proxy_enabled) == route)
  }

  pub fn configure(&self, cfg: &mut ServiceConfig) {
    cfg.service(
      web::resource("/{tail:.*}")
        .guard(self.guard(Route::Preflight))
        .to(preflight),
    );

    if let Some(proxy) = &self.proxy {
      cfg.app_data(proxy.clone()).service(
        web::resource(PROXY_PATH)
          .guard(self.guard(Route::Proxy))
          .to(proxy_route_service::handle),
      );
    }

    static_files::register(cfg, &self.static_root, self.guard(Route::Static));
  }
}

async fn preflight() -> HttpResponse {
  HttpResponse::Ok().finish()
}
