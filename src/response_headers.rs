use actix_web::body::MessageBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{
  HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
  ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, EXPIRES, PRAGMA,
};
use actix_web::error::InternalError;
use actix_web::Error;
use futures_core::future::LocalBoxFuture;
use futures_util::future::{ready, Ready};

/// Headers written onto every response, success or error.
pub const RESPONSE_HEADERS: [(HeaderName, &str); 6] = [
  (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
  (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, PUT, DELETE, OPTIONS"),
  (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
  (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
  (PRAGMA, "no-cache"),
  (EXPIRES, "0"),
];

pub fn apply(headers: &mut HeaderMap) {
  for (name, value) in RESPONSE_HEADERS {
    headers.insert(name, HeaderValue::from_static(value));
  }
}

/// Finalizes response headers for the whole app. Errors that escape inner
/// services are rendered here and passed on with the headers already set.
pub struct ResponseHeaders;

impl<S, B> Transform<S, ServiceRequest> for ResponseHeaders
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = ResponseHeadersService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(ResponseHeadersService { service }))
  }
}

pub struct ResponseHeadersService<S> {
  service: S,
}

impl<S, B> Service<ServiceRequest> for ResponseHeadersService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let inner = self.service.call(req);

    Box::pin(async move {
      match inner.await {
        Ok(mut response) => {
          apply(response.headers_mut());
          Ok(response)
        }
        Err(err) => {
          let mut response = err.error_response();
          apply(response.headers_mut());
          Err(InternalError::from_response(err.to_string(), response).into())
        }
      }
    })
  }
}
