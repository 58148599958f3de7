//! Mock origins and assertions shared by the unit tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::http::header::HeaderMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::response_headers::RESPONSE_HEADERS;

pub struct MockBackend {
  addr: SocketAddr,
  requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
  pub fn url(&self, path: &str) -> String {
    format!("http://{}{}", self.addr, path)
  }

  pub fn last_request(&self) -> Option<String> {
    self.requests.lock().unwrap().last().cloned()
  }
}

/// Answers every connection with the same response and records the request head.
pub async fn start_mock_backend(status: u16, content_type: &'static str, body: &'static str) -> MockBackend {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  let requests = Arc::new(Mutex::new(Vec::new()));
  let recorded = requests.clone();

  tokio::spawn(async move {
    while let Ok((mut socket, _)) = listener.accept().await {
      let recorded = recorded.clone();
      tokio::spawn(async move {
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
          match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
          }
        }
        recorded.lock().unwrap().push(String::from_utf8_lossy(&head).into_owned());

        let response = format!(
          "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
          status,
          content_type,
          body.len(),
          body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
      });
    }
  });

  MockBackend { addr, requests }
}

pub struct SilentBackend {
  pub addr: SocketAddr,
  closed: Arc<AtomicUsize>,
}

impl SilentBackend {
  pub fn url(&self, path: &str) -> String {
    format!("http://{}{}", self.addr, path)
  }

  /// Connections the client side has closed so far.
  pub fn closed(&self) -> usize {
    self.closed.load(Ordering::SeqCst)
  }
}

/// Accepts connections and never answers. Reads until the peer hangs up.
pub async fn start_hanging_backend() -> SilentBackend {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  let closed = Arc::new(AtomicUsize::new(0));
  let counter = closed.clone();

  tokio::spawn(async move {
    while let Ok((mut socket, _)) = listener.accept().await {
      let counter = counter.clone();
      tokio::spawn(async move {
        let mut buf = [0u8; 1024];
        while let Ok(n) = socket.read(&mut buf).await {
          if n == 0 {
            break;
          }
        }
        counter.fetch_add(1, Ordering::SeqCst);
      });
    }
  });

  SilentBackend { addr, closed }
}

/// Polls `done` every 20ms until it holds or `limit` passes.
pub async fn wait_until<F: Fn() -> bool>(limit: std::time::Duration, done: F) -> bool {
  let deadline = std::time::Instant::now() + limit;
  while std::time::Instant::now() < deadline {
    if done() {
      return true;
    }
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
  }
  done()
}

/// An address nothing listens on.
pub fn unused_addr() -> SocketAddr {
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  listener.local_addr().unwrap()
}

/// Fresh directory under the system temp dir holding the given files.
pub fn static_root(files: &[(&str, &str)]) -> PathBuf {
  static COUNTER: AtomicUsize = AtomicUsize::new(0);

  let dir = std::env::temp_dir().join(format!(
    "dev_proxy_server-{}-{}",
    std::process::id(),
    COUNTER.fetch_add(1, Ordering::SeqCst)
  ));
  std::fs::create_dir_all(&dir).unwrap();

  for (name, contents) in files {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
  }

  dir.canonicalize().unwrap()
}

pub fn assert_response_headers(headers: &HeaderMap) {
  for (name, value) in RESPONSE_HEADERS {
    assert_eq!(
      headers.get(&name).and_then(|v| v.to_str().ok()),
      Some(value),
      "header {}",
      name
    );
  }
}
