use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream, UdpSocket};
use std::path::Path;
use std::time::Duration;

use crate::proxy_service::PROXY_PATH;

const PORT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

/// A listener already answers on `127.0.0.1:port`.
pub fn is_port_in_use(port: u16) -> bool {
  let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
  TcpStream::connect_timeout(&addr, PORT_PROBE_TIMEOUT).is_ok()
}

/// Address other devices on the LAN reach this machine on. The UDP socket
/// never sends anything, connecting only picks the outbound interface.
pub fn local_ip() -> Option<IpAddr> {
  let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
  socket.connect(("8.8.8.8", 80)).ok()?;
  socket.local_addr().ok().map(|addr| addr.ip())
}

pub fn banner(static_root: &Path, port: u16, proxy_enabled: bool) -> Vec<String> {
  let lan_host = local_ip().map_or_else(|| "localhost".to_string(), |ip| ip.to_string());

  let mut lines = vec![
    "\nDevelopment Server".to_string(),
    format!("Serving files from: {}", static_root.display()),
    format!("Server running at: http://localhost:{}", port),
    format!("LAN access: http://{}:{}", lan_host, port),
  ];

  if proxy_enabled {
    lines.push(format!("\nProxy endpoint enabled: {}?url=<URL>", PROXY_PATH));
  }
  lines.push("Press Ctrl+C to stop the server\n".to_string());

  lines
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::net::TcpListener;

  #[test]
  fn detects_bound_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    assert!(is_port_in_use(port));
  }

  #[test]
  fn free_port_is_not_in_use() {
    let port = crate::test_support::unused_addr().port();

    assert!(!is_port_in_use(port));
  }

  #[test]
  fn banner_mentions_proxy_only_when_enabled() {
    let with_proxy = banner(Path::new("/srv/public"), 7050, true).join("\n");
    let without_proxy = banner(Path::new("/srv/public"), 7050, false).join("\n");

    assert!(with_proxy.contains("Serving files from: /srv/public"));
    assert!(with_proxy.contains("http://localhost:7050"));
    assert!(with_proxy.contains("/api/proxy?url=<URL>"));
    assert!(!without_proxy.contains("/api/proxy"));
  }
}
