//! Network infrastructure: local address discovery.

use std::net::UdpSocket;

/// Fallback when no route to the server can be found.
pub const LOOPBACK: &str = "127.0.0.1";

/// `host:port` of an `http(s)://` URL, with the scheme's default port.
#[must_use]
pub fn server_authority(server_url: &str) -> Option<String> {
    let (default_port, rest) = if let Some(rest) = server_url.strip_prefix("https://") {
        (443, rest)
    } else {
        (80, server_url.strip_prefix("http://")?)
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return None;
    }
    let has_port = authority
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    Some(if has_port {
        authority.to_string()
    } else {
        format!("{authority}:{default_port}")
    })
}

/// Address of the interface used to reach the server.
///
/// Connecting a UDP socket only selects a route; nothing is sent.
#[must_use]
pub fn local_ip_address(server_url: &str) -> String {
    let probe = || -> std::io::Result<String> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        let target = server_authority(server_url).unwrap_or_else(|| "8.8.8.8:80".to_string());
        socket.connect(target)?;
        Ok(socket.local_addr()?.ip().to_string())
    };
    probe().unwrap_or_else(|e| {
        tracing::debug!(error = %e, "cannot determine local address");
        LOOPBACK.to_string()
    })
}
