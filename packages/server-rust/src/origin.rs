//! Network origin resolvers used by the HTTP layer.
//!
//! - [`LocalAddrResolver`]: the address of the interface this service uses
//!   for outbound traffic. Internal deployments run the preview instance on a
//!   diagnostic address, so this is what the privileged check sees.
//! - [`PeerOriginResolver`]: the remote address of the current HTTP caller.
//!
//! [`StaticOriginResolver`](banner_core::StaticOriginResolver) from the core
//! crate covers the fixed-origin case.

use std::net::{IpAddr, SocketAddr, UdpSocket};

use anyhow::Context as _;
use banner_core::OriginResolver;

/// Default routing probe target. No packet is sent: connecting a UDP socket
/// only asks the kernel which local interface would be used.
pub const DEFAULT_ROUTE_PROBE: &str = "8.8.8.8:80";

/// Reports the local interface address used to reach `probe`.
#[derive(Debug, Clone)]
pub struct LocalAddrResolver {
    probe: String,
}

impl LocalAddrResolver {
    #[must_use]
    pub fn new(probe: impl Into<String>) -> Self {
        Self {
            probe: probe.into(),
        }
    }
}

impl Default for LocalAddrResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_PROBE)
    }
}

impl OriginResolver for LocalAddrResolver {
    fn resolve(&self) -> anyhow::Result<String> {
        let socket = UdpSocket::bind("0.0.0.0:0").context("binding route probe socket")?;
        socket
            .connect(&self.probe)
            .with_context(|| format!("no route to {}", self.probe))?;
        let addr = socket.local_addr().context("reading local address")?;
        Ok(addr.ip().to_string())
    }
}

/// Reports the IP of a connected HTTP peer. One instance per request.
///
/// Built without a peer address (the listener did not record one), it fails
/// to resolve instead of guessing.
#[derive(Debug, Clone, Copy)]
pub struct PeerOriginResolver {
    peer: Option<IpAddr>,
}

impl PeerOriginResolver {
    #[must_use]
    pub fn new(peer: Option<IpAddr>) -> Self {
        Self { peer }
    }
}

impl From<SocketAddr> for PeerOriginResolver {
    fn from(addr: SocketAddr) -> Self {
        Self::new(Some(addr.ip()))
    }
}

impl OriginResolver for PeerOriginResolver {
    fn resolve(&self) -> anyhow::Result<String> {
        self.peer
            .map(|ip| ip.to_string())
            .ok_or_else(|| anyhow::anyhow!("peer address unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn peer_resolver_reports_ip_without_port() {
        let addr = SocketAddr::from((Ipv4Addr::new(10, 0, 0, 2), 51_234));
        let resolver = PeerOriginResolver::from(addr);
        assert_eq!(resolver.resolve().unwrap(), "10.0.0.2");
    }

    #[test]
    fn peer_resolver_formats_ipv6() {
        let resolver = PeerOriginResolver::new(Some("::1".parse().unwrap()));
        assert_eq!(resolver.resolve().unwrap(), "::1");
    }

    #[test]
    fn peer_resolver_without_address_fails() {
        assert!(PeerOriginResolver::new(None).resolve().is_err());
    }

    #[test]
    fn local_resolver_loopback_probe() {
        let resolver = LocalAddrResolver::new("127.0.0.1:9");
        assert_eq!(resolver.resolve().unwrap(), "127.0.0.1");
    }

    #[test]
    fn local_resolver_rejects_bad_probe() {
        let resolver = LocalAddrResolver::new("not an address");
        assert!(resolver.resolve().is_err());
    }
}
