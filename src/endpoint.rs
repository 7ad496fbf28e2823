//! Connection candidates produced by a resolve.

use crate::SrvRecord;
use std::{
    fmt,
    net::{IpAddr, SocketAddr},
};

/// How a client secures a connection to an [`Endpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    /// TLS from the first byte (`_xmpps-client`).
    DirectTls,
    /// Plaintext stream upgraded in-band with STARTTLS (`_xmpp-client`).
    StartTls,
}

impl TransportMode {
    /// The well-known SRV service label for this mode.
    pub const fn service(self) -> &'static str {
        match self {
            TransportMode::DirectTls => "_xmpps-client",
            TransportMode::StartTls => "_xmpp-client",
        }
    }

    /// Builds the SRV query name for `domain`, e.g. `_xmpp-client._tcp.example.com`.
    pub fn srv_name(self, domain: &str) -> String {
        format!("{}._tcp.{}", self.service(), domain)
    }
}

/// A single connection candidate.
///
/// Endpoints are built in one step from everything that determines them and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    ip: Option<IpAddr>,
    hostname: Box<str>,
    port: u16,
    mode: TransportMode,
    priority: u16,
    authenticated: bool,
}

impl Endpoint {
    /// Endpoint for a SRV target whose address the caller still has to look up.
    pub(crate) fn unresolved<R: SrvRecord + ?Sized>(
        record: &R,
        mode: TransportMode,
        authenticated: bool,
    ) -> Self {
        Self {
            ip: None,
            hostname: record.hostname().into(),
            port: record.port(),
            mode,
            priority: record.priority(),
            authenticated,
        }
    }

    /// Endpoint for one resolved address of a SRV target.
    ///
    /// Trusted only if both the SRV answer and the address answer were
    /// DNSSEC-validated.
    pub(crate) fn resolved<R: SrvRecord + ?Sized>(
        record: &R,
        mode: TransportMode,
        ip: IpAddr,
        srv_authenticated: bool,
        address_authenticated: bool,
    ) -> Self {
        Self {
            ip: Some(ip),
            hostname: record.hostname().into(),
            port: record.port(),
            mode,
            priority: record.priority(),
            authenticated: srv_authenticated && address_authenticated,
        }
    }

    /// Endpoint used when `domain` publishes no SRV records at all.
    pub(crate) fn fallback(domain: &str, port: u16) -> Self {
        let domain = domain.strip_suffix('.').unwrap_or(domain);
        Self {
            ip: None,
            hostname: domain.into(),
            port,
            mode: TransportMode::StartTls,
            priority: 0,
            authenticated: false,
        }
    }

    /// The resolved address, if the target's address lookup succeeded.
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// The host to connect to (and to verify the certificate against).
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The port to connect to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The transport security mode.
    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Whether the connection should start with TLS.
    pub fn is_direct_tls(&self) -> bool {
        self.mode == TransportMode::DirectTls
    }

    /// SRV priority; lower is preferred.
    pub fn priority(&self) -> u16 {
        self.priority
    }

    /// Whether every DNS answer this endpoint was derived from was validated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The socket address to connect to, when the address is known.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.ip.map(|ip| SocketAddr::new(ip, self.port))
    }

    /// Key giving the connection attempt order: ascending priority, then
    /// STARTTLS before direct TLS.
    pub(crate) fn sort_key(&self) -> (u16, bool) {
        (self.priority, self.is_direct_tls())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint{{ip=")?;
        match self.ip {
            Some(ip) => write!(f, "'{ip}'")?,
            None => write!(f, "none")?,
        }
        write!(
            f,
            ", hostname='{}', port={}, direct_tls={}, authenticated={}, priority={}}}",
            self.hostname,
            self.port,
            self.is_direct_tls(),
            self.authenticated,
            self.priority
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_PORT;
    use std::net::Ipv4Addr;

    struct Record;

    impl SrvRecord for Record {
        type Target = str;

        fn target(&self) -> &str {
            "xmpp.example.com."
        }

        fn port(&self) -> u16 {
            5223
        }

        fn priority(&self) -> u16 {
            10
        }

        fn weight(&self) -> u16 {
            5
        }
    }

    #[test]
    fn srv_names() {
        assert_eq!(
            TransportMode::StartTls.srv_name("example.com"),
            "_xmpp-client._tcp.example.com"
        );
        assert_eq!(
            TransportMode::DirectTls.srv_name("example.com"),
            "_xmpps-client._tcp.example.com"
        );
    }

    #[test]
    fn fallback_shape() {
        let endpoint = Endpoint::fallback("example.com", DEFAULT_PORT);
        assert_eq!(endpoint.hostname(), "example.com");
        assert_eq!(endpoint.port(), 5222);
        assert_eq!(endpoint.ip(), None);
        assert!(!endpoint.is_direct_tls());
        assert!(!endpoint.is_authenticated());
        assert_eq!(endpoint.priority(), 0);
    }

    #[test]
    fn fallback_drops_root_dot() {
        let endpoint = Endpoint::fallback("example.com.", DEFAULT_PORT);
        assert_eq!(endpoint.hostname(), "example.com");
    }

    #[test]
    fn resolved_trust_is_conjunctive() {
        let ip = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
        for (srv, addr) in [(true, true), (true, false), (false, true), (false, false)] {
            let endpoint = Endpoint::resolved(&Record, TransportMode::DirectTls, ip, srv, addr);
            assert_eq!(endpoint.is_authenticated(), srv && addr);
            assert_eq!(endpoint.socket_addr(), Some(SocketAddr::new(ip, 5223)));
            assert_eq!(endpoint.hostname(), "xmpp.example.com");
        }
    }

    #[test]
    fn unresolved_keeps_srv_trust() {
        let endpoint = Endpoint::unresolved(&Record, TransportMode::StartTls, true);
        assert!(endpoint.is_authenticated());
        assert_eq!(endpoint.socket_addr(), None);
        assert_eq!(endpoint.priority(), 10);
    }

    #[test]
    fn sort_key_prefers_starttls_on_ties() {
        let starttls = Endpoint::unresolved(&Record, TransportMode::StartTls, false);
        let direct = Endpoint::unresolved(&Record, TransportMode::DirectTls, false);
        assert!(starttls.sort_key() < direct.sort_key());
    }

    #[test]
    fn display() {
        let endpoint = Endpoint::fallback("example.com", DEFAULT_PORT);
        assert_eq!(
            endpoint.to_string(),
            "Endpoint{ip=none, hostname='example.com', port=5222, direct_tls=false, authenticated=false, priority=0}"
        );
    }
}
