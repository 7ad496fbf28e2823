//! Discovery of the DNS servers configured on the host.
//!
//! Some platforms (Android being the usual example) do not expose their
//! resolvers through `/etc/resolv.conf`, so the application supplies a
//! [`DnsServerLookup`] once at startup. Nothing in the resolve path reads the
//! registration implicitly: backends are built from a lookup passed in
//! explicitly, e.g. with `resolver::hickory::dnssec_resolver`.

use std::{
    net::SocketAddr,
    sync::{Arc, OnceLock},
};

/// A platform capability that enumerates locally configured DNS servers.
pub trait DnsServerLookup: Send + Sync {
    /// Gets the DNS servers the host is configured to use, most preferred
    /// first. An empty list means none could be determined.
    fn dns_servers(&self) -> Vec<SocketAddr>;
}

impl<F> DnsServerLookup for F
where
    F: Fn() -> Vec<SocketAddr> + Send + Sync,
{
    fn dns_servers(&self) -> Vec<SocketAddr> {
        self()
    }
}

/// A fixed list of DNS servers.
#[derive(Debug, Clone, Default)]
pub struct StaticServers(pub Vec<SocketAddr>);

impl DnsServerLookup for StaticServers {
    fn dns_servers(&self) -> Vec<SocketAddr> {
        self.0.clone()
    }
}

/// Reads DNS servers from the operating system's resolver configuration.
#[cfg(feature = "hickory")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemConf;

#[cfg(feature = "hickory")]
impl DnsServerLookup for SystemConf {
    fn dns_servers(&self) -> Vec<SocketAddr> {
        match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, _)) => {
                let mut servers = Vec::new();
                for ns in config.name_servers() {
                    if !servers.contains(&ns.socket_addr) {
                        servers.push(ns.socket_addr);
                    }
                }
                servers
            }
            #[cfg_attr(not(feature = "log"), allow(unused_variables))]
            Err(e) => {
                #[cfg(feature = "log")]
                tracing::debug!(%e, "Failed to read system DNS configuration");
                Vec::new()
            }
        }
    }
}

static LOOKUP_MECHANISM: OnceLock<Arc<dyn DnsServerLookup>> = OnceLock::new();

/// Registers the process-wide DNS server lookup mechanism.
///
/// Only the first registration takes effect; returns whether this call was it.
pub fn register_lookup_mechanism(mechanism: impl DnsServerLookup + 'static) -> bool {
    let mut registered = false;
    LOOKUP_MECHANISM.get_or_init(|| {
        registered = true;
        Arc::new(mechanism)
    });
    if !registered {
        #[cfg(feature = "log")]
        tracing::trace!("DNS server lookup mechanism already registered, ignoring");
    }
    registered
}

/// Gets the mechanism registered with [`register_lookup_mechanism`], if any.
pub fn registered_lookup_mechanism() -> Option<&'static Arc<dyn DnsServerLookup>> {
    LOOKUP_MECHANISM.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn server(last: u8) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, last)), 53)
    }

    #[test]
    fn static_servers() {
        let lookup = StaticServers(vec![server(1), server(2)]);
        assert_eq!(lookup.dns_servers(), vec![server(1), server(2)]);
    }

    #[test]
    fn closure_lookup() {
        let lookup = || vec![server(3)];
        assert_eq!(lookup.dns_servers(), vec![server(3)]);
    }

    #[test]
    fn registration_is_idempotent() {
        // The only test touching the process-wide registration.
        let first = register_lookup_mechanism(StaticServers(vec![server(1)]));
        let second = register_lookup_mechanism(StaticServers(vec![server(2)]));
        assert!(first);
        assert!(!second);
        let registered = registered_lookup_mechanism().unwrap();
        assert_eq!(registered.dns_servers(), vec![server(1)]);
    }
}
