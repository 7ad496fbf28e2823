//! Endpoint discovery for XMPP domains.

use crate::{
    resolver::{DnssecResolver, Validated},
    Endpoint, SrvRecord, TransportMode, DEFAULT_PORT,
};
use futures_util::future::{join, join_all};
use std::{fmt::Debug, net::IpAddr};

mod outcome;
pub use outcome::{Failure, Outcome, QueryKind, Resolution};

/// Reasons a query produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum Error<Lookup: Debug> {
    /// DNS lookup errors, including answers that failed DNSSEC validation
    #[error("DNS lookup error: {0}")]
    Lookup(Lookup),
    /// The answer contained no records
    #[error("no records found")]
    NoRecords,
    /// Every SRV record had the root target `.`
    #[error("service decidedly not available")]
    ServiceUnavailable,
}

/// Resolves an XMPP domain into an ordered list of [`Endpoint`]s to try.
///
/// # Usage
///
/// Create one with [`XmppResolver::new_with_resolver`] and call
/// [`resolve`](XmppResolver::resolve). Connect to the returned endpoints in
/// order until one succeeds.
///
/// Both `_xmpps-client` (direct TLS) and `_xmpp-client` (STARTTLS) records are
/// looked up and every target is resolved to its addresses. Lookups never
/// fail the resolve as a whole: a failed query contributes nothing, and when
/// no SRV records exist at all the domain itself is returned on the default
/// port.
///
/// ## DNS Resolvers
///
/// Queries go through a client's [`DnssecResolver`], which can be set with
/// [`XmppResolver::resolver`].
#[derive(Debug, Clone)]
pub struct XmppResolver<Resolver> {
    resolver: Resolver,
    default_port: u16,
}

impl<Resolver: Default> XmppResolver<Resolver> {
    /// Creates a new client using a default-constructed resolver.
    pub fn new() -> Self {
        Self::new_with_resolver(Resolver::default())
    }
}

impl<Resolver: Default> Default for XmppResolver<Resolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Resolver> XmppResolver<Resolver> {
    /// Creates a new client that queries `resolver`.
    pub fn new_with_resolver(resolver: Resolver) -> Self {
        Self {
            resolver,
            default_port: DEFAULT_PORT,
        }
    }

    /// Sets the resolver of the client.
    pub fn resolver<R>(self, resolver: R) -> XmppResolver<R> {
        XmppResolver {
            resolver,
            default_port: self.default_port,
        }
    }

    /// Sets the port of the endpoint returned when a domain has no SRV records.
    pub fn default_port(self, default_port: u16) -> Self {
        Self {
            default_port,
            ..self
        }
    }
}

impl<Resolver: DnssecResolver> XmppResolver<Resolver> {
    /// Resolves `domain` into endpoints in the order they should be tried.
    ///
    /// The list is never empty.
    pub async fn resolve(&self, domain: &str) -> Vec<Endpoint> {
        self.resolve_detailed(domain).await.endpoints
    }

    /// Like [`resolve`](Self::resolve), but also reports which queries came
    /// back empty and why.
    pub async fn resolve_detailed(&self, domain: &str) -> Resolution<Resolver::Error> {
        let (mut resolution, starttls) = join(
            self.resolve_mode(domain, TransportMode::DirectTls),
            self.resolve_mode(domain, TransportMode::StartTls),
        )
        .await;
        resolution.merge(starttls);

        if resolution.endpoints.is_empty() {
            #[cfg(feature = "log")]
            tracing::debug!(domain, "No SRV records, falling back to the domain itself");
            resolution
                .endpoints
                .push(Endpoint::fallback(domain, self.default_port));
        }

        // Stable, so equal keys keep discovery order.
        resolution.endpoints.sort_by_key(Endpoint::sort_key);
        resolution
    }

    /// Looks up the SRV records advertising `domain`'s service for `mode`.
    ///
    /// Records with the root target `.` are dropped.
    pub async fn discover(
        &self,
        domain: &str,
        mode: TransportMode,
    ) -> Outcome<Resolver::Record, Resolver::Error> {
        let name = mode.srv_name(domain);
        match Outcome::from(self.resolver.query_srv(&name).await) {
            Outcome::Found(Validated {
                answers,
                authentic_data,
            }) => {
                let available: Vec<_> = answers
                    .into_iter()
                    .filter(|record| {
                        let unavailable = record.is_unavailable();
                        if unavailable {
                            #[cfg(feature = "log")]
                            tracing::trace!(%name, "Skipping SRV record with root target");
                        }
                        !unavailable
                    })
                    .collect();
                if available.is_empty() {
                    Outcome::Empty(Error::ServiceUnavailable)
                } else {
                    Outcome::Found(Validated::new(available, authentic_data))
                }
            }
            empty => empty,
        }
    }

    /// Resolves the target of `record` into endpoints.
    ///
    /// Produces one endpoint per IPv4 and IPv6 address found, each trusted only
    /// if both `srv_authenticated` and its own address answer hold. If neither
    /// family yields an address, produces a single address-less endpoint that
    /// inherits `srv_authenticated`.
    pub async fn resolve_target(
        &self,
        record: &Resolver::Record,
        mode: TransportMode,
        srv_authenticated: bool,
    ) -> Resolution<Resolver::Error> {
        let host = record.hostname();
        let (v4, v6) = join(
            self.resolver.query_ipv4(&host),
            self.resolver.query_ipv6(&host),
        )
        .await;
        let families = [
            (QueryKind::A, Outcome::from(v4).map(IpAddr::V4)),
            (QueryKind::Aaaa, Outcome::from(v6).map(IpAddr::V6)),
        ];

        let mut resolution = Resolution::default();
        for (kind, outcome) in families {
            match outcome {
                Outcome::Found(Validated {
                    answers,
                    authentic_data,
                }) => {
                    #[cfg(feature = "log")]
                    tracing::trace!(%host, %kind, count = answers.len(), authentic_data, "Resolved SRV target");
                    resolution.endpoints.extend(answers.into_iter().map(|ip| {
                        Endpoint::resolved(record, mode, ip, srv_authenticated, authentic_data)
                    }));
                }
                Outcome::Empty(error) => {
                    #[cfg(feature = "log")]
                    tracing::trace!(%host, %kind, %error, "No addresses for SRV target");
                    resolution.failures.push(Failure {
                        name: host.clone(),
                        kind,
                        error,
                    });
                }
            }
        }

        if resolution.endpoints.is_empty() {
            resolution
                .endpoints
                .push(Endpoint::unresolved(record, mode, srv_authenticated));
        }
        resolution
    }

    /// Discovers the SRV records for `mode` and resolves all their targets.
    async fn resolve_mode(&self, domain: &str, mode: TransportMode) -> Resolution<Resolver::Error> {
        match self.discover(domain, mode).await {
            Outcome::Found(Validated {
                answers,
                authentic_data,
            }) => {
                let targets = answers
                    .iter()
                    .map(|record| self.resolve_target(record, mode, authentic_data));
                let mut resolution = Resolution::default();
                for target in join_all(targets).await {
                    resolution.merge(target);
                }
                resolution
            }
            Outcome::Empty(error) => {
                let name = mode.srv_name(domain);
                #[cfg(feature = "log")]
                tracing::debug!(%name, %error, "SRV discovery produced no records");
                Resolution::failed(name, QueryKind::Srv, error)
            }
        }
    }
}
