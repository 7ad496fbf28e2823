//! DNSSEC-validating resolver backed by [`hickory_resolver`].

use super::{DnssecResolver, Validated};
use crate::{platform::DnsServerLookup, SrvRecord};
use async_trait::async_trait;
use hickory_resolver::{
    config::{NameServerConfig, ResolverConfig},
    lookup::Lookup,
    name_server::{ConnectionProvider, TokioConnectionProvider},
    proto::{rr::rdata::SRV, xfer::Protocol},
    Name, ResolveError, Resolver, TokioResolver,
};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Builds a tokio resolver that validates DNSSEC, talking to the name servers
/// reported by `lookup`.
///
/// Falls back to hickory's default upstreams when `lookup` knows of none.
pub fn dnssec_resolver(lookup: &dyn DnsServerLookup) -> TokioResolver {
    let servers = lookup.dns_servers();
    let config = if servers.is_empty() {
        #[cfg(feature = "log")]
        tracing::debug!("No local DNS servers found, using default upstreams");
        ResolverConfig::default()
    } else {
        let mut config = ResolverConfig::new();
        for addr in servers {
            config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));
            config.add_name_server(NameServerConfig::new(addr, Protocol::Tcp));
        }
        config
    };

    let mut builder =
        TokioResolver::builder_with_config(config, TokioConnectionProvider::default());
    builder.options_mut().validate = true;
    builder.build()
}

/// Builds a validating resolver from the process-wide DNS server lookup
/// mechanism, if one was registered with
/// [`register_lookup_mechanism`](crate::platform::register_lookup_mechanism).
pub fn dnssec_resolver_from_registered() -> Option<TokioResolver> {
    crate::platform::registered_lookup_mechanism().map(|lookup| dnssec_resolver(lookup.as_ref()))
}

/// Errors from the hickory backend.
#[derive(Debug, thiserror::Error)]
pub enum HickoryError {
    /// The lookup itself failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// At least one record in the answer failed DNSSEC validation
    #[error("DNSSEC validation failed for {0}")]
    Bogus(Name),
}

/// Checks the DNSSEC proofs of an answer.
///
/// Any bogus record rejects the whole answer. Otherwise the answer is
/// authentic only if it is non-empty and every record carries a secure proof.
fn authentic_data(lookup: &Lookup) -> Result<bool, HickoryError> {
    let records = lookup.records();
    if let Some(bogus) = records.iter().find(|record| record.proof().is_bogus()) {
        return Err(HickoryError::Bogus(bogus.name().clone()));
    }
    Ok(!records.is_empty() && records.iter().all(|record| record.proof().is_secure()))
}

#[async_trait]
impl<P> DnssecResolver for Resolver<P>
where
    P: ConnectionProvider,
{
    type Record = SRV;
    type Error = HickoryError;

    async fn query_srv(&self, name: &str) -> Result<Validated<Vec<SRV>>, HickoryError> {
        let lookup = self.srv_lookup(name).await?;
        let authentic_data = authentic_data(lookup.as_lookup())?;
        Ok(Validated::new(lookup.into_iter().collect(), authentic_data))
    }

    async fn query_ipv4(&self, host: &str) -> Result<Validated<Vec<Ipv4Addr>>, HickoryError> {
        let lookup = self.ipv4_lookup(host).await?;
        let authentic_data = authentic_data(lookup.as_lookup())?;
        Ok(Validated::new(
            lookup.into_iter().map(|a| a.0).collect(),
            authentic_data,
        ))
    }

    async fn query_ipv6(&self, host: &str) -> Result<Validated<Vec<Ipv6Addr>>, HickoryError> {
        let lookup = self.ipv6_lookup(host).await?;
        let authentic_data = authentic_data(lookup.as_lookup())?;
        Ok(Validated::new(
            lookup.into_iter().map(|aaaa| aaaa.0).collect(),
            authentic_data,
        ))
    }
}

impl SrvRecord for SRV {
    type Target = Name;

    fn target(&self) -> &Self::Target {
        self.target()
    }

    fn port(&self) -> u16 {
        self.port()
    }

    fn priority(&self) -> u16 {
        self.priority()
    }

    fn weight(&self) -> u16 {
        self.weight()
    }
}
