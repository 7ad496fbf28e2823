//! DNSSEC-aware DNS backends.

use crate::SrvRecord;
use async_trait::async_trait;
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    sync::Arc,
};

#[cfg(feature = "hickory")]
pub mod hickory;

/// Answers to a DNS query together with its DNSSEC validation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T> {
    /// Records in the answer section.
    pub answers: T,
    /// Whether the whole answer set was validated from a trust anchor (the
    /// DNS "authentic data" bit).
    pub authentic_data: bool,
}

impl<T> Validated<T> {
    /// Wraps an answer with its validation status.
    pub fn new(answers: T, authentic_data: bool) -> Self {
        Self {
            answers,
            authentic_data,
        }
    }
}

/// Represents the ability to act as a DNSSEC-validating resolver for the
/// record types needed to locate a service.
///
/// Answers that fail validation must be reported as errors, not returned
/// with `authentic_data` unset.
#[async_trait]
pub trait DnssecResolver: Send + Sync {
    /// SRV record representation produced by the resolver.
    type Record: SrvRecord + Send + Sync;

    /// Errors encountered during lookups.
    type Error: std::error::Error + Send + 'static;

    /// Gets the SRV records published at `name`.
    async fn query_srv(&self, name: &str)
        -> Result<Validated<Vec<Self::Record>>, Self::Error>;

    /// Gets the IPv4 addresses of `host`.
    async fn query_ipv4(&self, host: &str) -> Result<Validated<Vec<Ipv4Addr>>, Self::Error>;

    /// Gets the IPv6 addresses of `host`.
    async fn query_ipv6(&self, host: &str) -> Result<Validated<Vec<Ipv6Addr>>, Self::Error>;
}

#[async_trait]
impl<R: DnssecResolver + ?Sized> DnssecResolver for Arc<R> {
    type Record = R::Record;
    type Error = R::Error;

    async fn query_srv(
        &self,
        name: &str,
    ) -> Result<Validated<Vec<Self::Record>>, Self::Error> {
        (**self).query_srv(name).await
    }

    async fn query_ipv4(&self, host: &str) -> Result<Validated<Vec<Ipv4Addr>>, Self::Error> {
        (**self).query_ipv4(host).await
    }

    async fn query_ipv6(&self, host: &str) -> Result<Validated<Vec<Ipv6Addr>>, Self::Error> {
        (**self).query_ipv6(host).await
    }
}
