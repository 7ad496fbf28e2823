#![deny(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/*!
DNSSEC-aware discovery of the endpoints serving an XMPP domain.

# Introduction

XMPP servers advertise where clients should connect with SRV records, as
defined in [RFC 2782](https://tools.ietf.org/html/rfc2782) and
[RFC 6120](https://tools.ietf.org/html/rfc6120#section-3.2), under two
service labels: `_xmpp-client` for plaintext connections upgraded with
STARTTLS and `_xmpps-client` for direct TLS
([XEP-0368](https://xmpp.org/extensions/xep-0368.html)).

For instance, a DNS server might respond with the following records for
`example.com`:

```text
_xmpp-client._tcp.example.com.  60 IN SRV 10 0 5222 xmpp1.example.com.
_xmpp-client._tcp.example.com.  60 IN SRV 20 0 5222 xmpp2.example.com.
_xmpps-client._tcp.example.com. 60 IN SRV 10 0 5223 xmpp1.example.com.
```

[`XmppResolver::resolve`] looks up both labels concurrently, resolves every
target's IPv4 and IPv6 addresses, and returns the resulting [`Endpoint`]s in
the order a client should try them: ascending priority, with STARTTLS before
direct TLS on equal priority. With the records above, that is
`xmpp1.example.com:5222`, then `xmpp1.example.com:5223`, then
`xmpp2.example.com:5222` (once per address found). When a domain publishes
no SRV records at all, the domain itself on port 5222 is returned, so the
list is never empty.

Every endpoint carries an authenticated flag, set only when every DNS answer
it was derived from was DNSSEC-validated: both the SRV answer and, for
endpoints with an address, the address answer.

# Resolvers and Platform Integration

Lookups go through the [`DnssecResolver`] trait. The following backend is
enabled by default:

- `hickory` (via [`hickory_resolver::Resolver`])

Platforms that do not expose their DNS servers to the standard system
configuration can supply them through [`platform::DnsServerLookup`], either
directly when building a resolver or once at startup with
[`platform::register_lookup_mechanism`].

[`DnssecResolver`]: resolver::DnssecResolver
*/

mod client;
pub use client::{Error, Failure, Outcome, QueryKind, Resolution, XmppResolver};

mod endpoint;
pub use endpoint::{Endpoint, TransportMode};

mod record;
pub use record::SrvRecord;

pub mod platform;
pub mod resolver;

/// Port used when a domain publishes no SRV records.
pub const DEFAULT_PORT: u16 = 5222;
