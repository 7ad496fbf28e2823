//! SRV records.

use std::fmt::Display;

/// Representation of types that contain the fields of a SRV record.
pub trait SrvRecord {
    /// Type representing the SRV record's target. Must implement `Display` so
    /// it can be turned into an endpoint hostname.
    type Target: Display + ?Sized;

    /// Gets a SRV record's target.
    fn target(&self) -> &Self::Target;

    /// Gets a SRV record's port.
    fn port(&self) -> u16;

    /// Gets a SRV record's priority.
    fn priority(&self) -> u16;

    /// Gets a SRV record's weight.
    fn weight(&self) -> u16;

    /// Gets a SRV record's target as a hostname, without the trailing root dot.
    fn hostname(&self) -> String {
        let target = self.target().to_string();
        match target.strip_suffix('.') {
            Some(stripped) => stripped.to_owned(),
            None => target,
        }
    }

    /// Whether the record says the service is decidedly not available at this
    /// domain (RFC 2782: a target of `.`).
    fn is_unavailable(&self) -> bool {
        self.hostname().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record(&'static str);

    impl SrvRecord for Record {
        type Target = str;

        fn target(&self) -> &str {
            self.0
        }

        fn port(&self) -> u16 {
            5222
        }

        fn priority(&self) -> u16 {
            0
        }

        fn weight(&self) -> u16 {
            0
        }
    }

    #[test]
    fn hostname_drops_root_dot() {
        assert_eq!(Record("xmpp.example.com.").hostname(), "xmpp.example.com");
        assert_eq!(Record("xmpp.example.com").hostname(), "xmpp.example.com");
    }

    #[test]
    fn root_target_is_unavailable() {
        assert!(Record(".").is_unavailable());
        assert!(!Record("xmpp.example.com.").is_unavailable());
    }
}
