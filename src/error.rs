//! The error surface of the store.

use std::net::AddrParseError;

use ipnet::IpNet;
use thiserror::Error;

/// Errors returned by the fallible store operations.
///
/// Every failed operation leaves the store unmodified. Violations of the
/// internal trie invariants are programmer errors and panic instead of being
/// reported through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// The prefix length is zero. `/0` prefixes cannot be keyed by a bit
    /// path and are rejected on insertion.
    #[error("invalid prefix {0}: /0 networks are not supported")]
    InvalidPrefix(IpNet),

    /// The IP address handed to a lookup could not be parsed.
    #[error("malformed IP address")]
    ParseError(#[from] AddrParseError),

    /// The entry's IP-version flag disagrees with the address family of the
    /// CIDR it was inserted with.
    #[error("entry version flag does not match the address family of {cidr}")]
    MismatchedVersion {
        /// The CIDR passed to the insertion.
        cidr: IpNet,
        /// The version flag carried by the entry.
        entry_is_v6: bool,
    },
}
