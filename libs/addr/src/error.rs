//! Error types for address parsing.

use thiserror::Error;

/// Errors that can occur when parsing textual addresses.
///
/// IP parsing never produces an error; it degrades to the
/// [`InetAddress::None`](crate::InetAddress::None) sentinel instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddrError {
    /// The MAC text did not decode to exactly six bytes.
    #[error("MAC text must decode to exactly 6 bytes, got {decoded}")]
    MacLength { decoded: usize },
}
