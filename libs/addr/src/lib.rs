//! # vnet-addr
//!
//! Address value types for the vnet TAP library.
//!
//! ## Design Principles
//!
//! - Addresses are plain value types: fixed-width octets, freely copied,
//!   no ownership semantics and no OS interaction
//! - Parsing never aborts the caller: malformed IP text degrades to the
//!   [`InetAddress::None`] sentinel, malformed MAC text is a checkable
//!   [`AddrError`]
//! - The address family is an explicit tag, never inferred from memory
//!   layout
//!
//! ## Text Formats
//!
//! - IP: dotted-quad (v4) or colon-hex (v6), optionally suffixed
//!   `/<port>` with port in `[1, 65535]` (anything else means "no port")
//! - MAC: any sequence of hex pairs; separator characters are ignored, so
//!   `aa:bb:cc:dd:ee:ff` and `aabbccddeeff` decode identically

mod error;
mod inet;
mod mac;

pub use error::AddrError;
pub use inet::{AddrFamily, InetAddress};
pub use mac::MacAddress;
