//! IPv4/IPv6 socket addresses as an explicitly tagged value type.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Address family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrFamily {
    None,
    V4,
    V6,
}

/// An IP address plus port, tagged by family.
///
/// [`InetAddress::None`] is the "not an address" sentinel that parsing
/// degrades to; callers test [`InetAddress::is_some`] before use. The
/// port is host-order in this API.
///
/// Equality is byte-wise over the address payload and port and is only
/// defined between two members of the same family; any comparison that
/// involves the sentinel is false. Because `None != None`, this type
/// deliberately implements `PartialEq` but not `Eq`.
#[derive(Debug, Clone, Copy, Default)]
pub enum InetAddress {
    /// Parse-failure sentinel; carries no payload.
    #[default]
    None,
    /// IPv4 address and port.
    V4 { octets: [u8; 4], port: u16 },
    /// IPv6 address and port.
    V6 { octets: [u8; 16], port: u16 },
}

impl InetAddress {
    /// Parses `ip` with an explicit port.
    ///
    /// The family is detected by the presence of `:` in the text. On
    /// parse failure the result is the [`InetAddress::None`] sentinel,
    /// never an error.
    #[must_use]
    pub fn parse(ip: &str, port: u16) -> Self {
        if ip.contains(':') {
            match ip.parse::<Ipv6Addr>() {
                Ok(addr) => Self::V6 {
                    octets: addr.octets(),
                    port,
                },
                Err(_) => Self::None,
            }
        } else {
            match ip.parse::<Ipv4Addr>() {
                Ok(addr) => Self::V4 {
                    octets: addr.octets(),
                    port,
                },
                Err(_) => Self::None,
            }
        }
    }

    /// Parses `"<ip>/<port>"` text.
    ///
    /// Splits on the last `/`. A missing separator or malformed numeric
    /// suffix means port 0, as does a suffix outside `[1, 65535]`.
    #[must_use]
    pub fn parse_with_port(text: &str) -> Self {
        match text.rsplit_once('/') {
            None => Self::parse(text, 0),
            Some((ip, suffix)) => match suffix.parse::<u32>() {
                Ok(port) if (1..=65535).contains(&port) => Self::parse(ip, port as u16),
                _ => Self::parse(ip, 0),
            },
        }
    }

    /// Returns the family tag.
    #[must_use]
    pub fn family(&self) -> AddrFamily {
        match self {
            Self::None => AddrFamily::None,
            Self::V4 { .. } => AddrFamily::V4,
            Self::V6 { .. } => AddrFamily::V6,
        }
    }

    /// True iff this is a real V4 or V6 address.
    #[must_use]
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// True iff this is the sentinel.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the port; 0 for the sentinel.
    #[must_use]
    pub fn port(&self) -> u16 {
        match self {
            Self::None => 0,
            Self::V4 { port, .. } | Self::V6 { port, .. } => *port,
        }
    }

    /// Address payload bytes: 4 for V4, 16 for V6, empty for the sentinel.
    #[must_use]
    pub fn octets(&self) -> &[u8] {
        match self {
            Self::None => &[],
            Self::V4 { octets, .. } => octets,
            Self::V6 { octets, .. } => octets,
        }
    }

    /// True if both carry the same family and address bytes, port ignored.
    #[must_use]
    pub fn same_ip(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::V4 { octets: a, .. }, Self::V4 { octets: b, .. }) => a == b,
            (Self::V6 { octets: a, .. }, Self::V6 { octets: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Renders `"<ip>/<port>"`; empty for the sentinel.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::V4 { octets, port } => format!("{}/{}", Ipv4Addr::from(*octets), port),
            Self::V6 { octets, port } => format!("{}/{}", Ipv6Addr::from(*octets), port),
        }
    }

    /// Renders the address only, no port; empty for the sentinel.
    #[must_use]
    pub fn to_ip_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::V4 { octets, .. } => Ipv4Addr::from(*octets).to_string(),
            Self::V6 { octets, .. } => Ipv6Addr::from(*octets).to_string(),
        }
    }
}

impl PartialEq for InetAddress {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::V4 {
                    octets: a,
                    port: ap,
                },
                Self::V4 {
                    octets: b,
                    port: bp,
                },
            ) => a == b && ap == bp,
            (
                Self::V6 {
                    octets: a,
                    port: ap,
                },
                Self::V6 {
                    octets: b,
                    port: bp,
                },
            ) => a == b && ap == bp,
            _ => false,
        }
    }
}

impl fmt::Display for InetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
