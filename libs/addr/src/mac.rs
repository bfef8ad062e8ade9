//! MAC-48 hardware addresses.

use std::fmt;
use std::str::FromStr;

use crate::error::AddrError;

/// A 48-bit Ethernet hardware address.
///
/// Six raw octets, freely copied. The all-zero and all-0xff values are
/// recognized sentinel states ([`MacAddress::ZERO`],
/// [`MacAddress::BROADCAST`]), not separate types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The all-zero sentinel ("no address").
    pub const ZERO: Self = Self([0; 6]);

    /// The Ethernet broadcast address, `ff:ff:ff:ff:ff:ff`.
    pub const BROADCAST: Self = Self([0xff; 6]);

    /// Creates a MAC address from six raw octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Creates a MAC address with every octet set to `byte`.
    #[must_use]
    pub const fn splat(byte: u8) -> Self {
        Self([byte; 6])
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Returns true if this is the all-zero sentinel.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }

    /// Returns true if this is the broadcast address.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xff; 6]
    }

    /// Returns true for group (multicast) addresses, broadcast included.
    #[must_use]
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Parses a MAC address from hex text.
    ///
    /// Every character that is not an ASCII hex digit is ignored, so
    /// `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` and `aabbccddeeff` all
    /// decode the same way. Digits pair up left to right; a trailing
    /// unpaired digit is dropped. Succeeds iff exactly six bytes remain.
    ///
    /// There is no partially-parsed state: callers that want the
    /// reference's fall-back-to-zero behavior write
    /// `MacAddress::from_text(s).unwrap_or(MacAddress::ZERO)`.
    pub fn from_text(text: &str) -> Result<Self, AddrError> {
        let digits: String = text.chars().filter(char::is_ascii_hexdigit).collect();
        let paired = &digits[..digits.len() & !1];
        let bytes = hex::decode(paired).map_err(|_| AddrError::MacLength { decoded: 0 })?;
        if bytes.len() != 6 {
            return Err(AddrError::MacLength {
                decoded: bytes.len(),
            });
        }
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&bytes);
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_separated_text() {
        let mac = MacAddress::from_text("aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(mac.octets(), [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    }

    #[test]
    fn separators_are_ignored() {
        let plain = MacAddress::from_text("aabbccddeeff").unwrap();
        let dashed = MacAddress::from_text("aa-bb-cc-dd-ee-ff").unwrap();
        let colons = MacAddress::from_text("aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(plain, dashed);
        assert_eq!(plain, colons);
    }

    #[test]
    fn renders_lowercase_colon_pairs() {
        let mac = MacAddress::from_text("AA:BB:CC:DD:EE:FF").unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn short_text_fails_with_zero_fallback() {
        // "aabbcc" decodes to three bytes, not six
        let err = MacAddress::from_text("aabbcc").unwrap_err();
        assert_eq!(err, AddrError::MacLength { decoded: 3 });
        assert_eq!(
            MacAddress::from_text("aabbcc").unwrap_or(MacAddress::ZERO),
            MacAddress::ZERO
        );
    }

    #[test]
    fn trailing_unpaired_digit_is_dropped() {
        let mac = MacAddress::from_text("aabbccddeeff0").unwrap();
        assert_eq!(mac.octets(), [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    }

    #[test]
    fn sentinels() {
        assert!(MacAddress::ZERO.is_zero());
        assert!(!MacAddress::ZERO.is_broadcast());
        assert!(MacAddress::BROADCAST.is_broadcast());
        assert!(MacAddress::BROADCAST.is_multicast());
        assert!(!MacAddress::new([0x02, 0, 0, 0, 0, 1]).is_multicast());
        assert_eq!(MacAddress::splat(0xff), MacAddress::BROADCAST);
    }

    #[test]
    fn from_str_round_trip() {
        let mac: MacAddress = "02:00:5e:10:00:01".parse().unwrap();
        assert_eq!(mac.to_string().parse::<MacAddress>().unwrap(), mac);
    }
}
