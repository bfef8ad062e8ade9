//! Ethernet frame encoding and decoding.
//!
//! Wire format: bytes `[0..6)` destination MAC, `[6..12)` source MAC,
//! `[12..14)` big-endian ethertype, `[14..)` payload.

use vnet_addr::MacAddress;

/// Length of the Ethernet header this codec produces and consumes.
pub const ETHER_HDR_LEN: usize = 14;

/// Well-known ethertype values.
pub mod ethertype {
    /// IPv4.
    pub const IPV4: u16 = 0x0800;
    /// ARP.
    pub const ARP: u16 = 0x0806;
    /// IPv6.
    pub const IPV6: u16 = 0x86dd;
}

/// A decoded view over one Ethernet frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetFrame<'a> {
    /// Destination hardware address.
    pub to: MacAddress,
    /// Source hardware address.
    pub from: MacAddress,
    /// Payload protocol identifier.
    pub ethertype: u16,
    /// Frame payload, header stripped.
    pub payload: &'a [u8],
}

/// Encodes one frame into `buf`, returning the total frame length.
///
/// `buf` must hold `payload.len() + ETHER_HDR_LEN` bytes; the device
/// guarantees this by sizing its staging buffers at MTU + 14 and checking
/// the payload against the MTU first.
pub fn encode(
    buf: &mut [u8],
    from: MacAddress,
    to: MacAddress,
    ethertype: u16,
    payload: &[u8],
) -> usize {
    buf[0..6].copy_from_slice(&to.octets());
    buf[6..12].copy_from_slice(&from.octets());
    buf[12..14].copy_from_slice(&ethertype.to_be_bytes());
    buf[ETHER_HDR_LEN..ETHER_HDR_LEN + payload.len()].copy_from_slice(payload);
    ETHER_HDR_LEN + payload.len()
}

/// Decodes `buf` as one frame.
///
/// Returns `None` when there is no payload to carry (14 bytes or fewer):
/// a valid empty result, not an error.
#[must_use]
pub fn decode(buf: &[u8]) -> Option<EthernetFrame<'_>> {
    if buf.len() <= ETHER_HDR_LEN {
        return None;
    }
    let mut to = [0u8; 6];
    to.copy_from_slice(&buf[0..6]);
    let mut from = [0u8; 6];
    from.copy_from_slice(&buf[6..12]);
    Some(EthernetFrame {
        to: MacAddress::new(to),
        from: MacAddress::new(from),
        ethertype: u16::from_be_bytes([buf[12], buf[13]]),
        payload: &buf[ETHER_HDR_LEN..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SRC: MacAddress = MacAddress::new([0x02, 0, 0, 0, 0, 0x01]);
    const DST: MacAddress = MacAddress::new([0x02, 0, 0, 0, 0, 0x02]);

    #[test]
    fn encode_decode_round_trip() {
        let payload = [0xde, 0xad, 0xbe, 0xef];
        let mut buf = [0u8; 64];
        let len = encode(&mut buf, SRC, DST, ethertype::IPV4, &payload);
        assert_eq!(len, ETHER_HDR_LEN + payload.len());

        let frame = decode(&buf[..len]).unwrap();
        assert_eq!(frame.from, SRC);
        assert_eq!(frame.to, DST);
        assert_eq!(frame.ethertype, ethertype::IPV4);
        assert_eq!(frame.payload, &payload);
    }

    #[test]
    fn header_layout_is_dst_src_type() {
        let mut buf = [0u8; 20];
        encode(&mut buf, SRC, DST, ethertype::ARP, &[0xaa]);
        assert_eq!(&buf[0..6], &DST.octets());
        assert_eq!(&buf[6..12], &SRC.octets());
    }

    #[rstest]
    #[case(ethertype::IPV4, [0x08, 0x00])]
    #[case(ethertype::ARP, [0x08, 0x06])]
    #[case(ethertype::IPV6, [0x86, 0xdd])]
    fn ethertype_is_big_endian(#[case] ty: u16, #[case] wire: [u8; 2]) {
        let mut buf = [0u8; 20];
        encode(&mut buf, SRC, DST, ty, &[0]);
        assert_eq!(&buf[12..14], &wire);
    }

    #[test]
    fn header_only_reads_decode_to_none() {
        let mut buf = [0u8; 32];
        let len = encode(&mut buf, SRC, DST, ethertype::IPV4, &[]);
        assert_eq!(len, ETHER_HDR_LEN);
        assert!(decode(&buf[..len]).is_none());
        assert!(decode(&buf[..3]).is_none());
        assert!(decode(&[]).is_none());
    }
}
