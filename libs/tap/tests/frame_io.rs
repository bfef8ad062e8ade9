//! Frame transmit/receive through the device staging buffers.


use harness::{device_with, RecordingRunner, ScriptedBackend, PEER_MAC, TEST_MAC};
use vnet_tap::frame::ethertype;
use vnet_tap::{TapError, ETHER_HDR_LEN};

#[test]
fn put_then_get_round_trips_a_frame() {
    let backend = ScriptedBackend::new();
    let writes = backend.writes.clone();
    let reads = backend.reads.clone();

    let mut device = device_with(backend, RecordingRunner::new());

    let payload: Vec<u8> = (0..100u8).collect();
    device
        .put(TEST_MAC, PEER_MAC, ethertype::IPV4, &payload)
        .unwrap();

    // feed the written frame back as the next read, as a peer would see it
    let wire = writes.borrow()[0].clone();
    assert_eq!(wire.len(), ETHER_HDR_LEN + payload.len());
    reads.borrow_mut().push_back(wire);

    let frame = device.get().unwrap().expect("frame with payload");
    assert_eq!(frame.from, TEST_MAC);
    assert_eq!(frame.to, PEER_MAC);
    assert_eq!(frame.ethertype, ethertype::IPV4);
    assert_eq!(frame.payload, payload.as_slice());
}

#[test]
fn oversized_payload_is_rejected_without_writing() {
    let backend = ScriptedBackend::new();
    let writes = backend.writes.clone();

    let mut device = device_with(backend, RecordingRunner::new());
    let payload = vec![0u8; device.mtu() + 1];
    let err = device
        .put(TEST_MAC, PEER_MAC, ethertype::IPV4, &payload)
        .unwrap_err();

    assert!(matches!(err, TapError::FrameTooLarge { len: 1501, mtu: 1500 }));
    assert!(writes.borrow().is_empty());
}

#[test]
fn payload_at_exactly_mtu_is_accepted() {
    let backend = ScriptedBackend::new();
    let writes = backend.writes.clone();

    let mut device = device_with(backend, RecordingRunner::new());
    let payload = vec![0xab; device.mtu()];
    device
        .put(TEST_MAC, PEER_MAC, ethertype::IPV6, &payload)
        .unwrap();
    assert_eq!(writes.borrow()[0].len(), ETHER_HDR_LEN + 1500);
}

#[test]
fn header_only_read_is_no_frame() {
    let backend = ScriptedBackend::new();
    let reads = backend.reads.clone();

    let mut device = device_with(backend, RecordingRunner::new());
    reads.borrow_mut().push_back(vec![0u8; ETHER_HDR_LEN]);

    assert!(device.get().unwrap().is_none());
}

#[test]
fn empty_read_is_no_frame() {
    let backend = ScriptedBackend::new();
    let mut device = device_with(backend, RecordingRunner::new());
    assert!(device.get().unwrap().is_none());
}

#[test]
fn io_on_closed_device_is_rejected() {
    let backend = ScriptedBackend::new();
    let writes = backend.writes.clone();

    let mut device = device_with(backend, RecordingRunner::new());
    device.close();

    let err = device
        .put(TEST_MAC, PEER_MAC, ethertype::IPV4, &[1, 2, 3])
        .unwrap_err();
    assert!(matches!(err, TapError::DeviceClosed));
    assert!(writes.borrow().is_empty());

    assert!(matches!(device.get().unwrap_err(), TapError::DeviceClosed));
}
