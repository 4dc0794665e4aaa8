use crate::frame::{CanFrame, RxBuffer};
use crate::registers::Register;
use embedded_can::{ExtendedId, Frame, Id, StandardId};

fn frame(id: u16, data: &[u8]) -> CanFrame {
    CanFrame::new(StandardId::new(id).unwrap(), data).unwrap()
}

#[test]
fn test_tx_buffer_layout() {
    let buffer = frame(0x555, &[0xA1, 0xB2, 0xC3]).to_tx_buffer();

    assert_eq!(
        [0b1010_1010, 0b1010_0000, 0x00, 0x00, 0x03, 0xA1, 0xB2, 0xC3, 0, 0, 0, 0, 0],
        buffer
    );
}

#[test]
fn test_tx_buffer_max_identifier() {
    let buffer = frame(0x7FF, &[0u8; 8]).to_tx_buffer();

    assert_eq!(0xFF, buffer[0]);
    assert_eq!(0xE0, buffer[1]);
    assert_eq!(0x08, buffer[4]);
}

#[test]
fn test_tx_buffer_ignores_data_beyond_dlc() {
    let frame = CanFrame {
        identifier: StandardId::new(0x1).unwrap(),
        dlc: 2,
        data: [1, 2, 3, 4, 5, 6, 7, 8],
    };

    assert_eq!([0, 0b0010_0000, 0, 0, 2, 1, 2, 0, 0, 0, 0, 0, 0], frame.to_tx_buffer());
}

#[test]
fn test_rx_buffer_decoding() {
    let buffer = [0x24, 0x60, 0xFF, 0xFF, 0x04, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80];
    let frame = CanFrame::from_rx_buffer(&buffer);

    assert_eq!(StandardId::new(0x123).unwrap(), frame.identifier);
    assert_eq!(4, frame.dlc);
    assert_eq!([0x10, 0x20, 0x30, 0x40, 0, 0, 0, 0], frame.data);
}

#[test]
fn test_rx_buffer_ignores_lower_sidl_bits() {
    // SRR, IDE and EID17:16 bits are not part of the standard identifier
    let buffer = [0x00, 0b0011_1111, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

    assert_eq!(StandardId::new(0x1).unwrap(), CanFrame::from_rx_buffer(&buffer).identifier);
}

#[test]
fn test_rx_buffer_dlc_clamped() {
    let buffer = [0x00, 0x00, 0, 0, 0x4F, 1, 2, 3, 4, 5, 6, 7, 8];
    let frame = CanFrame::from_rx_buffer(&buffer);

    assert_eq!(8, frame.dlc);
    assert_eq!([1, 2, 3, 4, 5, 6, 7, 8], frame.data);
}

#[test]
fn test_buffer_round_trip() {
    let frames = [
        frame(0x000, &[]),
        frame(0x001, &[0xFF]),
        frame(0x2AA, &[1, 2, 3, 4, 5]),
        frame(0x7FF, &[8, 7, 6, 5, 4, 3, 2, 1]),
    ];

    for frame in frames {
        let decoded = CanFrame::from_rx_buffer(&frame.to_tx_buffer());

        assert_eq!(frame.identifier, decoded.identifier);
        assert_eq!(frame.data(), decoded.data());
    }
}

#[test]
fn test_frame_trait() {
    let frame = frame(0x42, &[1, 2]);

    assert_eq!(Id::Standard(StandardId::new(0x42).unwrap()), frame.id());
    assert_eq!(2, frame.dlc());
    assert_eq!(&[1, 2], frame.data());
    assert!(!frame.is_extended());
    assert!(!frame.is_remote_frame());
}

#[test]
fn test_frame_unsupported() {
    let extended = ExtendedId::new(0x14C92A2B).unwrap();

    assert!(CanFrame::new(extended, &[1]).is_none());
    assert!(CanFrame::new(StandardId::ZERO, &[0u8; 9]).is_none());
    assert!(CanFrame::new_remote(StandardId::ZERO, 1).is_none());
}

#[test]
fn test_rx_buffer_registers() {
    assert_eq!(Register::RXB0SIDH, RxBuffer::Rxb0.window());
    assert_eq!(Register::RXB1SIDH, RxBuffer::Rxb1.window());
    assert_eq!(0x01, RxBuffer::Rxb0.interrupt_flag());
    assert_eq!(0x02, RxBuffer::Rxb1.interrupt_flag());
}
