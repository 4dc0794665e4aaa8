//!# CAN frame and buffer layout
//! Standard (11 bit) data frames carrying up to 8 bytes.
//!
//! ```
//!# use mcp2515::frame::CanFrame;
//!# use embedded_can::{Frame, StandardId};
//!#
//! let frame = CanFrame::new(StandardId::new(0x123).unwrap(), &[0x1, 0x2, 0x3]).unwrap();
//!
//! assert_eq!(3, frame.dlc());
//! assert_eq!(&[0x1, 0x2, 0x3], frame.data());
//! ```
use crate::registers::{Register, BUFFER_WINDOW_SIZE};
use byteorder::{BigEndian, ByteOrder};
use embedded_can::{Frame, Id, StandardId};
use log::warn;

/// Max. payload of a CAN 2.0 frame
pub const MAX_PAYLOAD: usize = 8;

/// Offset of the DLC byte inside a buffer window
const DLC_OFFSET: usize = 4;

/// Offset of the first data byte inside a buffer window
const DATA_OFFSET: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CanFrame {
    pub identifier: StandardId,
    /// Number of valid payload bytes (0-8)
    pub dlc: usize,
    /// Payload, bytes beyond `dlc` are ignored
    pub data: [u8; MAX_PAYLOAD],
}

impl CanFrame {
    /// Encodes the frame into the layout of a TX buffer window.
    /// Caller has to make sure that `dlc` does not exceed [MAX_PAYLOAD].
    pub(crate) fn to_tx_buffer(&self) -> [u8; BUFFER_WINDOW_SIZE] {
        let mut buffer = [0u8; BUFFER_WINDOW_SIZE];

        // SIDH holds ID bits 10-3, SIDL bits 7-5 hold ID bits 2-0. EID8/EID0 stay zero.
        BigEndian::write_u16(&mut buffer[..2], self.identifier.as_raw() << 5);

        buffer[DLC_OFFSET] = self.dlc as u8 & 0x0F;
        buffer[DATA_OFFSET..DATA_OFFSET + self.dlc].copy_from_slice(&self.data[..self.dlc]);

        buffer
    }

    /// Decodes a frame from the layout of a RX buffer window
    pub(crate) fn from_rx_buffer(buffer: &[u8; BUFFER_WINDOW_SIZE]) -> Self {
        let raw_id = BigEndian::read_u16(&buffer[..2]) >> 5;

        let mut dlc = (buffer[DLC_OFFSET] & 0x0F) as usize;
        if dlc > MAX_PAYLOAD {
            warn!("Received DLC {dlc} exceeds max. payload, clamping to {MAX_PAYLOAD}");
            dlc = MAX_PAYLOAD;
        }

        let mut data = [0u8; MAX_PAYLOAD];
        data[..dlc].copy_from_slice(&buffer[DATA_OFFSET..DATA_OFFSET + dlc]);

        Self {
            // Value is shifted down from 16 bits, so it never exceeds 11 bits
            identifier: StandardId::new(raw_id).unwrap_or(StandardId::MAX),
            dlc,
            data,
        }
    }
}

impl Frame for CanFrame {
    /// Returns None for extended IDs or payloads longer than 8 bytes
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let identifier = match id.into() {
            Id::Standard(id) => id,
            Id::Extended(_) => return None,
        };

        if data.len() > MAX_PAYLOAD {
            return None;
        }

        let mut frame = CanFrame {
            identifier,
            dlc: data.len(),
            data: [0; MAX_PAYLOAD],
        };
        frame.data[..data.len()].copy_from_slice(data);
        Some(frame)
    }

    /// Remote frames are not supported
    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        false
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        Id::Standard(self.identifier)
    }

    fn dlc(&self) -> usize {
        self.dlc
    }

    fn data(&self) -> &[u8] {
        &self.data[..self.dlc.min(MAX_PAYLOAD)]
    }
}

/// Receive buffers, listed in service priority
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RxBuffer {
    Rxb0,
    Rxb1,
}

impl RxBuffer {
    /// First register of the buffer window
    pub const fn window(self) -> Register {
        match self {
            RxBuffer::Rxb0 => Register::RXB0SIDH,
            RxBuffer::Rxb1 => Register::RXB1SIDH,
        }
    }

    /// CANINTF bit signaling a full buffer
    pub const fn interrupt_flag(self) -> u8 {
        match self {
            RxBuffer::Rxb0 => 1 << 0,
            RxBuffer::Rxb1 => 1 << 1,
        }
    }
}
