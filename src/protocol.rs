//!# Register protocol
//! Translates register level operations into SPI instructions. One operation
//! maps to exactly one transport transaction.
use crate::can::{ArgumentError, CanError};
use crate::registers::{Instruction, Register, BUFFER_WINDOW_SIZE};
use crate::transport::Transport;

/// Instruction byte + address byte
const HEADER_SIZE: usize = 2;

/// Largest transaction issued by the driver: header followed by a complete buffer window
pub const SCRATCH_SIZE: usize = HEADER_SIZE + BUFFER_WINDOW_SIZE;

/// Max. number of data bytes per burst read/write
pub const MAX_BURST: usize = SCRATCH_SIZE - HEADER_SIZE;

const _: () = assert!(MAX_BURST >= BUFFER_WINDOW_SIZE);

/// Register level access to the controller
pub struct RegisterInterface<T: Transport> {
    transport: T,

    /// Command and response buffer shared by all operations
    scratch: [u8; SCRATCH_SIZE],
}

impl<T: Transport> RegisterInterface<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            scratch: [0u8; SCRATCH_SIZE],
        }
    }

    /// Releases the underlying transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Reads a single register
    pub fn read(&mut self, device: &mut T::Device, register: Register) -> Result<u8, CanError<T::Error>> {
        Ok(self.read_burst(device, register, 1)?[0])
    }

    /// Reads `count` consecutive registers, the controller increments the address after each byte
    pub fn read_burst(
        &mut self,
        device: &mut T::Device,
        register: Register,
        count: usize,
    ) -> Result<&[u8], CanError<T::Error>> {
        Self::verify_burst_length(count)?;

        let header = [Instruction::Read.opcode(), register.address()];
        let response = self.transport.query(device, &header, count).map_err(CanError::TransportError)?;

        if response.len() < count {
            return Err(CanError::ShortResponse {
                expected: count,
                received: response.len(),
            });
        }

        self.scratch[..count].copy_from_slice(&response[..count]);
        Ok(&self.scratch[..count])
    }

    /// Writes a single register
    pub fn write(&mut self, device: &mut T::Device, register: Register, value: u8) -> Result<(), CanError<T::Error>> {
        self.write_burst(device, register, &[value])
    }

    /// Writes consecutive registers in one transaction
    pub fn write_burst(
        &mut self,
        device: &mut T::Device,
        register: Register,
        data: &[u8],
    ) -> Result<(), CanError<T::Error>> {
        Self::verify_burst_length(data.len())?;

        let length = HEADER_SIZE + data.len();
        self.scratch[0] = Instruction::Write.opcode();
        self.scratch[1] = register.address();
        self.scratch[HEADER_SIZE..length].copy_from_slice(data);

        self.send_scratch(device, length)
    }

    /// Sets the masked bits of the register to the corresponding bits of `data`
    pub fn bit_modify(
        &mut self,
        device: &mut T::Device,
        register: Register,
        mask: u8,
        data: u8,
    ) -> Result<(), CanError<T::Error>> {
        self.scratch[..4].copy_from_slice(&[Instruction::BitModify.opcode(), register.address(), mask, data]);

        self.send_scratch(device, 4)
    }

    /// Requests transmission of the flagged TX buffers, others stay untouched
    pub fn request_to_send(
        &mut self,
        device: &mut T::Device,
        txb0: bool,
        txb1: bool,
        txb2: bool,
    ) -> Result<(), CanError<T::Error>> {
        self.scratch[0] = Instruction::RequestToSend { txb0, txb1, txb2 }.opcode();

        self.send_scratch(device, 1)
    }

    /// Reads the quick status. Controller repeats the status byte, so both bytes are equal.
    pub fn read_status(&mut self, device: &mut T::Device) -> Result<[u8; 2], CanError<T::Error>> {
        let response = self
            .transport
            .query(device, &[Instruction::ReadStatus.opcode()], 2)
            .map_err(CanError::TransportError)?;

        match response[..] {
            [first, second, ..] => Ok([first, second]),
            _ => Err(CanError::ShortResponse {
                expected: 2,
                received: response.len(),
            }),
        }
    }

    /// Resets the controller, which re-enters configuration mode afterward.
    /// Caller has to wait for the oscillator to settle before issuing further commands.
    pub fn reset(&mut self, device: &mut T::Device) -> Result<(), CanError<T::Error>> {
        self.scratch[0] = Instruction::Reset.opcode();

        self.send_scratch(device, 1)
    }

    fn send_scratch(&mut self, device: &mut T::Device, length: usize) -> Result<(), CanError<T::Error>> {
        self.transport
            .transmit(device, &self.scratch[..length])
            .map_err(CanError::TransportError)
    }

    fn verify_burst_length(length: usize) -> Result<(), CanError<T::Error>> {
        if length == 0 || length > MAX_BURST {
            return Err(ArgumentError::InvalidBurstLength(length).into());
        }

        Ok(())
    }
}
