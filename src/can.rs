//!# CAN Controller device
//!
//!```
//!# use mcp2515::can::MCP2515;
//!# use mcp2515::config::Configuration;
//!# use mcp2515::example::*;
//!# use mcp2515::transport::{DeviceHandle, SpiTransport};
//!#
//! let clock = ExampleClock::default();
//! let mut device = DeviceHandle::new(0, ExampleCSPin {});
//!
//! // Initialize controller object
//! let mut can_controller = MCP2515::new(SpiTransport::new(ExampleSPIBus::default()));
//!
//! // Use default configuration settings
//! let can_config = Configuration::default();
//!
//! // Configure CAN controller
//! can_controller.configure(&mut device, &can_config, &clock).unwrap();
//! ```

use crate::config::{BitTiming, Configuration};
use crate::frame::{CanFrame, RxBuffer, MAX_PAYLOAD};
use crate::protocol::RegisterInterface;
use crate::registers::{CanIntf, Register, BUFFER_WINDOW_SIZE, MODE_MASK, MODE_OFFSET};
use crate::status::{mode_bits, ControllerStatus, OperationMode};
use crate::transport::Transport;
use embedded_time::duration::Milliseconds;
use embedded_time::Clock;
use log::debug;

/// Time the oscillator needs to settle after reset
const RESET_SETTLE_TIME_MS: u32 = 10;

/// Malformed caller input
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    /// Frame DLC exceeds 8 bytes
    InvalidDataLength(usize),
    /// Burst length is zero or exceeds a buffer window
    InvalidBurstLength(usize),
    /// Address is not part of the register map
    UnknownRegister(u8),
    /// Mode code is not part of the supported modes
    UnknownMode(u8),
    /// Timing segment outside of its allowed range
    TimingOutOfRange { field: &'static str, value: u8 },
    /// Sum of timing segments exceeds the hardware limit
    TooManyTimeQuanta(u8),
}

/// Possible CAN errors during Configuration/Transmission/Reception
#[derive(Debug, PartialEq)]
pub enum CanError<E> {
    /// Invalid caller input, no transaction was issued
    InvalidArgument(ArgumentError),
    /// Transport failure
    TransportError(E),
    /// Transport returned fewer bytes than requested
    ShortResponse { expected: usize, received: usize },
    /// Device did not report the requested mode. `reported` holds the raw OPMOD bits.
    ModeTransitionFailed { requested: OperationMode, reported: u8 },
    /// No frame pending, poll again later
    WouldBlock,
    /// Internal clock error
    ClockError,
}

impl<E> From<ArgumentError> for CanError<E> {
    fn from(value: ArgumentError) -> Self {
        CanError::InvalidArgument(value)
    }
}

impl<E> From<embedded_time::clock::Error> for CanError<E> {
    fn from(_error: embedded_time::clock::Error) -> Self {
        CanError::ClockError
    }
}

/// Main MCP2515 CAN controller device.
///
/// Driver keeps no device state. Each call addresses the device by the given handle,
/// so one driver instance may serve multiple controllers on the same bus.
pub struct MCP2515<T: Transport> {
    registers: RegisterInterface<T>,
}

impl<T: Transport> MCP2515<T> {
    pub fn new(transport: T) -> Self {
        Self {
            registers: RegisterInterface::new(transport),
        }
    }

    /// Register level access
    pub fn registers(&mut self) -> &mut RegisterInterface<T> {
        &mut self.registers
    }

    /// Releases the underlying transport
    pub fn release(self) -> T {
        self.registers.release()
    }

    /// Resets the device, writes the bit timing and enters the configured mode
    pub fn configure<CLK: Clock>(
        &mut self,
        device: &mut T::Device,
        config: &Configuration,
        clock: &CLK,
    ) -> Result<(), CanError<T::Error>> {
        config.timing.validate()?;

        self.registers.reset(device)?;
        Self::wait(clock, Milliseconds::new(RESET_SETTLE_TIME_MS))?;

        self.request_mode(device, OperationMode::Configuration)?;
        self.configure_timing(device, &config.timing)?;
        self.request_mode(device, config.mode)
    }

    /// Writes the bit timing registers.
    ///
    /// Device must be in configuration mode. On error the timing may be partially applied,
    /// so the whole sequence has to be repeated.
    pub fn configure_timing(&mut self, device: &mut T::Device, timing: &BitTiming) -> Result<(), CanError<T::Error>> {
        timing.validate()?;

        let [cnf1, cnf2, cnf3] = timing.as_registers();
        debug!("Writing bit timing: CNF1={cnf1:#04X} CNF2={cnf2:#04X} CNF3={cnf3:#04X}");

        self.registers.write(device, Register::CNF1, cnf1)?;
        self.registers.write(device, Register::CNF2, cnf2)?;
        self.registers.write(device, Register::CNF3, cnf3)?;

        Ok(())
    }

    /// Reads back the current bit timing
    pub fn read_timing(&mut self, device: &mut T::Device) -> Result<BitTiming, CanError<T::Error>> {
        let cnf1 = self.registers.read(device, Register::CNF1)?;
        let cnf2 = self.registers.read(device, Register::CNF2)?;
        let cnf3 = self.registers.read(device, Register::CNF3)?;

        Ok(BitTiming::from_registers(cnf1, cnf2, cnf3))
    }

    /// Logs the current bit timing registers
    pub fn log_configuration(&mut self, device: &mut T::Device) -> Result<(), CanError<T::Error>> {
        let timing = self.read_timing(device)?;
        let [cnf1, cnf2, cnf3] = timing.as_registers();

        debug!("CNF1: {cnf1:#04X}, CNF2: {cnf2:#04X}, CNF3: {cnf3:#04X} => {timing:?}");
        Ok(())
    }

    /// Requests the given mode and verifies the transition by reading back CANSTAT.
    /// No mode is cached, so requesting the current mode still verifies.
    pub fn request_mode(&mut self, device: &mut T::Device, mode: OperationMode) -> Result<(), CanError<T::Error>> {
        self.registers
            .bit_modify(device, Register::CANCTRL, MODE_MASK, mode.register_bits())?;

        let status = self.registers.read(device, Register::CANSTAT)?;

        if mode_bits(status) != mode.register_bits() {
            debug!("Device did not enter requested mode {mode:?}. CANSTAT: {status:#04X}");
            return Err(CanError::ModeTransitionFailed {
                requested: mode,
                reported: mode_bits(status) >> MODE_OFFSET,
            });
        }

        Ok(())
    }

    /// Reads the current operation mode. Returns None for mode codes outside of the supported modes.
    pub fn read_operation_mode(&mut self, device: &mut T::Device) -> Result<Option<OperationMode>, CanError<T::Error>> {
        let status = self.registers.read(device, Register::CANSTAT)?;

        Ok(OperationMode::from_register(status))
    }

    /// Reads and decodes the quick status
    pub fn read_status_flags(&mut self, device: &mut T::Device) -> Result<ControllerStatus, CanError<T::Error>> {
        let [status, _] = self.registers.read_status(device)?;

        Ok(ControllerStatus::from_register(status))
    }

    /// Loads the frame into TXB0 and requests its transmission
    pub fn send(&mut self, device: &mut T::Device, frame: &CanFrame) -> Result<(), CanError<T::Error>> {
        if frame.dlc > MAX_PAYLOAD {
            return Err(ArgumentError::InvalidDataLength(frame.dlc).into());
        }

        let buffer = frame.to_tx_buffer();

        self.registers.write_burst(device, Register::TXB0SIDH, &buffer)?;
        self.registers.request_to_send(device, true, false, false)
    }

    /// Reads a pending frame. RXB0 takes priority over RXB1.
    /// Returns [CanError::WouldBlock] if no frame is pending.
    pub fn receive(&mut self, device: &mut T::Device) -> Result<CanFrame, CanError<T::Error>> {
        let flags = CanIntf::from(self.registers.read(device, Register::CANINTF)?);

        let rx_buffer = if flags.rx0if() {
            RxBuffer::Rxb0
        } else if flags.rx1if() {
            RxBuffer::Rxb1
        } else {
            return Err(CanError::WouldBlock);
        };
        debug!("Reading frame from {rx_buffer:?}");

        let mut window = [0u8; BUFFER_WINDOW_SIZE];
        window.copy_from_slice(self.registers.read_burst(device, rx_buffer.window(), BUFFER_WINDOW_SIZE)?);

        let frame = CanFrame::from_rx_buffer(&window);

        // Only the serviced buffer is released, a pending frame in the other buffer stays flagged
        self.registers
            .bit_modify(device, Register::CANINTF, rx_buffer.interrupt_flag(), 0x00)?;

        Ok(frame)
    }

    /// Busy waits for the given duration
    fn wait<CLK: Clock>(clock: &CLK, duration: Milliseconds) -> Result<(), CanError<T::Error>> {
        let target = clock.try_now()?.checked_add(duration).ok_or(CanError::ClockError)?;

        while clock.try_now()? < target {}

        Ok(())
    }
}
