//!# SPI transport
//! Byte exchange primitive used by the register protocol. Each call is exactly one
//! transaction: chip select asserted, bytes shifted, chip select released.
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;
use embedded_hal::blocking::spi::{Transfer, Write};
use embedded_hal::digital::v2::OutputPin;

/// Synchronous byte transport addressing a device by handle
pub trait Transport {
    /// Handle of the addressed device
    type Device;

    type Error: Debug;

    /// Shifts out the given bytes, bytes clocked back are discarded
    fn transmit(&mut self, device: &mut Self::Device, tx: &[u8]) -> Result<(), Self::Error>;

    /// Shifts out `tx` followed by `rx_len` dummy bytes without releasing the device
    /// and returns the bytes clocked back during the dummy phase
    fn query(&mut self, device: &mut Self::Device, tx: &[u8], rx_len: usize) -> Result<Vec<u8>, Self::Error>;
}

/// Physical device on a shared SPI bus
#[derive(Debug)]
pub struct DeviceHandle<CS: OutputPin> {
    /// Application defined identity
    pub id: u8,

    /// Chip select pin (active low)
    cs: CS,
}

impl<CS: OutputPin> DeviceHandle<CS> {
    pub fn new(id: u8, cs: CS) -> Self {
        Self { id, cs }
    }

    /// Releases the chip select pin
    pub fn release(self) -> CS {
        self.cs
    }
}

/// Possible SPI transport errors
#[derive(Debug, PartialEq)]
pub enum BusError<B, CS> {
    /// SPI transfer failed
    TransferError(B),
    /// Setting the chip select pin failed
    CSError(CS),
}

/// [Transport] on top of an embedded-hal SPI bus
pub struct SpiTransport<B, CS> {
    bus: B,
    pin: PhantomData<CS>,
}

impl<B, CS> SpiTransport<B, CS> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            pin: Default::default(),
        }
    }

    /// Releases the SPI bus
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B, CS, E> SpiTransport<B, CS>
where
    B: Transfer<u8, Error = E> + Write<u8, Error = E>,
    CS: OutputPin,
{
    /// Runs the given bus operation with the device selected. The device is released in any case.
    fn selected<F, R>(&mut self, device: &mut DeviceHandle<CS>, operation: F) -> Result<R, BusError<E, CS::Error>>
    where
        F: FnOnce(&mut B) -> Result<R, E>,
    {
        device.cs.set_low().map_err(BusError::CSError)?;

        let result = operation(&mut self.bus).map_err(BusError::TransferError);

        device.cs.set_high().map_err(BusError::CSError)?;
        result
    }
}

impl<B, CS, E> Transport for SpiTransport<B, CS>
where
    B: Transfer<u8, Error = E> + Write<u8, Error = E>,
    CS: OutputPin,
    E: Debug,
    CS::Error: Debug,
{
    type Device = DeviceHandle<CS>;
    type Error = BusError<E, CS::Error>;

    fn transmit(&mut self, device: &mut Self::Device, tx: &[u8]) -> Result<(), Self::Error> {
        self.selected(device, |bus| bus.write(tx))
    }

    fn query(&mut self, device: &mut Self::Device, tx: &[u8], rx_len: usize) -> Result<Vec<u8>, Self::Error> {
        self.selected(device, |bus| {
            bus.write(tx)?;

            let mut buffer = vec![0u8; rx_len];
            let received = bus.transfer(&mut buffer)?;

            Ok(received.to_vec())
        })
    }
}
