#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]
#![allow(clippy::identity_op)]

//! # Library for MCP2515 CAN controller
//!
//! Crate currently offer the following features:
//! * CAN2.0A frames (standard 11 bit identifiers, up to 8 data bytes)
//! * Bit timing configuration and verified operation mode transitions
//! * Polling reception from both receive buffers
//! * Explicit device handles, so one driver may serve multiple controllers
//! * no_std support
//!
//!## CAN Tx/Rx example
//!
//!```
//!use mcp2515::example::{ExampleClock, ExampleCSPin, ExampleSPIBus};
//!use mcp2515::can::{CanError, MCP2515};
//!use mcp2515::config::Configuration;
//!use mcp2515::frame::CanFrame;
//!use mcp2515::status::OperationMode;
//!use mcp2515::transport::{DeviceHandle, SpiTransport};
//!use embedded_can::{Frame, StandardId};
//!
//!let clock = ExampleClock::default();
//!let mut device = DeviceHandle::new(0, ExampleCSPin {});
//!let mut controller = MCP2515::new(SpiTransport::new(ExampleSPIBus::default()));
//!
//! // configure CAN controller in loopback mode
//!controller
//!    .configure(
//!        &mut device,
//!        &Configuration {
//!            mode: OperationMode::Loopback,
//!            ..Default::default()
//!        },
//!        &clock,
//!    )
//!    .unwrap();
//!
//! // Create and transmit frame
//!let frame = CanFrame::new(StandardId::new(0x55).unwrap(), &[1, 2, 3, 4]).unwrap();
//!controller.send(&mut device, &frame).unwrap();
//!
//! // Receive frame
//!let received = controller.receive(&mut device).unwrap();
//!assert_eq!(frame, received);
//!
//! // Nothing pending anymore
//!assert_eq!(Err(CanError::WouldBlock), controller.receive(&mut device));
//!```

extern crate alloc;

pub mod can;
pub mod config;
pub mod frame;
pub mod protocol;
pub mod registers;
pub mod status;
pub mod transport;

pub mod example;
#[cfg(test)]
pub(crate) mod mocks;
#[cfg(test)]
mod tests;
