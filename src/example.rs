//! # Dummy structures for doc examples
//!
//! [ExampleSPIBus] simulates the register file of a controller, so that doc examples can
//! configure the device and loop frames back in [crate::status::OperationMode::Loopback].
use crate::registers::{Instruction, Register, BUFFER_WINDOW_SIZE, MODE_MASK};
use core::cell::Cell;
use core::convert::Infallible;
use embedded_hal::blocking::spi::{Transfer, Write};
use embedded_hal::digital::v2::OutputPin;
use embedded_time::clock::Error;
use embedded_time::duration::{Duration, Fraction};
use embedded_time::fixed_point::FixedPoint;
use embedded_time::timer::param::{Armed, OneShot};
use embedded_time::{Clock, Instant, Timer};

const REGISTER_COUNT: usize = 0x80;

/// State of a pending read phase
#[derive(Copy, Clone, Debug)]
enum Pending {
    None,
    Read(usize),
    Status,
}

#[derive(Debug)]
pub struct ExampleSPIBus {
    registers: [u8; REGISTER_COUNT],
    pending: Pending,
}

impl Default for ExampleSPIBus {
    fn default() -> Self {
        let mut bus = Self {
            registers: [0u8; REGISTER_COUNT],
            pending: Pending::None,
        };
        bus.reset();
        bus
    }
}

impl ExampleSPIBus {
    /// Configuration mode after reset
    fn reset(&mut self) {
        self.registers = [0u8; REGISTER_COUNT];
        self.registers[Register::CANCTRL as usize] = 0x87;
        self.registers[Register::CANSTAT as usize] = 0x80;
        self.pending = Pending::None;
    }

    fn store(&mut self, address: usize, value: u8) {
        self.registers[address % REGISTER_COUNT] = value;

        // Mode requests are adopted immediately
        if address == Register::CANCTRL as usize {
            let status = self.registers[Register::CANSTAT as usize];
            self.registers[Register::CANSTAT as usize] = (status & !MODE_MASK) | (value & MODE_MASK);
        }
    }

    fn loopback_active(&self) -> bool {
        self.registers[Register::CANSTAT as usize] & MODE_MASK == 0x40
    }

    /// Moves the content of TXB0 to the first free RX buffer
    fn transmit_txb0(&mut self) {
        let flags = self.registers[Register::CANINTF as usize];
        let (target, flag) = if flags & 0x01 == 0 {
            (Register::RXB0SIDH as usize, 0x01)
        } else if flags & 0x02 == 0 {
            (Register::RXB1SIDH as usize, 0x02)
        } else {
            return;
        };

        let source = Register::TXB0SIDH as usize;
        self.registers
            .copy_within(source..source + BUFFER_WINDOW_SIZE, target);
        self.registers[Register::CANINTF as usize] |= flag;
    }

    fn status(&self) -> u8 {
        self.registers[Register::CANINTF as usize] & 0x03
    }
}

impl Write<u8> for ExampleSPIBus {
    type Error = Infallible;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.pending = Pending::None;

        let opcode = match words.first() {
            Some(opcode) => *opcode,
            None => return Ok(()),
        };
        let address = words.get(1).copied().unwrap_or_default() as usize;

        match opcode {
            op if op == Instruction::Read.opcode() => self.pending = Pending::Read(address),
            op if op == Instruction::Write.opcode() => {
                for (i, value) in words[2..].iter().enumerate() {
                    self.store(address + i, *value);
                }
            }
            op if op == Instruction::BitModify.opcode() && words.len() == 4 => {
                let current = self.registers[address % REGISTER_COUNT];
                self.store(address, (current & !words[2]) | (words[3] & words[2]));
            }
            op if op == Instruction::ReadStatus.opcode() => self.pending = Pending::Status,
            op if op == Instruction::Reset.opcode() => self.reset(),
            op if op & 0xF8 == 0x80 => {
                if op & 0x01 != 0 && self.loopback_active() {
                    self.transmit_txb0();
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl Transfer<u8> for ExampleSPIBus {
    type Error = Infallible;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        match self.pending {
            Pending::Read(address) => {
                for (i, word) in words.iter_mut().enumerate() {
                    *word = self.registers[(address + i) % REGISTER_COUNT];
                }
                self.pending = Pending::Read(address + words.len());
            }
            Pending::Status => words.iter_mut().for_each(|word| *word = self.status()),
            Pending::None => {}
        }

        Ok(words)
    }
}

#[derive(Default, Debug)]
pub struct ExampleCSPin {}

impl OutputPin for ExampleCSPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Clock advancing by 1 ms on every reading
#[derive(Default, Debug)]
pub struct ExampleClock {
    ticks: Cell<u64>,
}

impl Clock for ExampleClock {
    type T = u64;
    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    fn try_now(&self) -> Result<Instant<Self>, Error> {
        let now = self.ticks.get();
        self.ticks.set(now + 1_000);

        Ok(Instant::new(now))
    }

    fn new_timer<Dur: Duration + FixedPoint>(&self, duration: Dur) -> Timer<OneShot, Armed, Self, Dur> {
        Timer::new(self, duration)
    }
}
