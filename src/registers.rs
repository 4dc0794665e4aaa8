//!# Register map and SPI instruction set
//!
//! Addresses and opcodes are part of the public contract of the driver. Every register
//! access goes through [Register], so raw integers have to pass [Register::try_from] first.
#![allow(unused_braces)]
use crate::can::ArgumentError;
use modular_bitfield_msb::prelude::*;

/// Number of bytes of a TX/RX buffer window starting at its SIDH register
/// (SIDH, SIDL, EID8, EID0, DLC, D0..D7)
pub const BUFFER_WINDOW_SIZE: usize = 13;

/// Mask of the REQOP/OPMOD bits inside CANCTRL/CANSTAT
pub const MODE_MASK: u8 = 0xE0;

/// Bit offset of the REQOP/OPMOD bits
pub const MODE_OFFSET: u8 = 5;

/// Controller registers addressable by the driver
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Register {
    /// CAN status register
    CANSTAT = 0x0E,
    /// CAN control register
    CANCTRL = 0x0F,
    /// Configuration register 3
    CNF3 = 0x28,
    /// Configuration register 2
    CNF2 = 0x29,
    /// Configuration register 1
    CNF1 = 0x2A,
    /// CAN interrupt flag register
    CANINTF = 0x2C,
    TXB0CTRL = 0x30,
    TXB0SIDH = 0x31,
    TXB0SIDL = 0x32,
    TXB0EID8 = 0x33,
    TXB0EID0 = 0x34,
    TXB0DLC = 0x35,
    TXB0DATA = 0x36,
    TXB1CTRL = 0x40,
    TXB2CTRL = 0x50,
    RXB0CTRL = 0x60,
    RXB0SIDH = 0x61,
    RXB0SIDL = 0x62,
    RXB0EID8 = 0x63,
    RXB0EID0 = 0x64,
    RXB0DLC = 0x65,
    RXB0DATA = 0x66,
    RXB1CTRL = 0x70,
    RXB1SIDH = 0x71,
    RXB1SIDL = 0x72,
    RXB1EID8 = 0x73,
    RXB1EID0 = 0x74,
    RXB1DLC = 0x75,
    RXB1DATA = 0x76,
}

impl Register {
    /// Returns the register address
    pub const fn address(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Register {
    type Error = ArgumentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Register::*;

        Ok(match value {
            0x0E => CANSTAT,
            0x0F => CANCTRL,
            0x28 => CNF3,
            0x29 => CNF2,
            0x2A => CNF1,
            0x2C => CANINTF,
            0x30 => TXB0CTRL,
            0x31 => TXB0SIDH,
            0x32 => TXB0SIDL,
            0x33 => TXB0EID8,
            0x34 => TXB0EID0,
            0x35 => TXB0DLC,
            0x36 => TXB0DATA,
            0x40 => TXB1CTRL,
            0x50 => TXB2CTRL,
            0x60 => RXB0CTRL,
            0x61 => RXB0SIDH,
            0x62 => RXB0SIDL,
            0x63 => RXB0EID8,
            0x64 => RXB0EID0,
            0x65 => RXB0DLC,
            0x66 => RXB0DATA,
            0x70 => RXB1CTRL,
            0x71 => RXB1SIDH,
            0x72 => RXB1SIDL,
            0x73 => RXB1EID8,
            0x74 => RXB1EID0,
            0x75 => RXB1DLC,
            0x76 => RXB1DATA,
            other => return Err(ArgumentError::UnknownRegister(other)),
        })
    }
}

/// SPI instruction set
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Resets internal registers to default and enters configuration mode
    Reset,
    /// Reads data starting at the selected address
    Read,
    /// Writes data starting at the selected address
    Write,
    /// Masked write of a single register
    BitModify,
    /// Quick poll of RX/TX flags
    ReadStatus,
    /// Initiates transmission of the flagged TX buffers
    RequestToSend { txb0: bool, txb1: bool, txb2: bool },
}

impl Instruction {
    /// Returns the opcode byte sent as first byte of a transaction
    pub const fn opcode(self) -> u8 {
        match self {
            Instruction::Reset => 0xC0,
            Instruction::Read => 0x03,
            Instruction::Write => 0x02,
            Instruction::BitModify => 0x05,
            Instruction::ReadStatus => 0xA0,
            Instruction::RequestToSend { txb0, txb1, txb2 } => {
                0x80 | (txb0 as u8) | ((txb1 as u8) << 1) | ((txb2 as u8) << 2)
            }
        }
    }
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// Configuration register 1
pub struct Cnf1 {
    /// Synchronization jump width (length - 1)
    pub sjw: B2,
    /// Baud rate prescaler
    pub brp: B6,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// Configuration register 2
pub struct Cnf2 {
    /// PS2 bit time length taken from CNF3
    pub btlmode: bool,
    /// Bus line sampled three times at the sample point
    pub sam: bool,
    /// PS1 length - 1
    pub phseg1: B3,
    /// Propagation segment length - 1
    pub prseg: B3,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// Configuration register 3
pub struct Cnf3 {
    /// Start-of-frame signal on CLKOUT
    pub sof: bool,
    /// Wake-up filter enabled
    pub wakfil: bool,
    #[skip]
    __: B3,
    /// PS2 length - 1
    pub phseg2: B3,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// CAN interrupt flag register
pub struct CanIntf {
    /// Message error
    pub merrf: bool,
    /// Wake-up
    pub wakif: bool,
    /// Error interrupt (multiple sources in EFLG)
    pub errif: bool,
    pub tx2if: bool,
    pub tx1if: bool,
    pub tx0if: bool,
    /// RXB1 full
    pub rx1if: bool,
    /// RXB0 full
    pub rx0if: bool,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// CAN status register
pub struct CanStat {
    /// Operation mode
    pub opmod: B3,
    #[skip]
    __: B1,
    /// Interrupt flag code
    pub icod: B3,
    #[skip]
    unimplemented: B1,
}
