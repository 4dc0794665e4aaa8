use crate::can::ArgumentError;
use crate::registers::{CanStat, MODE_MASK, MODE_OFFSET};
use serde::{Deserialize, Serialize};

/// Operation mode as encoded in the REQOP bits of CANCTRL and the OPMOD bits of CANSTAT
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationMode {
    /// Normal operation, device takes part in bus traffic
    #[default]
    Normal = 0b000,
    /// Sleep mode, oscillator stopped
    Sleep = 0b001,
    /// Internal loopback, transmitted frames are received without driving the bus
    Loopback = 0b010,
    /// Listen-only mode, device receives all frames but never acknowledges
    ListenOnly = 0b011,
    /// Configuration mode, the only mode allowing bit timing changes
    Configuration = 0b100,
}

impl OperationMode {
    /// Returns the three bit mode code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the mode code shifted into REQOP/OPMOD position
    pub const fn register_bits(self) -> u8 {
        (self as u8) << MODE_OFFSET
    }

    /// Maps the OPMOD bits of CANSTAT. Returns None for codes the device should never report.
    pub(crate) fn from_register(register: u8) -> Option<Self> {
        Self::try_from(CanStat::from(register).opmod()).ok()
    }
}

impl TryFrom<u8> for OperationMode {
    type Error = ArgumentError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0b000 => Ok(Self::Normal),
            0b001 => Ok(Self::Sleep),
            0b010 => Ok(Self::Loopback),
            0b011 => Ok(Self::ListenOnly),
            0b100 => Ok(Self::Configuration),
            other => Err(ArgumentError::UnknownMode(other)),
        }
    }
}

/// Returns the raw OPMOD bits of a CANSTAT value
pub(crate) fn mode_bits(register: u8) -> u8 {
    register & MODE_MASK
}

/// Quick status returned by the READ STATUS instruction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControllerStatus {
    /// TXB2 transmission completed
    pub tx2_interrupt: bool,
    /// TXB2 pending transmission
    pub tx2_pending: bool,
    pub tx1_interrupt: bool,
    pub tx1_pending: bool,
    pub tx0_interrupt: bool,
    pub tx0_pending: bool,
    /// RXB1 holds a frame
    pub rx1_full: bool,
    /// RXB0 holds a frame
    pub rx0_full: bool,
}

impl ControllerStatus {
    pub(crate) fn from_register(register: u8) -> Self {
        Self {
            tx2_interrupt: register & (1 << 7) != 0,
            tx2_pending: register & (1 << 6) != 0,
            tx1_interrupt: register & (1 << 5) != 0,
            tx1_pending: register & (1 << 4) != 0,
            tx0_interrupt: register & (1 << 3) != 0,
            tx0_pending: register & (1 << 2) != 0,
            rx1_full: register & (1 << 1) != 0,
            rx0_full: register & 1 != 0,
        }
    }
}
