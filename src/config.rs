use crate::can::ArgumentError;
use crate::registers::{Cnf1, Cnf2, Cnf3};
use crate::status::OperationMode;
use serde::{Deserialize, Serialize};

/// Maximum number of time quanta per bit supported by the controller
pub const MAX_QUANTA_PER_BIT: u8 = 25;

/// Entire configuration applied by [crate::can::MCP2515::configure]
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Bit timing written while in configuration mode
    pub timing: BitTiming,

    /// Mode entered once timing is written
    pub mode: OperationMode,
}

/// Number of samples taken at the sample point
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleMode {
    #[default]
    Once = 0b0,
    ThreeTimes = 0b1,
}

/// Bit timing, segment lengths given in time quanta
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitTiming {
    /// Propagation segment (1-8)
    pub propagation_segment: u8,

    /// Phase segment 1 (1-8)
    pub phase_segment_1: u8,

    /// Phase segment 2 (2-8)
    pub phase_segment_2: u8,

    /// Synchronization jump width (1-4)
    pub sync_jump_width: u8,

    /// Baud rate prescaler (0-63), TQ = 2 * (BRP + 1) / Fosc
    pub baud_rate_prescaler: u8,

    pub sample_mode: SampleMode,
}

impl Default for BitTiming {
    /// 250 kbit/s with a 16 MHz oscillator, 16 TQ per bit, sample point at 75 %
    fn default() -> Self {
        Self {
            propagation_segment: 3,
            phase_segment_1: 8,
            phase_segment_2: 4,
            sync_jump_width: 1,
            baud_rate_prescaler: 1,
            sample_mode: SampleMode::Once,
        }
    }
}

impl BitTiming {
    /// Total number of time quanta per bit, including the synchronization segment
    pub fn quanta_per_bit(&self) -> u8 {
        1u8.saturating_add(self.propagation_segment)
            .saturating_add(self.phase_segment_1)
            .saturating_add(self.phase_segment_2)
    }

    /// Checks segment ranges and the per bit quanta limit
    pub fn validate(&self) -> Result<(), ArgumentError> {
        let quanta = self.quanta_per_bit();
        if quanta > MAX_QUANTA_PER_BIT {
            return Err(ArgumentError::TooManyTimeQuanta(quanta));
        }

        Self::check_range("propagation_segment", self.propagation_segment, 1, 8)?;
        Self::check_range("phase_segment_1", self.phase_segment_1, 1, 8)?;
        Self::check_range("phase_segment_2", self.phase_segment_2, 2, 8)?;
        Self::check_range("sync_jump_width", self.sync_jump_width, 1, 4)?;
        Self::check_range("baud_rate_prescaler", self.baud_rate_prescaler, 0, 63)
    }

    /// Encodes the timing to CNF1, CNF2 and CNF3 (in that order).
    /// Descriptor has to be valid, see [Self::validate].
    pub(crate) fn as_registers(&self) -> [u8; 3] {
        let cnf1 = Cnf1::new()
            .with_sjw(self.sync_jump_width - 1)
            .with_brp(self.baud_rate_prescaler);

        let cnf2 = Cnf2::new()
            .with_btlmode(true)
            .with_sam(self.sample_mode == SampleMode::ThreeTimes)
            .with_phseg1(self.phase_segment_1 - 1)
            .with_prseg(self.propagation_segment - 1);

        let cnf3 = Cnf3::new().with_phseg2(self.phase_segment_2 - 1);

        [cnf1.into(), cnf2.into(), cnf3.into()]
    }

    /// Maps CNF1, CNF2 and CNF3 register values back to timing
    pub(crate) fn from_registers(cnf1: u8, cnf2: u8, cnf3: u8) -> Self {
        let cnf1 = Cnf1::from(cnf1);
        let cnf2 = Cnf2::from(cnf2);
        let cnf3 = Cnf3::from(cnf3);

        Self {
            propagation_segment: cnf2.prseg() + 1,
            phase_segment_1: cnf2.phseg1() + 1,
            phase_segment_2: cnf3.phseg2() + 1,
            sync_jump_width: cnf1.sjw() + 1,
            baud_rate_prescaler: cnf1.brp(),
            sample_mode: if cnf2.sam() {
                SampleMode::ThreeTimes
            } else {
                SampleMode::Once
            },
        }
    }

    fn check_range(field: &'static str, value: u8, min: u8, max: u8) -> Result<(), ArgumentError> {
        if value < min || value > max {
            return Err(ArgumentError::TimingOutOfRange { field, value });
        }

        Ok(())
    }
}
