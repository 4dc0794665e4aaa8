use crate::can::ArgumentError;
use crate::config::{BitTiming, Configuration, SampleMode};
use crate::status::OperationMode;

fn timing() -> BitTiming {
    BitTiming {
        propagation_segment: 3,
        phase_segment_1: 8,
        phase_segment_2: 4,
        sync_jump_width: 1,
        baud_rate_prescaler: 1,
        sample_mode: SampleMode::Once,
    }
}

#[test]
fn test_timing_as_registers() {
    assert_eq!([0x01, 0xBA, 0x03], timing().as_registers());

    // Same descriptor always yields the same bytes
    assert_eq!(timing().as_registers(), timing().as_registers());
}

#[test]
fn test_timing_as_registers_all_fields() {
    let timing = BitTiming {
        propagation_segment: 8,
        phase_segment_1: 1,
        phase_segment_2: 8,
        sync_jump_width: 4,
        baud_rate_prescaler: 63,
        sample_mode: SampleMode::ThreeTimes,
    };

    assert_eq!([0b1111_1111, 0b1100_0111, 0b0000_0111], timing.as_registers());
}

#[test]
fn test_timing_from_registers() {
    assert_eq!(timing(), BitTiming::from_registers(0x01, 0xBA, 0x03));

    let timing = BitTiming::from_registers(0b1000_0011, 0b1101_0001, 0b0000_0001);
    assert_eq!(2, timing.propagation_segment);
    assert_eq!(3, timing.phase_segment_1);
    assert_eq!(2, timing.phase_segment_2);
    assert_eq!(3, timing.sync_jump_width);
    assert_eq!(3, timing.baud_rate_prescaler);
    assert_eq!(SampleMode::ThreeTimes, timing.sample_mode);
}

#[test]
fn test_timing_default() {
    assert_eq!(timing(), BitTiming::default());
    assert_eq!(16, BitTiming::default().quanta_per_bit());
    assert!(BitTiming::default().validate().is_ok());
}

#[test]
fn test_timing_validate_ranges() {
    let check = |timing: BitTiming, field: &'static str, value: u8| {
        assert_eq!(Err(ArgumentError::TimingOutOfRange { field, value }), timing.validate());
    };

    check(
        BitTiming {
            propagation_segment: 0,
            ..timing()
        },
        "propagation_segment",
        0,
    );
    check(
        BitTiming {
            phase_segment_1: 9,
            ..timing()
        },
        "phase_segment_1",
        9,
    );
    check(
        BitTiming {
            phase_segment_2: 1,
            ..timing()
        },
        "phase_segment_2",
        1,
    );
    check(
        BitTiming {
            sync_jump_width: 5,
            ..timing()
        },
        "sync_jump_width",
        5,
    );
    check(
        BitTiming {
            baud_rate_prescaler: 64,
            ..timing()
        },
        "baud_rate_prescaler",
        64,
    );
}

#[test]
fn test_timing_validate_quanta_limit() {
    let limit = BitTiming {
        propagation_segment: 8,
        phase_segment_1: 8,
        phase_segment_2: 8,
        ..timing()
    };
    assert_eq!(25, limit.quanta_per_bit());
    assert_eq!(Ok(()), limit.validate());

    let exceeded = BitTiming {
        phase_segment_2: 9,
        ..limit
    };
    assert_eq!(Err(ArgumentError::TooManyTimeQuanta(26)), exceeded.validate());

    let saturated = BitTiming {
        propagation_segment: u8::MAX,
        ..timing()
    };
    assert_eq!(Err(ArgumentError::TooManyTimeQuanta(u8::MAX)), saturated.validate());
}

#[test]
fn test_configuration_default() {
    let config = Configuration::default();

    assert_eq!(OperationMode::Normal, config.mode);
    assert_eq!(BitTiming::default(), config.timing);
}
