//! Delay to duration conversion

use std::time::Duration;

use crate::models::DelayUnit;

/// Converts an entered delay into milliseconds.
///
/// Total for every `u32` amount; range checks belong to the validation engine.
pub fn to_milliseconds(amount: u32, unit: DelayUnit) -> u64 {
    u64::from(amount) * unit.millis_per_unit()
}

pub fn to_duration(amount: u32, unit: DelayUnit) -> Duration {
    Duration::from_millis(to_milliseconds(amount, unit))
}

/// Whole seconds shown when a countdown of `total_ms` starts
pub fn countdown_seconds(total_ms: u64) -> u64 {
    total_ms / 1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_conversions() {
        assert_eq!(to_milliseconds(2, DelayUnit::Minutes), 120_000);
        assert_eq!(to_milliseconds(1, DelayUnit::Hours), 3_600_000);
        assert_eq!(to_milliseconds(3600, DelayUnit::Seconds), 3_600_000);
        assert_eq!(to_milliseconds(3600, DelayUnit::Hours), 12_960_000_000);
        assert_eq!(to_milliseconds(0, DelayUnit::Minutes), 0);
    }

    #[test]
    fn test_countdown_floors() {
        assert_eq!(countdown_seconds(1_999), 1);
        assert_eq!(countdown_seconds(120_000), 120);
        assert_eq!(countdown_seconds(999), 0);
    }

    proptest! {
        #[test]
        fn prop_units_scale_exactly(amount in any::<u32>()) {
            let seconds = to_milliseconds(amount, DelayUnit::Seconds);
            prop_assert_eq!(to_milliseconds(amount, DelayUnit::Minutes), seconds * 60);
            prop_assert_eq!(to_milliseconds(amount, DelayUnit::Hours), seconds * 3600);
            prop_assert_eq!(countdown_seconds(seconds), u64::from(amount));
        }

        #[test]
        fn prop_duration_matches_millis(amount in 1u32..=3600, unit in prop::sample::select(DelayUnit::ALL.to_vec())) {
            prop_assert_eq!(
                to_duration(amount, unit).as_millis(),
                u128::from(to_milliseconds(amount, unit))
            );
        }
    }
}
