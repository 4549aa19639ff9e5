//! Timer formatting for the playback surface
//!
//! Pure functions from elapsed time to "M:SS" display strings. Seconds are
//! zero-padded, minutes are not ("0:07", "10:00"). Fractional seconds
//! truncate toward zero, so a countdown reaches "0:00" exactly when the
//! segment ends.

use std::time::Duration;

/// Format whole seconds as "M:SS"
pub fn format_mmss(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Remaining time in the current segment as "M:SS"
pub fn format_remaining(segment_duration_secs: u32, segment_elapsed: Duration) -> String {
    let remaining =
        Duration::from_secs(u64::from(segment_duration_secs)).saturating_sub(segment_elapsed);
    format_mmss(remaining.as_secs())
}

/// Total session time as "M:SS"
pub fn format_total(total_elapsed: Duration) -> String {
    format_mmss(total_elapsed.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0), "0:00");
        assert_eq!(format_mmss(7), "0:07");
        assert_eq!(format_mmss(59), "0:59");
        assert_eq!(format_mmss(60), "1:00");
        assert_eq!(format_mmss(90), "1:30");
        assert_eq!(format_mmss(600), "10:00");
        assert_eq!(format_mmss(3725), "62:05");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(90, Duration::from_secs(83)), "0:07");
        assert_eq!(format_remaining(600, Duration::ZERO), "10:00");
        assert_eq!(format_remaining(30, Duration::from_secs(30)), "0:00");
        // Over-elapsed saturates rather than going negative
        assert_eq!(format_remaining(30, Duration::from_secs(45)), "0:00");
        // Fractional elapsed truncates toward zero
        assert_eq!(format_remaining(90, Duration::from_millis(83_400)), "0:06");
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(Duration::ZERO), "0:00");
        assert_eq!(format_total(Duration::from_millis(85_900)), "1:25");
    }

    proptest! {
        #[test]
        fn prop_format_parses_back(secs in 0u64..100_000) {
            let text = format_mmss(secs);
            let (mins, rest) = text.split_once(':').unwrap();
            prop_assert_eq!(rest.len(), 2);
            let parsed = mins.parse::<u64>().unwrap() * 60 + rest.parse::<u64>().unwrap();
            prop_assert_eq!(parsed, secs);
        }

        #[test]
        fn prop_remaining_never_exceeds_duration(duration in 1u32..10_000, elapsed_ms in 0u64..20_000_000) {
            let text = format_remaining(duration, Duration::from_millis(elapsed_ms));
            let (mins, rest) = text.split_once(':').unwrap();
            let shown = mins.parse::<u64>().unwrap() * 60 + rest.parse::<u64>().unwrap();
            prop_assert!(shown <= u64::from(duration));
        }
    }
}
