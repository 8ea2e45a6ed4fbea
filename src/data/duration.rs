use std::time::Duration;

use anyhow::{bail, Result};

use super::format::to_fixed;

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
    ("h", 3_600_000_000_000.0),
];

/// Display units, largest first.
const DISPLAY_UNITS: &[(&str, f64)] = &[
    ("s", 1_000_000_000.0),
    ("ms", 1_000_000.0),
    ("µs", 1_000.0),
    ("ns", 1.0),
];

/// Parse duration strings like "10m", "60s", "988.82ms", "16.958µs"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Duration must be a non-negative number: {}", s);
            }
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Format a nanosecond latency for display.
///
/// Missing or negative input is shown as `-`. The largest unit the value
/// reaches is used, with 2 decimals below 10, 1 below 100, none otherwise.
pub fn format_duration(nanoseconds: Option<f64>) -> String {
    let Some(nanos) = nanoseconds else {
        return "-".to_string();
    };
    if nanos < 0.0 {
        return "-".to_string();
    }
    if nanos == 0.0 {
        return "0 ns".to_string();
    }

    for (label, size) in DISPLAY_UNITS {
        if nanos >= *size {
            let value = nanos / size;
            let digits = if value < 10.0 {
                2
            } else if value < 100.0 {
                1
            } else {
                0
            };
            return format!("{} {}", to_fixed(value, digits), label);
        }
    }

    // Fractions of a nanosecond (and NaN) fall through every unit.
    format!("{} ns", nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("29.992671083s").unwrap();
        assert!((d.as_secs_f64() - 29.992671083).abs() < 0.0001);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("988.82775ms").unwrap();
        assert!((d.as_secs_f64() - 0.98882775).abs() < 0.0001);
    }

    #[test]
    fn test_parse_microseconds() {
        let d = parse_duration("16.958µs").unwrap();
        assert_eq!(d.as_nanos(), 16958);
    }

    #[test]
    fn parse_microseconds_with_us_suffix() {
        let d = parse_duration("500us").unwrap();
        assert_eq!(d.as_nanos(), 500_000);
    }

    #[test]
    fn parse_minutes_and_hours() {
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("1.5m").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
    }

    #[test]
    fn parse_ms_is_not_minutes() {
        assert_eq!(parse_duration("5ms").unwrap(), Duration::from_millis(5));
    }

    #[test]
    fn parse_with_whitespace() {
        let d = parse_duration("  100ms  ").unwrap();
        assert_eq!(d.as_millis(), 100);
    }

    #[test]
    fn parse_unknown_format_fails() {
        assert!(parse_duration("100x").is_err());
        assert!(parse_duration("100").is_err());
    }

    #[test]
    fn parse_invalid_number_fails() {
        assert!(parse_duration("abcms").is_err());
    }

    #[test]
    fn parse_negative_fails() {
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn format_missing_or_negative() {
        assert_eq!(format_duration(None), "-");
        assert_eq!(format_duration(Some(-1.0)), "-");
    }

    #[test]
    fn format_zero() {
        assert_eq!(format_duration(Some(0.0)), "0 ns");
    }

    #[test]
    fn format_nanoseconds() {
        assert_eq!(format_duration(Some(999.0)), "999 ns");
        assert_eq!(format_duration(Some(5.0)), "5.00 ns");
        assert_eq!(format_duration(Some(42.0)), "42.0 ns");
    }

    #[test]
    fn format_microseconds() {
        assert_eq!(format_duration(Some(1_500.0)), "1.50 µs");
        assert_eq!(format_duration(Some(15_250.0)), "15.3 µs");
        assert_eq!(format_duration(Some(250_000.0)), "250 µs");
    }

    #[test]
    fn format_milliseconds() {
        assert_eq!(format_duration(Some(1_000_000.0)), "1.00 ms");
        assert_eq!(format_duration(Some(99_940_000.0)), "99.9 ms");
    }

    #[test]
    fn format_seconds() {
        assert_eq!(format_duration(Some(1_500_000_000.0)), "1.50 s");
        assert_eq!(format_duration(Some(3_600_000_000_000.0)), "3600 s");
    }

    #[test]
    fn format_precision_tiers_at_boundaries() {
        // 9.995 µs is stored just below the half and keeps 2 decimals.
        assert_eq!(format_duration(Some(9_995.0)), "9.99 µs");
        assert_eq!(format_duration(Some(10_000.0)), "10.0 µs");
        assert_eq!(format_duration(Some(100_000.0)), "100 µs");
    }

    #[test]
    fn format_sub_nanosecond() {
        assert_eq!(format_duration(Some(0.5)), "0.5 ns");
    }
}
