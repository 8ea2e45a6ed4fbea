//! Display formatting for byte counts and chart ticks.
//!
//! Decimal rounding follows the dashboard's fixed-point convention: a value
//! exactly halfway between two candidates rounds to the larger magnitude
//! (`2.5` becomes `3`, `1.125` becomes `1.13`). Rust's own `{:.N}` rounds
//! halves to even, so [`to_fixed`] handles the tie case explicitly.

use chrono::{DateTime, Local, Utc};
use warptail_types::parse_timestamp;

/// Byte units, base 1024.
const BYTE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Digits printed past the requested precision to detect exact halves.
const GUARD_DIGITS: usize = 40;

/// Placeholder for an axis tick that is not a timestamp.
const INVALID_TICK: &str = "--:--:--";

/// Format a value with a fixed number of decimals, rounding halves away
/// from zero.
pub(crate) fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let wide = format!("{:.*}", digits + GUARD_DIGITS, value.abs());
    let (head, guard) = wide.split_at(wide.len() - GUARD_DIGITS);
    let head = head.strip_suffix('.').unwrap_or(head);

    let rounded = if guard.as_bytes()[0] >= b'5' {
        increment_last_digit(head)
    } else {
        head.to_string()
    };

    format!("{sign}{rounded}")
}

/// Add one unit in the last place of a plain decimal string.
fn increment_last_digit(number: &str) -> String {
    let mut bytes = number.as_bytes().to_vec();
    let mut carry = true;

    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
            }
        }
    }

    let mut out = String::with_capacity(bytes.len() + 1);
    if carry {
        out.push('1');
    }
    out.extend(bytes.into_iter().map(char::from));
    out
}

/// Format a byte count using the largest fitting unit, with no decimals.
///
/// Values below 1024 are shown in bytes. Values beyond the petabyte range
/// stay in `PB`. Non-finite input renders as `-`.
///
/// ```
/// use warptail_stats::data::format::format_bytes;
///
/// assert_eq!(format_bytes(0.0), "0 B");
/// assert_eq!(format_bytes(1023.0), "1023 B");
/// assert_eq!(format_bytes(1536.0), "2 KB");
/// assert_eq!(format_bytes(5.0 * 1024.0 * 1024.0), "5 MB");
/// ```
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() {
        return "-".to_string();
    }
    if bytes < 1024.0 {
        return format!("{} B", to_fixed(bytes, 0));
    }

    let exponent = (bytes.ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(BYTE_UNITS.len() - 1);
    let scaled = bytes / 1024f64.powi(exponent as i32);

    format!("{} {}", to_fixed(scaled, 0), BYTE_UNITS[exponent])
}

/// Format an instant as a zero-padded local `HH:MM:SS` tick label.
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Format a timestamp string as an axis tick label.
///
/// Strings that do not parse render as `--:--:--`.
pub fn format_x_axis(tick: &str) -> String {
    match parse_timestamp(tick) {
        Ok(ts) => format_time(ts),
        Err(_) => INVALID_TICK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn to_fixed_rounds_halves_up() {
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.125, 2), "1.13");
        assert_eq!(to_fixed(1.25, 1), "1.3");
    }

    #[test]
    fn to_fixed_below_half() {
        assert_eq!(to_fixed(2.4, 0), "2");
        assert_eq!(to_fixed(0.49999999999999994, 0), "0");
        // 1.005 is stored slightly below the half.
        assert_eq!(to_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn to_fixed_carries() {
        assert_eq!(to_fixed(9.995, 2), "9.99");
        assert_eq!(to_fixed(9.5, 0), "10");
        assert_eq!(to_fixed(99.96, 1), "100.0");
        assert_eq!(to_fixed(999.9, 0), "1000");
    }

    #[test]
    fn to_fixed_pads_decimals() {
        assert_eq!(to_fixed(1.5, 2), "1.50");
        assert_eq!(to_fixed(7.0, 1), "7.0");
        assert_eq!(to_fixed(0.0, 2), "0.00");
    }

    #[test]
    fn to_fixed_negative_and_special() {
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(-0.0, 0), "0");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
        assert_eq!(to_fixed(f64::INFINITY, 0), "Infinity");
    }

    #[test]
    fn format_bytes_small_values() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(1.0), "1 B");
        assert_eq!(format_bytes(512.4), "512 B");
        assert_eq!(format_bytes(1023.0), "1023 B");
    }

    #[test]
    fn format_bytes_unit_boundaries() {
        assert_eq!(format_bytes(1024.0), "1 KB");
        assert_eq!(format_bytes(1024.0 * 1024.0), "1 MB");
        assert_eq!(format_bytes(1024f64.powi(3)), "1 GB");
        assert_eq!(format_bytes(1024f64.powi(4) * 3.0), "3 TB");
        assert_eq!(format_bytes(1024f64.powi(5) * 2.0), "2 PB");
    }

    #[test]
    fn format_bytes_rounds_at_unit() {
        assert_eq!(format_bytes(1536.0), "2 KB");
        assert_eq!(format_bytes(2560.0), "3 KB");
        assert_eq!(format_bytes(1400.0), "1 KB");
        // Just under 1 MB stays in KB and rounds up to 1024.
        assert_eq!(format_bytes(1024.0 * 1024.0 - 1.0), "1024 KB");
    }

    #[test]
    fn format_bytes_beyond_petabytes() {
        assert_eq!(format_bytes(1024f64.powi(6)), "1024 PB");
    }

    #[test]
    fn format_bytes_non_finite() {
        assert_eq!(format_bytes(f64::NAN), "-");
        assert_eq!(format_bytes(f64::INFINITY), "-");
    }

    #[test]
    fn format_time_is_zero_padded_local() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let expected = ts.with_timezone(&Local).format("%H:%M:%S").to_string();
        let label = format_time(ts);
        assert_eq!(label, expected);
        assert_eq!(label.len(), 8);
        assert_eq!(label.as_bytes()[2], b':');
        assert!(label.ends_with(":05"));
    }

    #[test]
    fn format_x_axis_parses_tick() {
        let ts = Utc.with_ymd_and_hms(2025, 4, 11, 19, 49, 40).unwrap();
        assert_eq!(format_x_axis("2025-04-11T19:49:40Z"), format_time(ts));
    }

    #[test]
    fn format_x_axis_invalid_tick() {
        assert_eq!(format_x_axis("soon"), "--:--:--");
    }
}
