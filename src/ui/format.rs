// src/ui/format.rs
//! Time formatting for the readout and caption.

/// Render `seconds` as `MM:SS`.
///
/// Minutes are unbounded and seconds are floored, never rounded. Negative or
/// non-finite input renders as `00:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::format_time;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.0), "00:59");
        assert_eq!(format_time(60.0), "01:00");
        assert_eq!(format_time(3661.0), "61:01");
    }

    #[test]
    fn floors_instead_of_rounding() {
        assert_eq!(format_time(59.999), "00:59");
        assert_eq!(format_time(0.5), "00:00");
        assert_eq!(format_time(119.9), "01:59");
    }

    #[test]
    fn garbage_renders_as_zero() {
        assert_eq!(format_time(-4.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_time(100.0 * 60.0 + 7.0), "100:07");
    }
}
