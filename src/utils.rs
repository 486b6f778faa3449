//! Utility functions for the portfolio reel

use std::time::Duration;

/// Format a clip position as MM:SS.ss
pub fn format_clock(position: Duration) -> String {
    let centis = (position.as_secs_f64() * 100.0).round() as u64;
    let minutes = centis / 6000;
    let remainder = centis % 6000;
    format!("{:02}:{:02}.{:02}", minutes, remainder / 100, remainder % 100)
}

/// Fraction of the clip already played, in 0.0..=1.0
pub fn progress_fraction(position: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 0.0;
    }
    (position.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_zero() {
        assert_eq!(format_clock(Duration::ZERO), "00:00.00");
    }

    #[test]
    fn test_format_clock_minutes_and_seconds() {
        assert_eq!(format_clock(Duration::from_millis(125_450)), "02:05.45");
    }

    #[test]
    fn test_format_clock_exact_minute() {
        assert_eq!(format_clock(Duration::from_secs(60)), "01:00.00");
    }

    #[test]
    fn test_format_clock_rounds_into_next_minute() {
        assert_eq!(format_clock(Duration::from_micros(59_996_000)), "01:00.00");
        assert_eq!(format_clock(Duration::from_micros(119_999_000)), "02:00.00");
        assert_eq!(format_clock(Duration::from_micros(59_994_000)), "00:59.99");
    }

    #[test]
    fn test_progress_fraction() {
        let duration = Duration::from_secs(20);
        assert_eq!(progress_fraction(Duration::from_secs(5), duration), 0.25);
        assert_eq!(progress_fraction(Duration::from_secs(30), duration), 1.0);
        assert_eq!(progress_fraction(Duration::from_secs(5), Duration::ZERO), 0.0);
    }
}
