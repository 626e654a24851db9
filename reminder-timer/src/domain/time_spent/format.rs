use std::time::Duration;

/// Compact human form: only non-zero components, e.g. `"2h 5s"`, or `"0s"`.
///
/// Display only. The persisted annotation always carries all three
/// components.
pub fn format_compact(hours: u64, minutes: u64, seconds: u64) -> String {
    let parts: Vec<String> = [(hours, 'h'), (minutes, 'm'), (seconds, 's')]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();

    if parts.is_empty() {
        return "0s".to_string();
    }

    parts.join(" ")
}

/// Format a running timer as `HH:MM:SS`, or `MM:SS` below one hour.
pub fn format_clock(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_drops_zero_components() {
        assert_eq!(format_compact(2, 0, 5), "2h 5s");
        assert_eq!(format_compact(0, 3, 0), "3m");
        assert_eq!(format_compact(1, 2, 3), "1h 2m 3s");
    }

    #[test]
    fn compact_all_zero() {
        assert_eq!(format_compact(0, 0, 0), "0s");
    }

    #[test]
    fn clock_below_and_above_one_hour() {
        assert_eq!(format_clock(Duration::from_secs(65)), "01:05");
        assert_eq!(format_clock(Duration::from_secs(3600 + 61)), "01:01:01");
        assert_eq!(format_clock(Duration::ZERO), "00:00");
    }

    #[test]
    fn clock_ignores_subsecond_part() {
        assert_eq!(format_clock(Duration::from_millis(59_999)), "00:59");
    }
}
