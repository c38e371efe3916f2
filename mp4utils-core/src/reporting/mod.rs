//! Reporting of run results.

pub mod summary;

pub use summary::{RunSummary, StatusCounts};

use std::time::Duration;

/// Formats a duration as `HH:MM:SS`.
pub fn format_duration(duration: &Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(&Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_duration(&Duration::from_secs(3725)), "01:02:05");
    }
}
