pub const MINUTE: u64 = 60;

/// Formats a number of seconds as zero-padded `MM:SS`.
pub fn format_duration(seconds: u64) -> String {
    let minutes = seconds / MINUTE;
    let remaining_seconds = seconds % MINUTE;
    format!("{:02}:{:02}", minutes, remaining_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_duration(125), "02:05");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(60), "01:00");
        assert_eq!(format_duration(0), "00:00");
    }

    #[test]
    fn does_not_cap_minutes() {
        assert_eq!(format_duration(6000), "100:00");
    }
}
