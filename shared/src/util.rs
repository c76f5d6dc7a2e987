use chrono::{Datelike, TimeZone, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Calendar year (UTC) of a millisecond timestamp
///
/// Out-of-range timestamps fall back to the current year.
pub fn year_of_millis(millis: i64) -> i32 {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.year())
        .unwrap_or_else(|| Utc::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of_millis() {
        // 2024-03-01T00:00:00Z
        assert_eq!(year_of_millis(1_709_251_200_000), 2024);
        // 1970-01-01
        assert_eq!(year_of_millis(0), 1970);
    }

    #[test]
    fn test_now_millis_is_current_year() {
        assert_eq!(year_of_millis(now_millis()), Utc::now().year());
    }
}
