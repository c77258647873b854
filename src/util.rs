use chrono::{DateTime, NaiveDate, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }

    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }

    if max <= 3 {
        return s.chars().take(max).collect();
    }

    let truncated: String = s.chars().take(max - 3).collect();
    format!("{}...", truncated)
}

/// Truncate to a terminal column budget rather than a char count, so wide
/// glyphs in source files don't push the gutter out of alignment.
pub fn truncate_to_width(s: &str, columns: usize) -> String {
    if s.width() <= columns {
        return s.to_string();
    }
    let budget = columns.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if columns > 0 {
        out.push('…');
    }
    out
}

/// Parse the timestamps the backend sends (RFC 3339, or a bare date).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "Mar 4, 2025" style date; unparseable input is shown as-is.
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn time_ago(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => "less than a minute ago".to_string(),
        60..=3599 => plural(secs / 60, "minute"),
        3600..=86_399 => plural(secs / 3600, "hour"),
        86_400..=2_591_999 => plural(secs / 86_400, "day"),
        2_592_000..=31_535_999 => plural(secs / 2_592_000, "month"),
        _ => plural(secs / 31_536_000, "year"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_unicode_safe() {
        let input = "ééééé";
        assert_eq!(truncate(input, 4), "é...");
    }

    #[test]
    fn test_truncate_small_max() {
        let input = "こんにちは";
        assert_eq!(truncate(input, 3), "こんに");
        assert_eq!(truncate(input, 0), "");
    }

    #[test]
    fn test_truncate_to_width_counts_columns() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        // each kana is two columns wide
        assert_eq!(truncate_to_width("こんにちは", 5), "こん…");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-04T10:15:00.000Z"), "Mar 4, 2025");
        assert_eq!(format_date("2024-12-25"), "Dec 25, 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_time_ago() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(time_ago("2025-03-10T11:59:30Z", now), "less than a minute ago");
        assert_eq!(time_ago("2025-03-10T11:00:00Z", now), "1 hour ago");
        assert_eq!(time_ago("2025-03-07T12:00:00Z", now), "3 days ago");
    }
}
