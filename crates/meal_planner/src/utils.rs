//! Date helpers for store keys.

/// Normalize a date string to YYYY-MM-DD format.
///
/// Accepts:
/// - YYYY-MM-DD, zero padding optional
/// - RFC3339 datetime (extracts date)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS (extracts date)
pub fn normalize_date_str(s: &str) -> Option<String> {
    let s = s.trim();
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date().format("%Y-%m-%d").to_string());
    }
    None
}

/// Today's date in UTC as YYYY-MM-DD; generated plans are keyed by it.
pub fn today_utc() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
