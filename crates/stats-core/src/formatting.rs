/// Suffix appended to every rendered duration.
pub const MINUTES_SUFFIX: &str = " min.";

/// Render a number of minutes the way the report expects it.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(455), "455 min.");
/// assert_eq!(format_minutes(0),   "0 min.");
/// assert_eq!(format_minutes(-3),  "-3 min.");
/// ```
pub fn format_minutes(minutes: i64) -> String {
    format!("{}{}", minutes, MINUTES_SUFFIX)
}

/// Sort `labels` ascending (byte-wise) and join them with `separator`.
///
/// Duplicates are kept.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::join_sorted;
///
/// let labels = vec!["SAFARI 29".to_string(), "CHROME 6".to_string()];
/// assert_eq!(join_sorted(&labels, ", "), "CHROME 6, SAFARI 29");
/// assert_eq!(join_sorted(&[], ", "), "");
/// ```
pub fn join_sorted(labels: &[String], separator: &str) -> String {
    let mut sorted: Vec<&str> = labels.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(separator)
}

/// Sort `dates` as plain strings, newest (greatest) first.
///
/// ISO-8601 dates order correctly as strings, so no calendar parsing is
/// involved.
pub fn sort_descending(dates: &[String]) -> Vec<String> {
    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.reverse();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── format_minutes ────────────────────────────────────────────────────────

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(118), "118 min.");
        assert_eq!(format_minutes(0), "0 min.");
    }

    // ── join_sorted ───────────────────────────────────────────────────────────

    #[test]
    fn test_join_sorted_is_lexicographic() {
        // "CHROME 13" sorts before "CHROME 6" as a string.
        let labels = strings(&["CHROME 6", "SAFARI 17", "CHROME 13"]);
        assert_eq!(join_sorted(&labels, ", "), "CHROME 13, CHROME 6, SAFARI 17");
    }

    #[test]
    fn test_join_sorted_keeps_duplicates() {
        let labels = strings(&["IE 28", "FIREFOX 12", "IE 28"]);
        assert_eq!(join_sorted(&labels, ","), "FIREFOX 12,IE 28,IE 28");
    }

    #[test]
    fn test_join_sorted_single() {
        assert_eq!(join_sorted(&strings(&["CHROME 6"]), ", "), "CHROME 6");
    }

    // ── sort_descending ───────────────────────────────────────────────────────

    #[test]
    fn test_sort_descending() {
        let dates = strings(&["2016-10-23", "2017-09-27", "2016-09-01"]);
        assert_eq!(
            sort_descending(&dates),
            strings(&["2017-09-27", "2016-10-23", "2016-09-01"])
        );
    }

    #[test]
    fn test_sort_descending_empty() {
        assert!(sort_descending(&[]).is_empty());
    }

    #[test]
    fn test_sort_descending_leaves_input_untouched() {
        let dates = strings(&["2016-01-01", "2018-01-01"]);
        let _ = sort_descending(&dates);
        assert_eq!(dates, strings(&["2016-01-01", "2018-01-01"]));
    }
}
