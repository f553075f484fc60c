use chrono::NaiveDate;

/// Date format embedded in release tags (`v2024.06.01`, `v2024.06.01.2`)
const TAG_DATE_FORMAT: &str = "%Y.%m.%d";

/// Compute the next release tag from the last published tag and today's
/// date
///
/// Same-day releases get an incrementing numeric suffix; the first release
/// of a day carries none (implicit suffix 0, first increment is `.1`).
///
/// Same-day detection is string containment of the formatted date, not a
/// structural date comparison. A tag embedding today's date string
/// anywhere would be treated as same-day; this matches the established
/// tag convention and is kept for compatibility with existing release
/// history.
pub fn next_release_tag(last_tag: Option<&str>, today: NaiveDate) -> String {
    let date = today.format(TAG_DATE_FORMAT).to_string();
    let fresh = format!("v{}", date);

    let last = match last_tag {
        Some(last) => last,
        None => return fresh,
    };

    if last == fresh {
        return format!("{}.1", fresh);
    }

    if last.contains(&date) {
        // Same day, already suffixed: bump the trailing counter. A tag
        // whose trailing segment is not numeric is malformed and resets
        // below.
        if let Some(counter) = last.rsplit('.').next().and_then(|s| s.parse::<u32>().ok()) {
            return format!("{}.{}", fresh, counter + 1);
        }
    }

    fresh
}

/// Title of the release cut for a tag
pub fn release_title(tag: &str) -> String {
    format!("Release {}", tag)
}
