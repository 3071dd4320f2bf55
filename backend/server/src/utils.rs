use chrono::DateTime;

pub const UNKNOWN_DATE: &str = "N/A";

/// UTC calendar date of an epoch-millisecond timestamp.
pub fn format_date(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// Turns a model reply into one `• ` bullet per non-blank line.
pub fn format_bullets(reply: &str) -> String {
    reply
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("• {}", line.trim_start_matches(['*', '•', '-'])))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First letter upper, rest lower.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
}

pub fn google_search_url(query: &str) -> String {
    format!("https://www.google.com/search?q={}", query.replace(' ', "+"))
}
