//! File name derivation for new notes.

use crate::constants::{MAX_TITLE_CHARS, NOTE_EXTENSION, TIMESTAMP_FORMAT, TIMESTAMP_STEM_PREFIX};
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

fn disallowed_regex() -> &'static Regex {
    static DISALLOWED_REGEX: OnceLock<Regex> = OnceLock::new();
    DISALLOWED_REGEX.get_or_init(|| Regex::new(r"[^a-z0-9_-]").unwrap())
}

fn dash_run_regex() -> &'static Regex {
    static DASH_RUN_REGEX: OnceLock<Regex> = OnceLock::new();
    DASH_RUN_REGEX.get_or_init(|| Regex::new(r"-{2,}").unwrap())
}

/// Turns free text from a title provider into a safe filename stem.
///
/// The result may be empty when nothing usable survives; callers pick a
/// fallback in that case.
pub fn sanitize_title(raw: &str) -> String {
    // Providers sometimes return the escaped sequence rather than a newline.
    let unescaped = raw.replace("\\n", "");
    let trimmed = unescaped
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`' || c == '*')
        .trim()
        .to_lowercase();

    let dashed = trimmed.split_whitespace().collect::<Vec<_>>().join("-");
    let cleaned = disallowed_regex().replace_all(&dashed, "");
    let collapsed = dash_run_regex().replace_all(&cleaned, "-");

    let stem: String = collapsed
        .trim_matches(|c| c == '-' || c == '_')
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();

    stem.trim_end_matches(|c| c == '-' || c == '_').to_string()
}

/// `note_YYYYMMDD_HHMMSS` for the given moment.
pub fn timestamp_stem(now: &glib::DateTime) -> Result<String> {
    let stamp = now.format(TIMESTAMP_FORMAT)?;
    Ok(format!("{}_{}", TIMESTAMP_STEM_PREFIX, stamp))
}

/// Timestamp stem for the current local time.
pub fn current_timestamp_stem() -> Result<String> {
    let now = glib::DateTime::now_local()?;
    timestamp_stem(&now)
}

/// File name for the `attempt`-th try: `stem.txt`, then `stem_1.txt`, `stem_2.txt`, ...
pub fn candidate_name(stem: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}.{}", stem, NOTE_EXTENSION)
    } else {
        format!("{}_{}.{}", stem, attempt, NOTE_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title_plain() {
        assert_eq!(sanitize_title("grocery-list"), "grocery-list");
    }

    #[test]
    fn test_sanitize_title_strips_newlines_and_whitespace() {
        assert_eq!(sanitize_title("  dream-journal\\n"), "dream-journal");
        assert_eq!(sanitize_title("dream-journal\n"), "dream-journal");
    }

    #[test]
    fn test_sanitize_title_drops_escaped_newline_sequence() {
        assert_eq!(sanitize_title("dream\\njournal"), "dreamjournal");
    }

    #[test]
    fn test_sanitize_title_lowercases_and_dashes_spaces() {
        assert_eq!(sanitize_title("Meeting Notes"), "meeting-notes");
        assert_eq!(sanitize_title("\"Trip   Plan\""), "trip-plan");
    }

    #[test]
    fn test_sanitize_title_removes_path_characters() {
        assert_eq!(sanitize_title("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_title("a/b\\c:d*e?"), "abcde");
    }

    #[test]
    fn test_sanitize_title_collapses_and_trims_dashes() {
        assert_eq!(sanitize_title("-- budget -- review --"), "budget-review");
        assert_eq!(sanitize_title("_work_log_"), "work_log");
    }

    #[test]
    fn test_sanitize_title_can_be_empty() {
        assert_eq!(sanitize_title(""), "");
        assert_eq!(sanitize_title("  ?!  "), "");
        assert_eq!(sanitize_title("日記"), "");
    }

    #[test]
    fn test_sanitize_title_caps_length() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_title(&long).chars().count(), MAX_TITLE_CHARS);

        let dash_at_cut = format!("{}-b", "a".repeat(MAX_TITLE_CHARS - 1));
        assert_eq!(sanitize_title(&dash_at_cut), "a".repeat(MAX_TITLE_CHARS - 1));
    }

    #[test]
    fn test_timestamp_stem_format() {
        let tz = glib::TimeZone::utc();
        let moment = glib::DateTime::new(&tz, 2024, 1, 31, 23, 59, 58.0).unwrap();
        assert_eq!(timestamp_stem(&moment).unwrap(), "note_20240131_235958");
    }

    #[test]
    fn test_current_timestamp_stem_shape() {
        let stem = current_timestamp_stem().unwrap();
        assert!(stem.starts_with("note_"));
        assert_eq!(stem.len(), "note_YYYYMMDD_HHMMSS".len());
    }

    #[test]
    fn test_candidate_name() {
        assert_eq!(candidate_name("todo", 0), "todo.txt");
        assert_eq!(candidate_name("todo", 1), "todo_1.txt");
        assert_eq!(candidate_name("todo", 12), "todo_12.txt");
    }
}
