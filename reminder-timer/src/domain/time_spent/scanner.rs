//! Regex lookups over notes text. Every range handed out is a byte range on
//! char boundaries, ready for splicing.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use super::TIME_SPENT_TAG;

// ASCII digits only; `\d` would also match other Unicode digits.
static HOURS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*h").expect("hours pattern is valid"));
static MINUTES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*m").expect("minutes pattern is valid"));
static SECONDS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*s").expect("seconds pattern is valid"));
static CANONICAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time_spent:\s*([0-9]+)h\s*([0-9]+)m\s*([0-9]+)s")
        .expect("canonical pattern is valid")
});
static COMPONENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*[0-9]+\s*[hms]").expect("component pattern is valid"));

fn unit_pattern(unit: char) -> Option<&'static Regex> {
    match unit {
        'h' => Some(&HOURS_PATTERN),
        'm' => Some(&MINUTES_PATTERN),
        's' => Some(&SECONDS_PATTERN),
        _ => None,
    }
}

/// Value of the first integer in `text` followed (after optional whitespace)
/// by `unit`. A number too large for `u64` reads as 0.
pub(super) fn find_unit(text: &str, unit: char) -> Option<u64> {
    let captures = unit_pattern(unit)?.captures(text)?;
    Some(captures[1].parse().unwrap_or(0))
}

/// Span of the first canonical annotation anywhere in `text`.
pub(super) fn canonical_span(text: &str) -> Option<Range<usize>> {
    CANONICAL_PATTERN.find(text).map(|m| m.range())
}

/// Span of a non-canonical annotation starting at `tag_start`: the tag plus
/// every directly following `<int><unit>` component, in any order.
///
/// A unit letter that starts a word (`2 hours`) is not a component. With no
/// component after the tag the span is the bare tag.
pub(super) fn loose_span(text: &str, tag_start: usize) -> Range<usize> {
    let mut end = tag_start + TIME_SPENT_TAG.len();

    while let Some(component) = COMPONENT_PATTERN.find(&text[end..]) {
        let after = end + component.end();
        if text[after..].chars().next().is_some_and(char::is_alphabetic) {
            break;
        }
        end = after;
    }

    tag_start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_unit_skips_runs_with_other_units() {
        assert_eq!(find_unit(" 1h 20m 30s", 'h'), Some(1));
        assert_eq!(find_unit(" 1h 20m 30s", 'm'), Some(20));
        assert_eq!(find_unit(" 1h 20m 30s", 's'), Some(30));
    }

    #[test]
    fn find_unit_allows_whitespace_before_unit() {
        assert_eq!(find_unit("12 h", 'h'), Some(12));
        assert_eq!(find_unit("12\u{a0}m", 'm'), Some(12));
    }

    #[test]
    fn find_unit_misses() {
        assert_eq!(find_unit("", 'h'), None);
        assert_eq!(find_unit("no digits here", 's'), None);
        assert_eq!(find_unit("12x 7", 'h'), None);
        assert_eq!(find_unit("1h", 'x'), None);
    }

    #[test]
    fn find_unit_handles_multibyte_text() {
        assert_eq!(find_unit("Fällig ü 4 s", 's'), Some(4));
    }

    #[test]
    fn find_unit_ignores_non_ascii_digits() {
        assert_eq!(find_unit("٣h 2h", 'h'), Some(2));
    }

    #[test]
    fn find_unit_overflow_reads_as_zero() {
        assert_eq!(find_unit("99999999999999999999999h", 'h'), Some(0));
    }

    #[test]
    fn canonical_span_covers_tag_and_components() {
        let text = "A\ntime_spent: 1h 0m 0s\nB";
        let span = canonical_span(text).unwrap();
        assert_eq!(&text[span], "time_spent: 1h 0m 0s");
    }

    #[test]
    fn canonical_span_accepts_compact_spacing() {
        let text = "time_spent:1h2m3s tail";
        let span = canonical_span(text).unwrap();
        assert_eq!(&text[span], "time_spent:1h2m3s");
    }

    #[test]
    fn canonical_span_skips_malformed_first_tag() {
        let text = "time_spent: soon\ntime_spent: 2h 0m 1s";
        let span = canonical_span(text).unwrap();
        assert_eq!(span.start, 17);
        assert_eq!(&text[span], "time_spent: 2h 0m 1s");
    }

    #[test]
    fn canonical_span_requires_order() {
        assert!(canonical_span("time_spent: 5s 1h 0m").is_none());
        assert!(canonical_span("time_spent: 90m").is_none());
    }

    #[test]
    fn loose_span_takes_components_in_any_order() {
        let text = "time_spent: 90m 5s\nnext";
        let span = loose_span(text, 0);
        assert_eq!(&text[span], "time_spent: 90m 5s");
    }

    #[test]
    fn loose_span_accepts_adjacent_components() {
        let text = "time_spent: 90m5s, more";
        let span = loose_span(text, 0);
        assert_eq!(&text[span], "time_spent: 90m5s");
    }

    #[test]
    fn loose_span_is_bare_tag_without_components() {
        let text = "x time_spent: later";
        let span = loose_span(text, 2);
        assert_eq!(&text[span], "time_spent:");
    }

    #[test]
    fn loose_span_stops_before_words_starting_with_a_unit() {
        let text = "time_spent: 2 hours";
        assert_eq!(&text[loose_span(text, 0)], "time_spent:");

        let text = "time_spent: 1h 5 sessions";
        assert_eq!(&text[loose_span(text, 0)], "time_spent: 1h");
    }
}
