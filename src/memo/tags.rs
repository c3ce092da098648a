//! Inline tag extraction
//!
//! Best-effort `#tag` scan used to seed a memo's payload on create and
//! update. The markdown analyzer may later rebuild a more accurate payload.

use super::MemoPayload;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// `#` at start of text or after ASCII whitespace, a letter, then anything
/// but ASCII whitespace or `#`. Vertical tab and Unicode spaces such as
/// U+3000 are ordinary characters here.
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\t\n\f\r ])#([A-Za-z][^\t\n\f\r #]*)").unwrap());

/// Extract tags in order of first appearance, case-sensitive, deduplicated
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for caps in TAG_PATTERN.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            let tag = m.as_str();
            if seen.insert(tag) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

/// Payload carrying the tags found in `content`, `None` when there are none
pub fn build_payload(content: &str) -> Option<MemoPayload> {
    let tags = extract_tags(content);
    if tags.is_empty() {
        return None;
    }
    Some(MemoPayload {
        tags,
        property: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_mixed_tags() {
        let tags = extract_tags("hello #world, #Go-lang #a1");
        assert_eq!(tags, vec!["world,", "Go-lang", "a1"]);
    }

    #[test]
    fn test_extract_plain_tags() {
        let tags = extract_tags("hello #world #Go-lang #a1");
        assert_eq!(tags, vec!["world", "Go-lang", "a1"]);
    }

    #[test]
    fn test_bare_hash_and_digit_first_do_not_match() {
        assert!(extract_tags("# heading").is_empty());
        assert!(extract_tags("#").is_empty());
        assert!(extract_tags("issue #1abc").is_empty());
    }

    #[test]
    fn test_hash_inside_word_does_not_match() {
        assert!(extract_tags("foo#bar").is_empty());
        assert!(extract_tags("https://example.com/#anchor").is_empty());
    }

    #[test]
    fn test_tag_stops_at_next_hash() {
        assert_eq!(extract_tags("#one#two"), vec!["one"]);
    }

    #[test]
    fn test_start_of_text_and_newline() {
        assert_eq!(extract_tags("#todo\n#later"), vec!["todo", "later"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let tags = extract_tags("#Work #work #Work");
        assert_eq!(tags, vec!["Work", "work"]);
    }

    #[test]
    fn test_adjacent_tags_separated_by_single_space() {
        assert_eq!(extract_tags("#a #b #c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unicode_space_is_not_a_separator() {
        assert!(extract_tags("メモ\u{3000}#tag").is_empty());
        assert!(extract_tags("a\u{a0}#nbsp").is_empty());
        assert!(extract_tags("x\u{b}#vt").is_empty());
        assert_eq!(extract_tags("#tag\u{3000}続き"), vec!["tag\u{3000}続き"]);
        assert_eq!(extract_tags("#tag\u{a0}more #next"), vec!["tag\u{a0}more", "next"]);
    }

    #[test]
    fn test_ascii_whitespace_separates() {
        assert_eq!(extract_tags("a\t#tab\r#cr\x0c#ff"), vec!["tab", "cr", "ff"]);
    }

    #[test]
    fn test_build_payload_none_without_tags() {
        assert!(build_payload("no tags here").is_none());
        let payload = build_payload("buy milk #groceries").unwrap();
        assert_eq!(payload.tags, vec!["groceries"]);
        assert!(payload.property.is_none());
    }
}
