//! Structure-preserving text shortening.
//!
//! Extracted page bodies are cut down to a fixed character budget before they
//! are handed to the summarizer. The first and last paragraphs usually carry
//! the introduction and the conclusion, so they are kept whenever the budget
//! allows it and middle paragraphs are dropped first.
//!
//! All lengths are counted in `char`s, not bytes.

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const ELLIPSIS_MARKER: &str = "[...]";
const WORD_SUFFIX: &str = "...";

/// Budget charged per paragraph separator, above its real length of two.
const SEPARATOR_BUDGET: usize = 4;
/// Budget charged for the marker together with its separator.
const MARKER_BUDGET: usize = 7;
/// Smallest tail of the last paragraph worth keeping when both ends do not fit.
const MIN_TAIL_CHARS: usize = 20;

/// Shorten `content` to at most `max_chars` characters, keeping the first and
/// last paragraphs where possible.
pub fn truncate(content: &str, max_chars: usize) -> String {
    if content.is_empty() || char_len(content) <= max_chars {
        return content.to_owned();
    }

    let paragraphs: Vec<&str> = content
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match paragraphs.as_slice() {
        [] => truncate_at_word_boundary(content, max_chars, WORD_SUFFIX),
        [only] => truncate_at_word_boundary(only, max_chars, WORD_SUFFIX),
        [first, middle @ .., last] => preserve_structure(first, middle, last, max_chars),
    }
}

/// Cut `text` at the last whitespace that leaves room for `suffix`.
///
/// Falls back to a hard cut when the head contains no whitespace at all.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize, suffix: &str) -> String {
    if char_len(text) <= max_chars {
        return text.to_owned();
    }

    let Some(limit) = max_chars.checked_sub(char_len(suffix)) else {
        return take_chars(text, max_chars).to_owned();
    };
    let head = take_chars(text, limit);
    let cut = match head.rfind(char::is_whitespace) {
        Some(idx) => head[..idx].trim_end(),
        None => head,
    };

    format!("{cut}{suffix}")
}

fn preserve_structure(first: &str, middle: &[&str], last: &str, max_chars: usize) -> String {
    let min_required = char_len(first) + char_len(last) + SEPARATOR_BUDGET;
    if min_required > max_chars {
        return keep_first(first, last, max_chars);
    }

    let mut budget = (max_chars - min_required).saturating_sub(MARKER_BUDGET + SEPARATOR_BUDGET);
    let mut parts = Vec::with_capacity(middle.len() + 3);
    parts.push(first);
    for paragraph in middle {
        let cost = char_len(paragraph) + SEPARATOR_BUDGET;
        if cost > budget {
            break;
        }
        budget -= cost;
        parts.push(*paragraph);
    }

    if parts.len() - 1 < middle.len() {
        parts.extend([ELLIPSIS_MARKER, last]);
        let marked = parts.join(PARAGRAPH_SEPARATOR);
        if char_len(&marked) <= max_chars {
            return marked;
        }
        // no room for the marker itself: only the two ends remain
        parts.truncate(parts.len() - 2);
    }
    parts.push(last);

    parts.join(PARAGRAPH_SEPARATOR)
}

/// Both ends do not fit: the first paragraph wins, followed by a short tail of
/// the last one when at least [`MIN_TAIL_CHARS`] of it would survive.
fn keep_first(first: &str, last: &str, max_chars: usize) -> String {
    let reserved = char_len(first) + 2 * SEPARATOR_BUDGET + MARKER_BUDGET;

    match max_chars.checked_sub(reserved) {
        Some(tail_budget) if tail_budget >= MIN_TAIL_CHARS => {
            let tail = truncate_at_word_boundary(last, tail_budget, WORD_SUFFIX);
            [first, ELLIPSIS_MARKER, tail.as_str()].join(PARAGRAPH_SEPARATOR)
        }
        _ => truncate_at_word_boundary(first, max_chars, WORD_SUFFIX),
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn take_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn paragraphs(parts: &[&str]) -> String {
        parts.join("\n\n")
    }

    #[test]
    fn empty_content_stays_empty() {
        assert_eq!(truncate("", 100), "");
    }

    #[test]
    fn short_content_is_returned_unchanged() {
        let content = "Intro.\n\nBody.\n\nOutro.";
        assert_eq!(truncate(content, content.len()), content);
        assert_eq!(truncate(content, 1_000), content);
    }

    #[test]
    fn single_paragraph_cuts_at_word_boundary() {
        let content = "alpha beta gamma delta epsilon zeta eta theta";
        let out = truncate(content, 20);
        assert_eq!(out, "alpha beta gamma...");
        assert!(out.chars().count() <= 20);
    }

    #[test]
    fn word_boundary_hard_cuts_without_whitespace() {
        let out = truncate_at_word_boundary(&"x".repeat(50), 10, "...");
        assert_eq!(out, format!("{}...", "x".repeat(7)));
    }

    #[test]
    fn budget_below_suffix_hard_cuts_without_suffix() {
        assert_eq!(truncate_at_word_boundary("abcdef", 2, "..."), "ab");
        assert_eq!(truncate("a b c d e f", 0), "");
        assert_eq!(truncate("xy\n\nzw\n\nuv", 1).chars().count(), 1);
    }

    #[test]
    fn word_boundary_counts_chars_not_bytes() {
        let text = "سلام دنیا این یک متن طولانی است";
        let out = truncate_at_word_boundary(text, 12, "...");
        assert!(out.chars().count() <= 12);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn whitespace_only_content_falls_back_to_word_cut() {
        let content = " ".repeat(30);
        let out = truncate(&content, 10);
        assert!(out.chars().count() <= 10);
    }

    #[test]
    fn two_paragraphs_that_fit_are_joined_without_marker() {
        let content = format!("{}\n\n   \n\n{}", "a".repeat(20), "b".repeat(20));
        let out = truncate(&content, 44);
        assert_eq!(out, format!("{}\n\n{}", "a".repeat(20), "b".repeat(20)));
    }

    #[test]
    fn middle_paragraphs_included_greedily_in_order() {
        let first = "F".repeat(30);
        let last = "L".repeat(30);
        let content = paragraphs(&[&first, "m1 short", &"M".repeat(200), "m3 short", &last]);

        let out = truncate(&content, 100);

        assert_eq!(out, paragraphs(&[&first, "m1 short", "[...]", &last]));
        assert!(!out.contains("m3 short"), "no paragraph after the first miss");
        assert!(out.chars().count() <= 100);
    }

    #[test]
    fn all_middles_fit_means_no_marker() {
        let content = paragraphs(&["first", "one", "two", "last", &" ".repeat(50)]);
        let out = truncate(&content, 40);
        assert_eq!(out, paragraphs(&["first", "one", "two", "last"]));
    }

    #[test]
    fn tight_budget_drops_middles_and_marker() {
        let first = "F".repeat(40);
        let last = "L".repeat(40);
        let content = paragraphs(&[&first, &"M".repeat(40), &last]);

        let out = truncate(&content, 85);

        assert_eq!(out, paragraphs(&[&first, &last]));
    }

    #[test]
    fn marker_stands_in_for_middles_that_do_not_fit() {
        let first = "F".repeat(20);
        let last = "L".repeat(20);
        let content = paragraphs(&[&first, &"M".repeat(100), &last]);

        let out = truncate(&content, 60);

        assert_eq!(out, paragraphs(&[&first, "[...]", &last]));
    }

    #[test]
    fn narrow_budget_keeps_only_first_paragraph() {
        let content = paragraphs(&[&"A".repeat(50), &"B".repeat(50), &"C".repeat(50)]);
        let out = truncate(&content, 60);
        assert_eq!(out, "A".repeat(50));
    }

    #[test]
    fn narrow_budget_adds_tail_of_last_when_room() {
        let first = "intro words here";
        let last = "the final paragraph has plenty of words to cut down";
        let content = paragraphs(&[first, &"m ".repeat(40), last]);

        let out = truncate(&content, 60);

        assert!(out.starts_with("intro words here\n\n[...]\n\nthe final"));
        assert!(out.ends_with("..."));
        assert!(out.chars().count() <= 60);
    }

    #[test]
    fn oversized_first_paragraph_is_cut_to_budget() {
        let content = paragraphs(&[&"word ".repeat(100), "tail"]);
        let out = truncate(&content, 50);
        assert!(out.chars().count() <= 50);
        assert!(out.starts_with("word word"));
    }

    fn paragraph_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z]{1,12}( [a-zA-Z]{1,12}){0,40}"
    }

    proptest! {
        #[test]
        fn prop_no_op_when_within_budget(content in ".{0,300}", extra in 0usize..100) {
            let max = content.chars().count() + extra;
            prop_assert_eq!(truncate(&content, max.max(1)), content);
        }

        #[test]
        fn prop_output_respects_budget(
            parts in prop::collection::vec(paragraph_strategy(), 1..12),
            max in 200usize..2_000,
        ) {
            let content = parts.join("\n\n");
            let out = truncate(&content, max);
            prop_assert!(out.chars().count() <= max);
        }

        #[test]
        fn prop_endpoints_preserved_when_they_fit(
            parts in prop::collection::vec(paragraph_strategy(), 4..10),
            slack in 0usize..400,
        ) {
            let first = &parts[0];
            let last = &parts[parts.len() - 1];
            let max = first.chars().count() + last.chars().count() + 4 + slack;
            let out = truncate(&parts.join("\n\n"), max);
            prop_assert!(out.starts_with(first.as_str()));
            prop_assert!(out.ends_with(last.as_str()));
        }
    }
}
