use std::borrow::Cow;
use std::fmt;

/// Texts longer than this many characters are abbreviated in debug output.
pub(crate) const SUMMARY_THRESHOLD: usize = 63;

/// Leading characters kept by an abbreviated text.
pub(crate) const SUMMARY_HEAD: usize = 45;

/// Trailing characters kept by an abbreviated text.
pub(crate) const SUMMARY_TAIL: usize = 12;

pub(crate) const ELLIPSIS: &str = "...";

/// Abbreviate `text` to head + `...` + tail once it passes the threshold.
///
/// Counts characters, not bytes, so the cut never lands inside a
/// multi-byte sequence.
pub(crate) fn summarize(text: &str) -> Cow<'_, str> {
    let count = text.chars().count();
    if count <= SUMMARY_THRESHOLD {
        return Cow::Borrowed(text);
    }

    let head_end = byte_offset(text, SUMMARY_HEAD);
    let tail_start = byte_offset(text, count - SUMMARY_TAIL);
    Cow::Owned(format!(
        "{}{ELLIPSIS}{}",
        &text[..head_end],
        &text[tail_start..]
    ))
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Renders a byte buffer as its length so raw body bytes never reach logs.
pub(crate) struct ByteLen(pub(crate) usize);

impl fmt::Debug for ByteLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} bytes>", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_borrowed() {
        let text = "a".repeat(SUMMARY_THRESHOLD);
        assert!(matches!(summarize(&text), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn long_text_keeps_head_and_tail() {
        let text: String = ('a'..='z').cycle().take(64).collect();
        let summary = summarize(&text);
        let expected = format!("{}...{}", &text[..45], &text[52..]);
        assert_eq!(summary, expected);
        assert_eq!(summary.chars().count(), SUMMARY_HEAD + ELLIPSIS.len() + SUMMARY_TAIL);
    }

    #[test]
    fn cuts_on_char_boundaries() {
        let text = "é".repeat(100);
        let summary = summarize(&text);
        assert_eq!(summary, format!("{}...{}", "é".repeat(45), "é".repeat(12)));
    }

    #[test]
    fn byte_len_hides_content() {
        assert_eq!(format!("{:?}", ByteLen(7)), "<7 bytes>");
    }
}
