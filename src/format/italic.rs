//! Italic `*text*` pass.
//!
//! Equivalent to the pattern `(^|[\s(])\*(?!\s)(.+?)\*(?=[,\s).!?]|$)` applied
//! globally without multi-line anchors. The `regex` crate has no look-around,
//! so this is a scanner: closing positions are precomputed right to left,
//! which keeps the pass linear in the input length.

use std::borrow::Cow;

const OPEN_TAG: &str = r#"<em class="tilt-text">"#;
const CLOSE_TAG: &str = "</em>";

// Same set as `JS_SPACE` in the pipeline patterns.
fn is_space(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => c.is_whitespace(),
    }
}

fn is_opening_prefix(c: char) -> bool {
    is_space(c) || c == '('
}

fn is_closing_follower(c: char) -> bool {
    is_space(c) || matches!(c, ',' | ')' | '.' | '!' | '?')
}

// Span content stops at line terminators, like `.` in the other passes.
fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Replace every `*text*` span with a tilted emphasis element.
pub(crate) fn apply_italic(s: &str) -> Cow<'_, str> {
    if !s.contains('*') {
        return Cow::Borrowed(s);
    }
    let chars: Vec<char> = s.chars().collect();
    let mut offsets: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    offsets.push(s.len());
    let n = chars.len();

    // next_close[j]: first star at or after j that may close a span.
    // next_newline[j]: first line break at or after j. Both use n for "none".
    let mut next_close = vec![n; n + 1];
    let mut next_newline = vec![n; n + 1];
    for j in (0..n).rev() {
        next_close[j] = next_close[j + 1];
        next_newline[j] = next_newline[j + 1];
        if chars[j] == '*' && (j + 1 == n || is_closing_follower(chars[j + 1])) {
            next_close[j] = j;
        }
        if is_line_break(chars[j]) {
            next_newline[j] = j;
        }
    }

    // Closing star for a span opened by the star at `open`, if any.
    let close_for = |open: usize| -> Option<usize> {
        if chars.get(open) != Some(&'*') {
            return None;
        }
        let first = *chars.get(open + 1)?;
        if is_space(first) || open + 2 > n {
            return None;
        }
        let close = next_close[open + 2];
        (close < n && close < next_newline[open + 1]).then_some(close)
    };

    let mut out = String::with_capacity(s.len() + 32);
    let mut matched = false;
    let mut copied = 0;
    let mut i = 0;
    while i < n {
        let mut found = None;
        if i == 0 {
            found = close_for(0).map(|close| (0, close));
        }
        if found.is_none() && is_opening_prefix(chars[i]) {
            found = close_for(i + 1).map(|close| (i + 1, close));
        }
        match found {
            Some((open, close)) => {
                out.push_str(&s[offsets[copied]..offsets[open]]);
                out.push_str(OPEN_TAG);
                out.push_str(&s[offsets[open + 1]..offsets[close]]);
                out.push_str(CLOSE_TAG);
                i = close + 1;
                copied = i;
                matched = true;
            }
            None => i += 1,
        }
    }
    if !matched {
        return Cow::Borrowed(s);
    }
    out.push_str(&s[offsets[copied]..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::apply_italic;

    #[test]
    fn italic_at_start() {
        assert_eq!(apply_italic("*italic*"), r#"<em class="tilt-text">italic</em>"#);
    }

    #[test]
    fn italic_after_space_keeps_prefix() {
        assert_eq!(
            apply_italic("and *this* too"),
            r#"and <em class="tilt-text">this</em> too"#
        );
    }

    #[test]
    fn italic_inside_parens() {
        assert_eq!(
            apply_italic("(*aside*)"),
            r#"(<em class="tilt-text">aside</em>)"#
        );
    }

    #[test]
    fn star_followed_by_space_is_not_italic() {
        assert_eq!(apply_italic("* item*"), "* item*");
    }

    #[test]
    fn star_inside_word_is_not_opening() {
        assert_eq!(apply_italic("a*b* c"), "a*b* c");
    }

    #[test]
    fn closing_needs_punctuation_or_space() {
        assert_eq!(apply_italic("*a*b"), "*a*b");
        assert_eq!(
            apply_italic("*a*b*, c"),
            r#"<em class="tilt-text">a*b</em>, c"#
        );
    }

    #[test]
    fn does_not_cross_newline() {
        assert_eq!(apply_italic("*a\nb*"), "*a\nb*");
        assert_eq!(apply_italic("*a\r\nb*"), "*a\r\nb*");
    }

    #[test]
    fn adjacent_spans_share_separator() {
        assert_eq!(
            apply_italic("*a* *b*"),
            r#"<em class="tilt-text">a</em> <em class="tilt-text">b</em>"#
        );
    }

    #[test]
    fn multibyte_content() {
        assert_eq!(
            apply_italic(" *héllo*!"),
            r#" <em class="tilt-text">héllo</em>!"#
        );
    }

    #[test]
    fn byte_order_mark_is_a_separator() {
        assert_eq!(
            apply_italic("\u{feff}*a*\u{feff}"),
            "\u{feff}<em class=\"tilt-text\">a</em>\u{feff}"
        );
        assert_eq!(apply_italic("*\u{feff}a*"), "*\u{feff}a*");
        assert_eq!(apply_italic("\u{85}*a*"), "\u{85}*a*");
    }

    #[test]
    fn long_run_of_stars_terminates() {
        let input = " *".repeat(50_000);
        assert_eq!(apply_italic(&input), input);
    }
}
