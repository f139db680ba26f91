//! Fenced code blocks: the default wrapping pass, plus stash/restore used
//! when code interiors must be shielded from the later passes.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid fence regex"));

// Escaped text never contains '<', so a slot cannot collide with input.
static SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<pre-(\d+)>").expect("valid slot regex"));

fn wrap(code: &str) -> String {
    format!(r#"<pre class="code-block"><code>{}</code></pre>"#, code)
}

/// Wrap every fenced region in `pre/code`, leaving its escaped content in place.
pub(crate) fn wrap_code_blocks(s: &str) -> Cow<'_, str> {
    FENCE.replace_all(s, |caps: &Captures| wrap(&caps[1]))
}

/// Fenced regions pulled out of the text, indexed by slot number.
#[derive(Debug, Default)]
pub(crate) struct StashedBlocks(Vec<String>);

impl StashedBlocks {
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Replace fenced regions with slot markers and keep their content aside.
pub(crate) fn stash(s: &str) -> (String, StashedBlocks) {
    let mut blocks = Vec::new();
    let text = FENCE
        .replace_all(s, |caps: &Captures| {
            blocks.push(caps[1].to_string());
            format!("<pre-{}>", blocks.len() - 1)
        })
        .into_owned();
    (text, StashedBlocks(blocks))
}

/// Put stashed regions back as `pre/code` blocks.
pub(crate) fn restore(s: &str, blocks: &StashedBlocks) -> String {
    if blocks.is_empty() {
        return s.to_string();
    }
    SLOT.replace_all(s, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|i| blocks.0.get(i))
            .map(|code| wrap(code))
            .unwrap_or_default()
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_multiline_fence() {
        assert_eq!(
            wrap_code_blocks("a ```let x\ny``` b"),
            r#"a <pre class="code-block"><code>let x
y</code></pre> b"#
        );
    }

    #[test]
    fn unclosed_fence_is_left_alone() {
        assert_eq!(wrap_code_blocks("```open"), "```open");
    }

    #[test]
    fn stash_then_restore() {
        let (text, blocks) = stash("x ```one``` y ```two```");
        assert_eq!(text, "x <pre-0> y <pre-1>");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            restore(&text, &blocks),
            r#"x <pre class="code-block"><code>one</code></pre> y <pre class="code-block"><code>two</code></pre>"#
        );
    }
}
