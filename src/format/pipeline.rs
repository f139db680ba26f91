//! Ordered formatting stages applied to escaped text.
//!
//! Each stage is a pure `&str -> Cow<str>` pass. Order matters: block rules
//! run before inline rules, and lines wrapped by an earlier block rule start
//! with `<` so later line-anchored rules no longer match them.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::code_blocks;
use super::italic::apply_italic;
use super::{FormatOptions, HeadingStyle};

/// ECMAScript whitespace. Unicode `White_Space` adds U+0085 and lacks U+FEFF.
const JS_SPACE: &str =
    r"[\t\n\x0B\x0C\r \xA0\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]";

/// Compile a built-in pattern; `\s` in it means [`JS_SPACE`].
fn compile(pattern: &str) -> Regex {
    Regex::new(&pattern.replace(r"\s", JS_SPACE))
        .expect("built-in formatting pattern must compile")
}

// `R` (CRLF mode) keeps `.` and `$` from treating '\r' as line content.
static HEADING_3: LazyLock<Regex> = LazyLock::new(|| compile(r"(?mR)^###\s+(.*)$"));
static HEADING_2: LazyLock<Regex> = LazyLock::new(|| compile(r"(?mR)^##\s+(.*)$"));
static HEADING_1: LazyLock<Regex> = LazyLock::new(|| compile(r"(?mR)^#\s+(.*)$"));
static RULE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?mR)^---$"));
static BULLET: LazyLock<Regex> = LazyLock::new(|| compile(r"(?mR)^[-*•]\s+(.*)$"));
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| compile(r"(?mR)^([0-9]+)\.\s+(.*)$"));
// A line also starts right after '\r', even inside "\r\n", so the leading
// `\s*` may consume that '\n'. The '\r' itself is put back.
static DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?mR)(^|\r)\s*([A-Za-z][^:\n]*?):\s+(.*)$"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"(?R)\*\*(.*?)\*\*"));
static BOLD_ALT: LazyLock<Regex> = LazyLock::new(|| compile(r"__([^_]+?)__"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| compile(r"`([^`]+)`"));
static LARGE_TEXT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?R)\^\^(.+?)\^\^"));
static FORMULA_BLOCK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)\\\[(.*?)\\\]"));
static FORMULA_INLINE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?R)\\\((.*?)\\\)"));
static FORMULA_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\[([0-9A-Za-z_\s+\-*/=^().,]+)\]"));
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| compile(r"\n\n+"));
static BREAK_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"(<br/>){3,}"));

/// Apply `(regex, replacement)` pairs in order, allocating only when one matches.
fn replace_in_order<'a>(s: &'a str, rules: &[(&Regex, &str)]) -> Cow<'a, str> {
    let mut current = Cow::Borrowed(s);
    for (re, replacement) in rules {
        let next = match re.replace_all(&current, *replacement) {
            Cow::Owned(text) => Some(text),
            Cow::Borrowed(_) => None,
        };
        if let Some(text) = next {
            current = Cow::Owned(text);
        }
    }
    current
}

fn headings_legacy(s: &str) -> Cow<'_, str> {
    replace_in_order(
        s,
        &[
            (&*HEADING_3, r#"<h3 class="section-header">${1}</h3>"#),
            (&*HEADING_2, r#"<h2 class="section-header">${1}</h2>"#),
            // single '#' renders one level below '###' in answer panels
            (&*HEADING_1, r#"<h4 class="section-header">${1}</h4>"#),
        ],
    )
}

fn headings_standard(s: &str) -> Cow<'_, str> {
    replace_in_order(
        s,
        &[
            (&*HEADING_3, r#"<h3 class="section-header">${1}</h3>"#),
            (&*HEADING_2, r#"<h2 class="section-header">${1}</h2>"#),
            (&*HEADING_1, r#"<h1 class="section-header">${1}</h1>"#),
        ],
    )
}

fn horizontal_rules(s: &str) -> Cow<'_, str> {
    RULE.replace_all(s, r#"<hr class="divider" />"#)
}

fn bullet_items(s: &str) -> Cow<'_, str> {
    BULLET.replace_all(
        s,
        r#"<div class="bullet-item"><span class="bullet">•</span><span class="content">${1}</span></div>"#,
    )
}

fn numbered_items(s: &str) -> Cow<'_, str> {
    NUMBERED.replace_all(
        s,
        r#"<div class="numbered-item"><span class="number">${1}.</span><span class="content">${2}</span></div>"#,
    )
}

fn definition_items(s: &str) -> Cow<'_, str> {
    DEFINITION.replace_all(
        s,
        r#"${1}<div class="definition-item"><strong class="definition-term">${2}:</strong> <span class="definition-content">${3}</span></div>"#,
    )
}

fn bold(s: &str) -> Cow<'_, str> {
    BOLD.replace_all(s, r#"<strong class="highlight-text theme-bold">${1}</strong>"#)
}

fn bold_alt(s: &str) -> Cow<'_, str> {
    BOLD_ALT.replace_all(s, r#"<strong class="highlight-bg">${1}</strong>"#)
}

fn inline_code(s: &str) -> Cow<'_, str> {
    INLINE_CODE.replace_all(s, r#"<code class="inline-code">${1}</code>"#)
}

fn large_text(s: &str) -> Cow<'_, str> {
    LARGE_TEXT.replace_all(s, r#"<span class="large-text">${1}</span>"#)
}

// Delimited forms first so the generic bracket rule cannot capture them.
fn formulas(s: &str) -> Cow<'_, str> {
    replace_in_order(
        s,
        &[
            (&*FORMULA_BLOCK, r#"<div class="formula-block">${1}</div>"#),
            (&*FORMULA_INLINE, r#"<span class="formula-inline">${1}</span>"#),
            (&*FORMULA_BRACKET, r#"<span class="formula-inline">${1}</span>"#),
        ],
    )
}

fn line_breaks(s: &str) -> Cow<'_, str> {
    if !s.contains('\n') {
        return Cow::Borrowed(s);
    }
    let text = PARAGRAPH_BREAK.replace_all(s, "<br/><br/>");
    let text = text.replace('\n', "<br/>");
    Cow::Owned(BREAK_RUN.replace_all(&text, "<br/><br/>").into_owned())
}

/// A named, pure transformation step.
#[derive(Clone, Copy)]
pub(crate) struct Stage {
    pub(crate) name: &'static str,
    apply: for<'a> fn(&'a str) -> Cow<'a, str>,
}

impl Stage {
    const fn new(name: &'static str, apply: for<'a> fn(&'a str) -> Cow<'a, str>) -> Self {
        Stage { name, apply }
    }

    pub(crate) fn apply<'a>(&self, s: &'a str) -> Cow<'a, str> {
        (self.apply)(s)
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Stage").field(&self.name).finish()
    }
}

/// The stages that follow code-block handling, in application order.
fn stages_after_code(heading_style: HeadingStyle) -> Vec<Stage> {
    let headings = match heading_style {
        HeadingStyle::Legacy => Stage::new("headings", headings_legacy),
        HeadingStyle::Standard => Stage::new("headings", headings_standard),
    };
    vec![
        headings,
        Stage::new("horizontal_rules", horizontal_rules),
        Stage::new("bullet_items", bullet_items),
        Stage::new("numbered_items", numbered_items),
        Stage::new("definition_items", definition_items),
        Stage::new("bold", bold),
        Stage::new("bold_alt", bold_alt),
        Stage::new("italic", apply_italic),
        Stage::new("inline_code", inline_code),
        Stage::new("large_text", large_text),
        Stage::new("formulas", formulas),
        Stage::new("line_breaks", line_breaks),
    ]
}

/// Ordered list of stages for one set of options.
#[derive(Debug, Clone)]
pub(crate) struct Pipeline {
    stages: Vec<Stage>,
    protect_code_blocks: bool,
}

impl Pipeline {
    pub(crate) fn new(options: &FormatOptions) -> Self {
        let mut stages = Vec::with_capacity(13);
        if !options.protect_code_blocks {
            stages.push(Stage::new("code_blocks", code_blocks::wrap_code_blocks));
        }
        stages.extend(stages_after_code(options.heading_style));
        Pipeline {
            stages,
            protect_code_blocks: options.protect_code_blocks,
        }
    }

    pub(crate) fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.name)
    }

    /// Run every stage over already-escaped text.
    pub(crate) fn run(&self, escaped: String) -> String {
        if self.protect_code_blocks {
            let (text, blocks) = code_blocks::stash(&escaped);
            if !blocks.is_empty() {
                log::trace!("stashed {} code block(s)", blocks.len());
            }
            let text = self.run_stages(text);
            return code_blocks::restore(&text, &blocks);
        }
        self.run_stages(escaped)
    }

    fn run_stages(&self, mut text: String) -> String {
        for stage in &self.stages {
            let next = match stage.apply(&text) {
                Cow::Owned(rewritten) => Some(rewritten),
                Cow::Borrowed(_) => None,
            };
            if let Some(rewritten) = next {
                log::trace!("stage {} rewrote text ({} bytes)", stage.name, rewritten.len());
                text = rewritten;
            }
        }
        text
    }
}
