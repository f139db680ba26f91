//! Answer formatting: raw AI text in, sanitized display markup out.
//!
//! The input is HTML-escaped first, then passed through an ordered list of
//! block and inline stages that each introduce a fixed set of wrapper tags.

mod code_blocks;
mod escape;
mod formatter;
mod italic;
mod markup;
mod pipeline;
mod raw;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use formatter::Formatter;
pub use markup::FormattedMarkup;
pub use raw::RawText;

use pipeline::Pipeline;

/// Heading level mapping for `#`, `##`, `###` lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `###` -> h3, `##` -> h2, `#` -> h4 (answer panels keep `#` small).
    #[default]
    Legacy,
    /// `###` -> h3, `##` -> h2, `#` -> h1.
    Standard,
}

impl fmt::Display for HeadingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

impl FromStr for HeadingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "standard" => Ok(Self::Standard),
            other => Err(format!(
                "unknown heading style '{}' (expected legacy or standard)",
                other
            )),
        }
    }
}

/// Options that change the produced markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub heading_style: HeadingStyle,
    /// Keep fenced code interiors out of the later passes (no `<br/>`,
    /// bold or list markup inside `pre` blocks).
    pub protect_code_blocks: bool,
}

/// Format one answer. Never fails: absent or empty input yields empty markup.
pub fn format_text<'a>(text: impl Into<RawText<'a>>, options: &FormatOptions) -> FormattedMarkup {
    let raw = text.into();
    run(&Pipeline::new(options), raw.as_str())
}

fn run(pipeline: &Pipeline, text: &str) -> FormattedMarkup {
    if text.is_empty() {
        return FormattedMarkup::default();
    }
    FormattedMarkup::new(pipeline.run(escape::escape_html(text)))
}
