//! # MiniMind answer formatter
//!
//! Turns raw AI-generated answers (lightweight markdown-like text) into
//! sanitized, styled markup that a renderer can inject verbatim.
//!
//! ## Features
//! - HTML escaping before any markup is introduced
//! - Block transforms: code fences, headings, rules, bullet/numbered/definition items
//! - Inline transforms: bold, italic, inline code, large text, formulas
//! - Memoizing [`Formatter`] that can be shared across threads

pub mod core;
pub mod format;

pub use format::{
    FormatOptions, FormattedMarkup, Formatter, HeadingStyle, RawText, format_text,
};
