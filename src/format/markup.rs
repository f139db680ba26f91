//! Sanitized markup: output of the formatter, safe to inject verbatim.

use std::fmt;

use serde::Serialize;

use super::escape::escape_html;

/// Markup produced by the formatter. Only this crate can construct one, so a
/// renderer taking `FormattedMarkup` cannot be handed unsanitized text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FormattedMarkup(String);

impl FormattedMarkup {
    pub(crate) fn new(markup: String) -> Self {
        FormattedMarkup(markup)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Wrap in the answer container: `<div class="formatted-text {class}">…</div>`.
    /// The class name is escaped; an empty name leaves just `formatted-text`.
    pub fn into_container(self, class_name: &str) -> FormattedMarkup {
        let class_name = class_name.trim();
        let classes = if class_name.is_empty() {
            "formatted-text".to_string()
        } else {
            format!("formatted-text {}", escape_html(class_name))
        };
        FormattedMarkup(format!(r#"<div class="{}">{}</div>"#, classes, self.0))
    }
}

impl fmt::Display for FormattedMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FormattedMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
