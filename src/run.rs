//! Application run modes: logger init, config resolution, formatting.

use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{Map, Value};

use minimind_format::core::config::{self, Config, ConfigError};
use minimind_format::{FormattedMarkup, Formatter, RawText};

use crate::cli::Args;

/// Initialize env_logger on stderr so stdout carries only markup.
pub fn init_logger(args: &Args) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .target(env_logger::Target::Stderr)
    .try_init();
}

/// Load file/env configuration and apply command-line overrides on top.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = config::load()?;
    if let Some(style) = args.heading_style {
        config.heading_style = style;
    }
    if args.protect_code {
        config.protect_code_blocks = true;
    }
    if let Some(max) = args.max_bytes {
        config.max_input_bytes = max;
    }
    if let Some(class) = &args.class {
        config.class_name = Some(class.clone());
    }
    Ok(config)
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Cut `s` to at most `max` bytes on a char boundary. Returns true if it was cut.
fn truncate_to_boundary(s: &mut String, max: usize) -> bool {
    if s.len() <= max {
        return false;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
    true
}

/// Coerce one answer and apply the input cap to its text.
fn capped_text(value: &Value, max: usize) -> String {
    let mut text = RawText::from(value).as_str().to_string();
    let len = text.len();
    if truncate_to_boundary(&mut text, max) {
        log::warn!(
            "Answer of {} bytes truncated to {} bytes (max_input_bytes)",
            len,
            text.len()
        );
    }
    text
}

fn finish(markup: FormattedMarkup, config: &Config) -> FormattedMarkup {
    match config.class_name.as_deref() {
        Some(class) => markup.into_container(class),
        None => markup,
    }
}

/// Format a JSON array or object of answers (one per mode panel).
fn format_panels(value: &Value, formatter: &Formatter, config: &Config) -> Value {
    let coerce = |v: &Value| capped_text(v, config.max_input_bytes);
    let formatted = |texts: &[String]| -> Vec<Value> {
        formatter
            .format_panels(texts)
            .into_iter()
            .map(|m| Value::String(finish(m, config).into_string()))
            .collect()
    };
    match value {
        Value::Array(items) => {
            let texts: Vec<String> = items.iter().map(coerce).collect();
            Value::Array(formatted(&texts))
        }
        Value::Object(entries) => {
            let texts: Vec<String> = entries.values().map(coerce).collect();
            let out: Map<String, Value> = entries.keys().cloned().zip(formatted(&texts)).collect();
            Value::Object(out)
        }
        single => Value::String(finish(formatter.format(coerce(single)), config).into_string()),
    }
}

/// Run the default mode: read one answer, format it, print to stdout.
///
/// Plain input is capped before formatting. JSON input is parsed whole and
/// the cap applies to each coerced answer, so the document stays valid.
pub fn run_format(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = read_input(args.input.as_deref())?;
    let formatter = config.formatter();

    let mut stdout = io::stdout().lock();
    if args.json_input {
        let value: Value = serde_json::from_str(&input)?;
        if args.panels {
            let markup = format_panels(&value, &formatter, config);
            if args.json {
                writeln!(stdout, "{}", serde_json::json!({ "markup": markup }))?;
            } else {
                match markup {
                    Value::String(markup) => writeln!(stdout, "{}", markup)?,
                    other => writeln!(stdout, "{}", serde_json::to_string_pretty(&other)?)?,
                }
            }
        } else {
            let text = capped_text(&value, config.max_input_bytes);
            write_markup(&mut stdout, finish(formatter.format(text), config), args.json)?;
        }
    } else {
        if truncate_to_boundary(&mut input, config.max_input_bytes) {
            log::warn!(
                "Input truncated to {} bytes (max_input_bytes)",
                input.len()
            );
        }
        write_markup(&mut stdout, finish(formatter.format(input.as_str()), config), args.json)?;
    }
    log::info!("Formatted {} input byte(s)", input.len());
    stdout.flush()?;
    Ok(())
}

fn write_markup(
    out: &mut impl Write,
    markup: FormattedMarkup,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        writeln!(out, "{}", serde_json::json!({ "markup": markup }))?;
    } else {
        writeln!(out, "{}", markup)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncate_keeps_short_input() {
        let mut s = "abc".to_string();
        assert!(!truncate_to_boundary(&mut s, 10));
        assert_eq!(s, "abc");
    }

    #[test]
    fn truncate_respects_char_boundary() {
        let mut s = "a•b".to_string();
        assert!(truncate_to_boundary(&mut s, 2));
        assert_eq!(s, "a");
    }

    #[test]
    fn capped_text_truncates_each_answer() {
        assert_eq!(capped_text(&json!("abcdef"), 3), "abc");
        assert_eq!(capped_text(&json!(["ab", "cd"]), 4), "ab,c");
        assert_eq!(capped_text(&Value::Null, 0), "");
    }

    #[test]
    fn panels_cap_every_answer() {
        let config = Config {
            max_input_bytes: 2,
            ..Config::default()
        };
        let formatter = config.formatter();
        let out = format_panels(&json!(["abcd", "xyz"]), &formatter, &config);
        assert_eq!(out, json!(["ab", "xy"]));
    }

    #[test]
    fn panels_array_keeps_order() {
        let config = Config::default();
        let formatter = config.formatter();
        let out = format_panels(&json!(["**a**", null, 3]), &formatter, &config);
        assert_eq!(
            out,
            json!([
                r#"<strong class="highlight-text theme-bold">a</strong>"#,
                "",
                "3"
            ])
        );
    }

    #[test]
    fn panels_object_keeps_keys() {
        let config = Config {
            class_name: Some("story".to_string()),
            ..Config::default()
        };
        let formatter = config.formatter();
        let out = format_panels(&json!({"story": "Once"}), &formatter, &config);
        assert_eq!(
            out,
            json!({"story": r#"<div class="formatted-text story">Once</div>"#})
        );
    }
}
