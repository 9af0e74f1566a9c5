//! Tolerant recovery of the `{"files": {...}}` envelope from model output.
//!
//! Models wrap JSON in prose, fence it in markdown, or drop the outer
//! object entirely. Each [`Strategy`] relaxes the previous one; the first to
//! produce a complete bundle wins and the error page is the last resort.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::bundle::{FileBundle, FILE_NAMES, INDEX_HTML, SCRIPT_JS, STYLE_CSS};

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").expect("code fence pattern is valid"));

/// One way of reading a files object out of raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The whole text is the JSON document.
    Direct,
    /// Markdown fences removed; bare files maps get wrapped.
    Unfenced,
    /// Greedy span from the first `{` to the last `}`.
    BraceSpan,
}

type StrategyFn = fn(&str) -> Option<FileBundle>;

const STRATEGIES: [(Strategy, StrategyFn); 3] = [
    (Strategy::Direct, parse_direct),
    (Strategy::Unfenced, parse_unfenced),
    (Strategy::BraceSpan, parse_brace_span),
];

/// Where an extracted bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Parsed(Strategy),
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub bundle: FileBundle,
    pub source: ExtractionSource,
}

impl Extraction {
    pub fn is_fallback(&self) -> bool {
        self.source == ExtractionSource::Fallback
    }
}

/// Recover a [`FileBundle`] from model output. Never fails.
pub fn extract_files(text: &str) -> Extraction {
    for (strategy, run) in STRATEGIES {
        if let Some(bundle) = run(text) {
            debug!(?strategy, "extracted files from model output");
            return Extraction {
                bundle,
                source: ExtractionSource::Parsed(strategy),
            };
        }
    }

    let preview: String = text.chars().take(200).collect();
    warn!(len = text.len(), %preview, "no files object in model output, using error page");
    Extraction {
        bundle: FileBundle::fallback(),
        source: ExtractionSource::Fallback,
    }
}

fn parse_direct(text: &str) -> Option<FileBundle> {
    parse_files(text)
}

fn parse_unfenced(text: &str) -> Option<FileBundle> {
    let cleaned = strip_code_fences(text);

    if mentions_every_file(&cleaned) && !cleaned.starts_with('{') {
        // `"files": {...}` fragment first, then bare `"index.html": ...` pairs
        parse_files(&format!("{{\"files\":{}}}", cleaned))
            .or_else(|| parse_files(&format!("{{\"files\":{{{}}}}}", cleaned)))
    } else {
        parse_files(&cleaned)
    }
}

fn parse_brace_span(text: &str) -> Option<FileBundle> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_files(&text[start..=end])
}

pub(crate) fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

fn mentions_every_file(text: &str) -> bool {
    FILE_NAMES
        .iter()
        .all(|name| text.contains(&format!("\"{}\"", name)))
}

fn parse_files(text: &str) -> Option<FileBundle> {
    let value: Value = serde_json::from_str(text).ok()?;
    files_from_value(&value)
}

/// Accepts `{"files": {...}}` as well as a bare files map.
fn files_from_value(value: &Value) -> Option<FileBundle> {
    let files = match value.get("files") {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    };

    let html = file_body(files, INDEX_HTML)?;
    let css = file_body(files, STYLE_CSS)?;
    let js = file_body(files, SCRIPT_JS)?;
    Some(FileBundle::new(html, css, js))
}

/// A blank file counts as missing.
fn file_body<'a>(files: &'a Value, name: &str) -> Option<&'a str> {
    files
        .get(name)?
        .as_str()
        .filter(|body| !body.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ENVELOPE: &str = r#"{"files":{"index.html":"<div>Hi</div>","style.css":"body{color:red}","script.js":"console.log(1)"}}"#;

    fn expected() -> FileBundle {
        FileBundle::new("<div>Hi</div>", "body{color:red}", "console.log(1)")
    }

    fn assert_complete(extraction: &Extraction) {
        for (name, body) in extraction.bundle.iter() {
            assert!(!body.is_empty(), "{} should not be empty", name);
        }
    }

    #[test]
    fn test_direct_json() {
        let result = extract_files(ENVELOPE);
        assert_eq!(result.source, ExtractionSource::Parsed(Strategy::Direct));
        assert_eq!(result.bundle, expected());
    }

    #[test]
    fn test_fenced_json() {
        let text = format!("```json\n{}\n```", ENVELOPE);
        let result = extract_files(&text);
        assert_eq!(result.source, ExtractionSource::Parsed(Strategy::Unfenced));
        assert_eq!(result.bundle, expected());
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = format!("```\n{}\n```", ENVELOPE);
        assert_eq!(extract_files(&text).bundle, expected());
    }

    #[test]
    fn test_prose_wrapped_json() {
        let text = format!(
            "Sure! Here is your website:\n\n{}\n\nLet me know if you want changes.",
            ENVELOPE
        );
        let result = extract_files(&text);
        assert_eq!(result.source, ExtractionSource::Parsed(Strategy::BraceSpan));
        assert_eq!(result.bundle, expected());
    }

    #[test]
    fn test_bare_files_map() {
        let text = r#"{"index.html":"<div>Hi</div>","style.css":"body{color:red}","script.js":"console.log(1)"}"#;
        let result = extract_files(text);
        assert_eq!(result.source, ExtractionSource::Parsed(Strategy::Direct));
        assert_eq!(result.bundle, expected());
    }

    #[test]
    fn test_bare_key_value_pairs_get_wrapped() {
        let text = r#""index.html":"<div>Hi</div>","style.css":"body{color:red}","script.js":"console.log(1)""#;
        let result = extract_files(text);
        assert_eq!(result.source, ExtractionSource::Parsed(Strategy::Unfenced));
        assert_eq!(result.bundle, expected());
    }

    #[test]
    fn test_garbage_falls_back() {
        let result = extract_files("I'm sorry, I can't help with that.");
        assert!(result.is_fallback());
        assert_eq!(result.bundle, FileBundle::fallback());
        assert_complete(&result);
    }

    #[test]
    fn test_truncated_json_falls_back() {
        let result = extract_files(r#"{"files":{"index.html":"<div>"#);
        assert!(result.is_fallback());
        assert_complete(&result);
    }

    #[test]
    fn test_missing_file_key_falls_back() {
        let text = r#"{"files":{"index.html":"<div>Hi</div>","style.css":"body{}"}}"#;
        let result = extract_files(text);
        assert!(result.is_fallback());
    }

    #[test]
    fn test_non_string_file_falls_back() {
        let text = r#"{"files":{"index.html":"<p></p>","style.css":{"body":"red"},"script.js":""}}"#;
        assert!(extract_files(text).is_fallback());
    }

    #[test]
    fn test_blank_file_falls_back() {
        let text = r#"{"files":{"index.html":"<p>Hi</p>","style.css":"  ","script.js":"1;"}}"#;
        assert!(extract_files(text).is_fallback());
    }

    #[test]
    fn test_extra_files_are_ignored() {
        let text = r##"{"files":{"index.html":"<div>Hi</div>","style.css":"body{color:red}","script.js":"console.log(1)","README.md":"# hi"}}"##;
        assert_eq!(extract_files(text).bundle, expected());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }
}
