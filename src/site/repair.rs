//! Text-level repair of the generated `index.html` scaffolding.
//!
//! Not an HTML parser. Each rule looks for one piece of document structure
//! and splices in a default when it is missing. Rules run once, in order,
//! and every fix leaves its own check satisfied, so a second pass is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DOCTYPE: Lazy<Regex> = Lazy::new(|| rx(r"(?i)<!doctype[^>]*>?"));
static HTML_OPEN: Lazy<Regex> = Lazy::new(|| rx(r"(?i)<html[\s>]"));
static HTML_OPEN_TAG: Lazy<Regex> = Lazy::new(|| rx(r"(?i)<html(?:\s[^>]*)?>"));
static HEAD_OPEN: Lazy<Regex> = Lazy::new(|| rx(r"(?i)<head[\s>]"));
static BODY_OPEN: Lazy<Regex> = Lazy::new(|| rx(r"(?i)<body[\s>]"));
static BODY_CLOSE: Lazy<Regex> = Lazy::new(|| rx(r"(?i)</body\s*>"));
static HTML_CLOSE: Lazy<Regex> = Lazy::new(|| rx(r"(?i)</html\s*>"));
static SCRIPT_REF: Lazy<Regex> = Lazy::new(|| {
    // quotes may still be backslash-escaped at this stage
    rx(r#"(?i)<script\b[^>]*\bsrc\s*=\s*\\?["']?(?:\./)?script\.js(?:\\?["'\s>]|$)"#)
});

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).expect("repair pattern is valid")
}

const DOCTYPE_TAG: &str = "<!DOCTYPE html>";
const HTML_TAG: &str = "<html lang=\"en\">";
const SCRIPT_TAG: &str = "<script src=\"script.js\"></script>";
const HEAD_BLOCK: &str = r#"<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated Website</title>
    <link rel="stylesheet" href="style.css">
</head>"#;

/// One structural check and the fix applied when it fails.
pub struct RepairRule {
    pub name: &'static str,
    pub is_satisfied: fn(&str) -> bool,
    pub fix: fn(&str) -> String,
}

/// The rules, in the order they must run.
pub const REPAIR_POLICY: [RepairRule; 6] = [
    RepairRule {
        name: "doctype",
        is_satisfied: has_doctype,
        fix: add_doctype,
    },
    RepairRule {
        name: "html-open",
        is_satisfied: has_html_open,
        fix: add_html_open,
    },
    RepairRule {
        name: "head",
        is_satisfied: has_head,
        fix: add_head,
    },
    RepairRule {
        name: "body-close",
        is_satisfied: has_body_close,
        fix: add_body_close,
    },
    RepairRule {
        name: "html-close",
        is_satisfied: has_html_close,
        fix: add_html_close,
    },
    RepairRule {
        name: "script-ref",
        is_satisfied: has_script_ref,
        fix: add_script_ref,
    },
];

/// Run every rule of [`REPAIR_POLICY`] over `html`.
pub fn repair_html(html: &str) -> String {
    REPAIR_POLICY.iter().fold(html.to_string(), |doc, rule| {
        if (rule.is_satisfied)(&doc) {
            doc
        } else {
            debug!(rule = rule.name, "repairing generated html");
            (rule.fix)(&doc)
        }
    })
}

fn has_doctype(html: &str) -> bool {
    DOCTYPE.is_match(html)
}

fn has_html_open(html: &str) -> bool {
    HTML_OPEN.is_match(html)
}

fn has_head(html: &str) -> bool {
    HEAD_OPEN.is_match(html)
}

fn has_body_close(html: &str) -> bool {
    BODY_CLOSE.is_match(html)
}

fn has_html_close(html: &str) -> bool {
    HTML_CLOSE.is_match(html)
}

fn has_script_ref(html: &str) -> bool {
    SCRIPT_REF.is_match(html)
}

/// Byte offset just past a complete doctype tag.
fn doctype_end(html: &str) -> Option<usize> {
    DOCTYPE
        .find(html)
        .filter(|m| m.as_str().ends_with('>'))
        .map(|m| m.end())
}

fn splice(html: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(html.len() + insert.len());
    out.push_str(&html[..at]);
    out.push_str(insert);
    out.push_str(&html[at..]);
    out
}

fn add_doctype(html: &str) -> String {
    format!("{}\n{}", DOCTYPE_TAG, html)
}

fn add_html_open(html: &str) -> String {
    match doctype_end(html) {
        Some(end) => splice(html, end, &format!("\n{}", HTML_TAG)),
        None => format!("{}\n{}", HTML_TAG, html),
    }
}

fn add_head(html: &str) -> String {
    let mut block = format!("\n{}", HEAD_BLOCK);
    if !BODY_OPEN.is_match(html) {
        block.push_str("\n<body>");
    }

    let anchor = HTML_OPEN_TAG
        .find(html)
        .map(|m| m.end())
        .or_else(|| doctype_end(html));

    match anchor {
        Some(at) => splice(html, at, &block),
        None => format!("{}\n{}", block.trim_start(), html),
    }
}

fn add_body_close(html: &str) -> String {
    match HTML_CLOSE.find_iter(html).last() {
        Some(m) => splice(html, m.start(), "</body>\n"),
        None => format!("{}\n</body>", html.trim_end()),
    }
}

fn add_html_close(html: &str) -> String {
    format!("{}</html>", html.trim_end())
}

fn add_script_ref(html: &str) -> String {
    match BODY_CLOSE.find_iter(html).last() {
        Some(m) => splice(html, m.start(), &format!("{}\n", SCRIPT_TAG)),
        None => format!("{}\n{}", html.trim_end(), SCRIPT_TAG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("{:?} not found in {:?}", needle, haystack))
    }

    #[test]
    fn test_fragment_becomes_full_document() {
        let out = repair_html("<div>Hi</div>");

        let doctype = position(&out, "<!DOCTYPE html>");
        let html = position(&out, "<html");
        let head = position(&out, "<head>");
        let charset = position(&out, "<meta charset=");
        let viewport = position(&out, "<meta name=\"viewport\"");
        let body = position(&out, "<body>");
        let content = position(&out, "<div>Hi</div>");

        assert!(doctype < html && html < head && head < charset && charset < viewport);
        assert!(viewport < body && body < content);
        assert!(out.ends_with("</body></html>"), "{}", out);
        assert_eq!(out.matches("<script src=\"script.js\">").count(), 1);
        assert!(position(&out, SCRIPT_TAG) > content);
    }

    #[test]
    fn test_valid_document_is_untouched() {
        let doc = r#"<!DOCTYPE html>
<html lang="en">
<head><title>x</title></head>
<body>
<main>ok</main>
<script src="script.js"></script>
</body>
</html>"#;
        assert_eq!(repair_html(doc), doc);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let inputs = [
            "",
            "<div>Hi</div>",
            "<!doctype html><p>x</p>",
            "<html><body><p>x</p></body></html>",
            "<head><title>t</title></head><body>text",
            "<header>Top</header><main></main>",
            "<!DOCTYPE html",
            "<HTML><BODY>shout</BODY></HTML>",
            "<html lang=\\\"en\\\"><body><script src=\\\"script.js\\\"></script></body></html>",
            "<body><script src=\"script.jsx\"></script></body>",
            "<body><script src='script.json'></script>",
        ];
        for input in inputs {
            let once = repair_html(input);
            assert_eq!(repair_html(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_header_is_not_mistaken_for_head() {
        let out = repair_html("<header>Top</header>");
        assert!(out.contains("<head>\n"));
        assert!(out.contains("<header>Top</header>"));
    }

    #[test]
    fn test_existing_body_not_duplicated() {
        let out = repair_html("<html><body><p>x</p></body></html>");
        assert_eq!(out.matches("<body").count(), 1);
        assert_eq!(out.matches("</body>").count(), 1);
        assert!(out.contains("<html>\n<head>"));
    }

    #[test]
    fn test_script_added_before_existing_body_close() {
        let doc = "<!DOCTYPE html>\n<html>\n<head></head>\n<body>\n<p>x</p>\n</body>\n</html>";
        let out = repair_html(doc);
        assert!(out.contains("<p>x</p>\n<script src=\"script.js\"></script>\n</body>"));
    }

    #[test]
    fn test_relative_script_path_counts() {
        assert!(has_script_ref("<script src='./script.js' defer></script>"));
        assert!(has_script_ref("<SCRIPT type=\"module\" src=\"script.js\"></SCRIPT>"));
        assert!(!has_script_ref("<script src=\"app.js\"></script>"));
    }

    #[test]
    fn test_escaped_quotes_count_as_script_ref() {
        assert!(has_script_ref(r#"<script src=\"script.js\"></script>"#));
        assert!(has_script_ref(r#"<script defer src=\"./script.js\"></script>"#));
        assert!(has_script_ref("<script src=script.js></script>"));
        assert!(has_script_ref("<script src=\"script.js"));
    }

    #[test]
    fn test_similar_file_names_do_not_count() {
        assert!(!has_script_ref("<script src=\"script.jsx\"></script>"));
        assert!(!has_script_ref("<script src='script.json'></script>"));
        assert!(!has_script_ref(r#"<script src=\"script.js.map\"></script>"#));

        let out = repair_html("<body><script src=\"script.jsx\"></script></body>");
        assert!(out.contains("<script src=\"script.jsx\"></script>"));
        assert_eq!(out.matches("<script src=\"script.js\"></script>").count(), 1);
    }

    #[test]
    fn test_escaped_document_gets_no_second_script() {
        let doc = r#"<!DOCTYPE html>
<html lang=\"en\">
<head><meta charset=\"UTF-8\"></head>
<body>
<div id=\"root\"></div>
<script src=\"script.js\"></script>
</body>
</html>"#;
        assert_eq!(repair_html(doc), doc);
    }

    #[test]
    fn test_body_close_goes_before_html_close() {
        let out = add_body_close("<html><body><p>x</p></html>");
        assert_eq!(out, "<html><body><p>x</p></body>\n</html>");
    }

    #[test]
    fn test_html_open_after_doctype() {
        let out = add_html_open("<!DOCTYPE html>\n<p>x</p>");
        assert_eq!(out, "<!DOCTYPE html>\n<html lang=\"en\">\n<p>x</p>");
    }

    #[test]
    fn test_head_anchored_to_doctype_without_html() {
        let out = add_head("<!DOCTYPE html><p>x</p>");
        assert!(out.starts_with("<!DOCTYPE html>\n<head>"));
        assert!(out.contains("</head>\n<body><p>x</p>"));
    }

    #[test]
    fn test_each_fix_satisfies_its_check() {
        for rule in REPAIR_POLICY.iter() {
            let fixed = (rule.fix)("<p>x</p>");
            assert!((rule.is_satisfied)(&fixed), "rule {} not satisfied", rule.name);
        }
    }
}
