//! The three-file website bundle handed to editors and previews.

use serde::{Deserialize, Serialize};

pub const INDEX_HTML: &str = "index.html";
pub const STYLE_CSS: &str = "style.css";
pub const SCRIPT_JS: &str = "script.js";

/// File names in the order editors list them.
pub const FILE_NAMES: [&str; 3] = [INDEX_HTML, STYLE_CSS, SCRIPT_JS];

const ERROR_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI WebBuilder</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <div id="root"></div>
    <script src="script.js"></script>
</body>
</html>"#;

const ERROR_STYLE_CSS: &str =
    "body { font-family: Arial, sans-serif; padding: 20px; } h1 { color: #d32f2f; }";

const ERROR_SCRIPT_JS: &str = r#"console.error('Website generation failed');
const root = document.getElementById('root');
root.innerHTML = '<h1>Error Generating Website</h1><p>There was an issue generating your website. Please try again with a different prompt.</p>';"#;

const STARTER_STYLE_CSS: &str = r#"body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    line-height: 1.6;
    margin: 0;
    padding: 0;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: #333;
    min-height: 100vh;
}

#root {
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
}"#;

const STARTER_SCRIPT_JS: &str = r#"console.log("AI WebBuilder loaded successfully!");

document.addEventListener('DOMContentLoaded', function() {
    const root = document.getElementById('root');

    const header = document.createElement('header');
    header.innerHTML = `
        <h1>Welcome to AI WebBuilder!</h1>
        <p>Describe a website and press Generate</p>
    `;
    header.style.cssText = 'text-align: center; color: white; padding: 2rem;';

    root.appendChild(header);
});"#;

/// HTML, CSS and JavaScript for one generated site.
///
/// Every bundle carries all three files; there is no partial bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBundle {
    #[serde(rename = "index.html")]
    pub html: String,
    #[serde(rename = "style.css")]
    pub css: String,
    #[serde(rename = "script.js")]
    pub js: String,
}

impl FileBundle {
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    /// The generation-error page shown when nothing usable came back.
    ///
    /// This is the only fallback bundle in the crate: the extractor returns it
    /// for unparseable output and the placeholder exhaustion policy returns it
    /// when every model call failed.
    pub fn fallback() -> Self {
        Self::new(ERROR_INDEX_HTML, ERROR_STYLE_CSS, ERROR_SCRIPT_JS)
    }

    /// Welcome page a fresh workspace starts with.
    pub fn starter() -> Self {
        Self::new(ERROR_INDEX_HTML, STARTER_STYLE_CSS, STARTER_SCRIPT_JS)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            INDEX_HTML => Some(&self.html),
            STYLE_CSS => Some(&self.css),
            SCRIPT_JS => Some(&self.js),
            _ => None,
        }
    }

    /// Replace one file by name. Returns false for names outside the bundle.
    pub fn set(&mut self, name: &str, content: impl Into<String>) -> bool {
        let slot = match name {
            INDEX_HTML => &mut self.html,
            STYLE_CSS => &mut self.css,
            SCRIPT_JS => &mut self.js,
            _ => return false,
        };
        *slot = content.into();
        true
    }

    /// Apply `f` to every file body.
    pub fn map(self, mut f: impl FnMut(&str) -> String) -> Self {
        Self {
            html: f(&self.html),
            css: f(&self.css),
            js: f(&self.js),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (INDEX_HTML, self.html.as_str()),
            (STYLE_CSS, self.css.as_str()),
            (SCRIPT_JS, self.js.as_str()),
        ]
        .into_iter()
    }
}

impl Default for FileBundle {
    fn default() -> Self {
        Self::starter()
    }
}
