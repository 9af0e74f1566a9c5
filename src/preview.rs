//! Single-document preview and on-disk output of a bundle.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::site::FileBundle;

pub const PREVIEW_FILE: &str = "preview.html";

/// Inline the bundle into one document, the way a sandboxed iframe
/// `srcdoc` receives it: CSS in the head, HTML then JS in the body.
pub fn compose_preview(bundle: &FileBundle) -> String {
    format!(
        "<html>\n  <head>\n    <style>{}</style>\n  </head>\n  <body>\n    {}\n    <script>{}</script>\n  </body>\n</html>\n",
        bundle.css, bundle.html, bundle.js
    )
}

/// Write the three files plus `preview.html` into `dir`.
pub fn write_bundle(dir: &Path, bundle: &FileBundle) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::with_capacity(4);
    for (name, body) in bundle.iter() {
        let path = dir.join(name);
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }

    let preview = dir.join(PREVIEW_FILE);
    fs::write(&preview, compose_preview(bundle))
        .with_context(|| format!("writing {}", preview.display()))?;
    written.push(preview);

    Ok(written)
}
