//! Recovery of escape sequences that survived JSON decoding.
//!
//! Models are told to double-escape newlines and quotes inside the JSON
//! strings, so after `serde_json` has done its job the file bodies still hold
//! literal `\n` and `\"` pairs. This turns them back into real characters.

use super::bundle::FileBundle;

/// Options for [`normalize_escapes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscapeOptions {
    /// Also turn literal `\t` into two spaces.
    pub expand_tabs: bool,
}

/// Replace literal escape pairs with the characters they stand for.
///
/// Order is fixed: `\n`, then `\"`, then `\\`, then (optionally) `\t`.
/// Collapsing backslashes last keeps an escaped backslash followed by `n`
/// from being decoded twice.
pub fn normalize_escapes(text: &str, options: EscapeOptions) -> String {
    let out = text
        .replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\");

    if options.expand_tabs {
        out.replace("\\t", "  ")
    } else {
        out
    }
}

/// Normalize all three files of a bundle.
pub fn normalize_bundle(bundle: FileBundle, options: EscapeOptions) -> FileBundle {
    bundle.map(|body| normalize_escapes(body, options))
}
