//! Website generation pipeline
//!
//! Turns a free-text prompt into an `index.html` / `style.css` /
//! `script.js` bundle: build the prompt, walk the model candidates, pull the
//! files out of whatever the model said, patch the HTML scaffolding, and
//! undo leftover escape sequences.

pub mod bundle;
pub mod escape;
pub mod extract;
pub mod invoker;
pub mod pipeline;
pub mod prompt;
pub mod repair;

pub use bundle::{FileBundle, FILE_NAMES, INDEX_HTML, SCRIPT_JS, STYLE_CSS};
pub use escape::{normalize_bundle, normalize_escapes, EscapeOptions};
pub use extract::{extract_files, Extraction, ExtractionSource, Strategy};
pub use invoker::{Invocation, ModelInvoker};
pub use pipeline::{normalize_response, GeneratedSite, GenerationPipeline, SiteOrigin};
pub use prompt::{
    match_pattern, ExhaustionPolicy, GenerationRequest, PromptBuilder, PromptVariant, UiPattern,
    VariantConfig, UI_PATTERNS,
};
pub use repair::{repair_html, RepairRule, REPAIR_POLICY};
