//! Prompt in, three repaired files out.

use std::sync::Arc;

use tracing::{info, warn};

use super::bundle::FileBundle;
use super::escape::{normalize_bundle, EscapeOptions};
use super::extract::{extract_files, ExtractionSource};
use super::invoker::ModelInvoker;
use super::prompt::{ExhaustionPolicy, PromptBuilder, VariantConfig};
use super::repair::repair_html;
use crate::api::{GenerativeBackend, ModelTarget};
use crate::error::{FailureCategory, GenerationError, GenerationResult};

/// How a bundle came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOrigin {
    Model {
        served_by: ModelTarget,
        attempts: usize,
        extraction: ExtractionSource,
    },
    /// Every call failed and the placeholder policy supplied the error page.
    Placeholder { category: FailureCategory },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSite {
    pub bundle: FileBundle,
    pub origin: SiteOrigin,
}

/// Extract, repair and unescape one model response.
pub fn normalize_response(text: &str, options: EscapeOptions) -> (FileBundle, ExtractionSource) {
    let extraction = extract_files(text);
    let mut bundle = extraction.bundle;
    bundle.html = repair_html(&bundle.html);
    (normalize_bundle(bundle, options), extraction.source)
}

/// The full generation chain for one prompt variant.
///
/// Holds no per-request state; one pipeline can serve any number of
/// concurrent `run` calls.
#[derive(Clone)]
pub struct GenerationPipeline {
    builder: PromptBuilder,
    invoker: ModelInvoker,
    escape: EscapeOptions,
}

impl GenerationPipeline {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: VariantConfig) -> Self {
        Self {
            builder: PromptBuilder::new(config),
            invoker: ModelInvoker::new(backend),
            escape: EscapeOptions::default(),
        }
    }

    pub fn with_escape_options(mut self, escape: EscapeOptions) -> Self {
        self.escape = escape;
        self
    }

    pub fn config(&self) -> &VariantConfig {
        self.builder.config()
    }

    pub async fn run(&self, prompt: &str) -> GenerationResult<GeneratedSite> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let request = self.builder.build(prompt);
        let invocation = match self.invoker.invoke(&request).await {
            Ok(invocation) => invocation,
            Err(GenerationError::Exhausted { category, attempts, .. })
                if self.config().on_exhausted == ExhaustionPolicy::Placeholder =>
            {
                warn!(?category, attempts, "generation exhausted, substituting error page");
                return Ok(GeneratedSite {
                    bundle: FileBundle::fallback(),
                    origin: SiteOrigin::Placeholder { category },
                });
            }
            Err(err) => return Err(err),
        };

        let (bundle, extraction) = normalize_response(&invocation.text, self.escape);
        info!(model = %invocation.served_by, ?extraction, "website generated");

        Ok(GeneratedSite {
            bundle,
            origin: SiteOrigin::Model {
                served_by: invocation.served_by,
                attempts: invocation.attempts,
                extraction,
            },
        })
    }
}
