//! Ordered model fallback.

use std::iter;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::prompt::GenerationRequest;
use crate::api::{ApiError, GenerativeBackend, ModelTarget};
use crate::error::{FailureCategory, GenerationError, GenerationResult};

/// Text accepted from one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub text: String,
    pub served_by: ModelTarget,
    /// Calls made, including the accepted one.
    pub attempts: usize,
}

/// Walks the candidate list until a model answers with text.
///
/// Candidates are tried one at a time, in order. A call that errors or
/// comes back empty moves on to the next candidate; nothing is retried.
/// After the last candidate, one more call goes out without a model name.
#[derive(Clone)]
pub struct ModelInvoker {
    backend: Arc<dyn GenerativeBackend>,
}

impl ModelInvoker {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    pub async fn invoke(&self, request: &GenerationRequest) -> GenerationResult<Invocation> {
        let targets = request
            .model_candidates
            .iter()
            .map(|model| ModelTarget::Named(model.clone()))
            .chain(iter::once(ModelTarget::ServiceDefault));

        let mut attempts = 0;
        let mut last_error: Option<ApiError> = None;

        for target in targets {
            attempts += 1;
            let content = match target {
                ModelTarget::ServiceDefault => {
                    info!("all named models failed, trying service default");
                    request.fallback_content()
                }
                ModelTarget::Named(_) => request.content(),
            };

            debug!(model = %target, attempt = attempts, "requesting generation");
            match self.backend.generate(&target, &content).await {
                Ok(response) => match response.usable_text() {
                    Some(text) => {
                        info!(model = %target, attempts, "model returned text");
                        return Ok(Invocation {
                            text: text.to_string(),
                            served_by: target,
                            attempts,
                        });
                    }
                    None => {
                        warn!(model = %target, "model returned no text");
                        last_error = None;
                    }
                },
                Err(err) => {
                    warn!(model = %target, error = %err, "model call failed");
                    last_error = Some(err);
                }
            }
        }

        let category = last_error
            .as_ref()
            .map(FailureCategory::classify)
            .unwrap_or(FailureCategory::Generic);

        Err(GenerationError::Exhausted {
            category,
            attempts,
            last_error,
        })
    }
}
