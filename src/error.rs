//! Caller-visible generation failures.

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Why every model call failed, in terms a user can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Overloaded,
    Unavailable,
    QuotaExceeded,
    ModelNotFound,
    RateLimited,
    Generic,
}

impl FailureCategory {
    /// Classify the last failure of an exhausted invocation.
    pub fn classify(err: &ApiError) -> Self {
        let message = err.to_string().to_lowercase();
        let status = err.status();

        if message.contains("overload") {
            FailureCategory::Overloaded
        } else if message.contains("quota") {
            FailureCategory::QuotaExceeded
        } else if status == Some(503) || message.contains("unavailable") {
            FailureCategory::Unavailable
        } else if status == Some(404) || message.contains("not found") {
            FailureCategory::ModelNotFound
        } else if status == Some(429) || message.contains("rate limit") {
            FailureCategory::RateLimited
        } else {
            FailureCategory::Generic
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            FailureCategory::Overloaded => {
                "The AI model is currently overloaded. Please try again in a few moments."
            }
            FailureCategory::Unavailable => {
                "AI service is temporarily unavailable. Please try again later."
            }
            FailureCategory::QuotaExceeded => {
                "API quota exceeded. Please check your Google AI Studio quota."
            }
            FailureCategory::ModelNotFound => {
                "Model not found. Please check your Google AI Studio setup and available models."
            }
            FailureCategory::RateLimited => {
                "Too many requests. Please wait a moment before generating again."
            }
            FailureCategory::Generic => "Failed to generate website. Please try a different prompt.",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Please enter a prompt first. Example: 'create a portfolio website with image gallery'")]
    EmptyPrompt,

    /// Every candidate and the service-default call failed.
    #[error("{}", .category.user_message())]
    Exhausted {
        category: FailureCategory,
        attempts: usize,
        last_error: Option<ApiError>,
    },
}

impl GenerationError {
    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            GenerationError::Exhausted { category, .. } => Some(*category),
            GenerationError::EmptyPrompt => None,
        }
    }
}

pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
