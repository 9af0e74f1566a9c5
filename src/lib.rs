//! Prompt-to-website generation: model client, normalization pipeline and
//! the shared current-bundle workspace.

pub mod api;
pub mod config;
pub mod error;
pub mod logger;
pub mod output;
pub mod preview;
pub mod site;
pub mod workspace;

pub use api::{
    ApiError, ClientError, GeminiClient, GenerateContent, GenerativeBackend, ModelTarget,
    RawModelResponse, SamplingConfig,
};
pub use config::Config;
pub use error::{FailureCategory, GenerationError, GenerationResult};
pub use output::OutputHandler;
pub use preview::{compose_preview, write_bundle};
pub use site::{FileBundle, GeneratedSite, GenerationPipeline, PromptVariant, SiteOrigin};
pub use workspace::{GenerateOutcome, Workspace};
