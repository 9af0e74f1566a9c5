//! The single "current bundle" slot that editors and previews read from.
//!
//! Overlapping generate calls are resolved by ticket: each call takes the
//! next ticket when it starts, and only the holder of the newest ticket may
//! replace the bundle. Older calls still run to completion but their result
//! is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{GenerationError, GenerationResult};
use crate::site::{FileBundle, GeneratedSite, GenerationPipeline, SiteOrigin};

/// Result of a generate call that reached the model layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The bundle was replaced; `revision` is the new revision number.
    Applied { revision: u64, origin: SiteOrigin },
    /// A newer call was started before this one finished.
    Superseded,
}

#[derive(Debug, Clone)]
struct SlotState {
    bundle: FileBundle,
    revision: u64,
    last_prompt: Option<String>,
    updated_at: DateTime<Local>,
}

pub struct Workspace {
    pipeline: GenerationPipeline,
    latest_ticket: AtomicU64,
    state: RwLock<SlotState>,
}

impl Workspace {
    pub fn new(pipeline: GenerationPipeline) -> Self {
        Self::with_bundle(pipeline, FileBundle::starter())
    }

    pub fn with_bundle(pipeline: GenerationPipeline, bundle: FileBundle) -> Self {
        Self {
            pipeline,
            latest_ticket: AtomicU64::new(0),
            state: RwLock::new(SlotState {
                bundle,
                revision: 0,
                last_prompt: None,
                updated_at: Local::now(),
            }),
        }
    }

    /// Run the pipeline for `prompt` and install the result if still current.
    ///
    /// On error the current bundle is left exactly as it was.
    pub async fn generate(&self, prompt: &str) -> GenerationResult<GenerateOutcome> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, "generation started");

        let GeneratedSite { bundle, origin } = self.pipeline.run(prompt).await?;

        let mut state = self.state.write().await;
        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            info!(ticket, "discarding result of superseded generation");
            return Ok(GenerateOutcome::Superseded);
        }

        state.bundle = bundle;
        state.revision += 1;
        state.last_prompt = Some(prompt.trim().to_string());
        state.updated_at = Local::now();
        Ok(GenerateOutcome::Applied {
            revision: state.revision,
            origin,
        })
    }

    /// Editor change to a single file. Returns false for unknown file names.
    pub async fn update_file(&self, name: &str, content: impl Into<String>) -> bool {
        let mut state = self.state.write().await;
        let updated = state.bundle.set(name, content);
        if updated {
            state.revision += 1;
            state.updated_at = Local::now();
        }
        updated
    }

    pub async fn snapshot(&self) -> FileBundle {
        self.state.read().await.bundle.clone()
    }

    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }

    pub async fn last_prompt(&self) -> Option<String> {
        self.state.read().await.last_prompt.clone()
    }

    pub async fn updated_at(&self) -> DateTime<Local> {
        self.state.read().await.updated_at
    }
}
