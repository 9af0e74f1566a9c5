#![allow(dead_code)]

use async_trait::async_trait;
use sitegen::{ApiError, GenerateContent, GenerativeBackend, ModelTarget, RawModelResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Replays canned outcomes in order and records every call.
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<RawModelResponse, ApiError>>>,
    calls: Mutex<Vec<ModelTarget>>,
}

impl ScriptedBackend {
    pub fn new(outcomes: Vec<Result<RawModelResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ModelTarget> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(
        &self,
        target: &ModelTarget,
        _content: &GenerateContent,
    ) -> Result<RawModelResponse, ApiError> {
        self.calls.lock().unwrap().push(target.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted outcome left".to_string())))
    }
}

/// Answers every call with a bundle naming the prompt, holding back
/// prompts that mention "slow" until the gate is opened.
pub struct GatedBackend {
    pub gate: Notify,
    started: AtomicUsize,
}

impl GatedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Notify::new(),
            started: AtomicUsize::new(0),
        })
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for GatedBackend {
    async fn generate(
        &self,
        _target: &ModelTarget,
        content: &GenerateContent,
    ) -> Result<RawModelResponse, ApiError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let marker = if content.user_text.contains("slow") {
            self.gate.notified().await;
            "slow"
        } else {
            "fast"
        };
        Ok(RawModelResponse::from_text(files_json(
            &format!("<p>{}</p>", marker),
            "p{}",
            "1;",
        )))
    }
}

pub fn files_json(html: &str, css: &str, js: &str) -> String {
    serde_json::json!({
        "files": {
            "index.html": html,
            "style.css": css,
            "script.js": js,
        }
    })
    .to_string()
}

pub fn status(code: u16, message: &str) -> Result<RawModelResponse, ApiError> {
    Err(ApiError::Status {
        status: code,
        message: message.to_string(),
    })
}

pub fn named(model: &str) -> ModelTarget {
    ModelTarget::Named(model.to_string())
}
