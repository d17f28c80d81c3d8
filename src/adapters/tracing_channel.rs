//! Execution channel that forwards everything to `tracing`.
//!
//! This is the non-interactive default: confirmations are granted and
//! requests for input receive an empty answer.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ports::ExecutionChannel;

#[derive(Debug, Clone, Default)]
pub struct TracingChannel {
    name: Option<String>,
}

impl TracingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every event with `channel = name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    fn channel(&self) -> &str {
        self.name.as_deref().unwrap_or("default")
    }
}

#[async_trait]
impl ExecutionChannel for TracingChannel {
    async fn debug(&self, message: &str) {
        debug!(channel = self.channel(), "{message}");
    }

    async fn info(&self, message: &str) {
        info!(channel = self.channel(), "{message}");
    }

    async fn warning(&self, message: &str) {
        warn!(channel = self.channel(), "{message}");
    }

    async fn error(&self, message: &str) {
        error!(channel = self.channel(), "{message}");
    }

    async fn output(&self, message: &str) {
        info!(channel = self.channel(), output = true, "{message}");
    }

    async fn confirm(&self, prompt: &str) -> bool {
        info!(channel = self.channel(), prompt, "Auto-confirming");
        true
    }

    async fn request(&self, prompt: &str) -> String {
        warn!(channel = self.channel(), prompt, "Input requested on a non-interactive channel");
        String::new()
    }
}
