//! Execution side-channel port.

use async_trait::async_trait;

/// User-visible messaging exposed to tools and used by the loops.
///
/// Nothing written here feeds back into decisions.
#[async_trait]
pub trait ExecutionChannel: Send + Sync {
    async fn debug(&self, message: &str);

    async fn info(&self, message: &str);

    async fn warning(&self, message: &str);

    async fn error(&self, message: &str);

    /// Emit a result meant for the user rather than the log.
    async fn output(&self, message: &str);

    /// Ask the user a yes/no question.
    async fn confirm(&self, prompt: &str) -> bool;

    /// Ask the user for free-form input.
    async fn request(&self, prompt: &str) -> String;
}
