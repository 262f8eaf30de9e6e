//! Language model access for the pipeline stages.
//!
//! Stages depend only on the [`ChatModel`] trait. [`OpenRouterClient`] is the
//! production implementation; tests substitute in-memory doubles.

mod openrouter;

use async_trait::async_trait;
use preprint_shared::Result;

pub use openrouter::OpenRouterClient;

/// A single-turn chat completion: one system instruction, one user message,
/// one text reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the two messages and return the model's reply text.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
