//! The seam between a chat session and the remote model.

use crate::error::Result;
use crate::types::{GenerationConfig, Turn};

/// A remote text-generation endpoint.
///
/// Implementations receive the whole conversation on every call, oldest turn
/// first, with the newest user turn last.  They return the text of the next
/// model turn.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generates the reply to the final turn of `turns`.
    async fn generate(&self, turns: &[Turn], config: &GenerationConfig) -> Result<String>;
}

#[async_trait::async_trait]
impl<B: GenerationBackend + ?Sized> GenerationBackend for Box<B> {
    async fn generate(&self, turns: &[Turn], config: &GenerationConfig) -> Result<String> {
        (**self).generate(turns, config).await
    }
}

#[async_trait::async_trait]
impl<B: GenerationBackend + ?Sized> GenerationBackend for std::sync::Arc<B> {
    async fn generate(&self, turns: &[Turn], config: &GenerationConfig) -> Result<String> {
        (**self).generate(turns, config).await
    }
}
