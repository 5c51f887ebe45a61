//! Language-model oracle.
//!
//! Selection and summarization both consult an external chat model through
//! the [`Oracle`] trait. Its replies are untrusted text; callers validate
//! them and fall back to deterministic behavior when they are unusable.

mod chat;

pub use chat::ChatOracle;

use async_trait::async_trait;

use crate::Result;

/// A fallible text-completion service.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Send a single prompt and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
