//! Intro Writer port - drafts an introduction paragraph from a biodata.

use async_trait::async_trait;

use crate::domain::biodata::IntroductionRequest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntroError {
    #[error("Introduction writer is not configured")]
    NotConfigured,

    #[error("Introduction provider error: {0}")]
    Provider(String),

    #[error("Introduction provider timed out")]
    Timeout,
}

/// Port for AI text generation.
///
/// An empty string is a valid answer; callers decide what to show instead.
#[async_trait]
pub trait IntroWriter: Send + Sync {
    async fn draft_introduction(&self, request: &IntroductionRequest) -> Result<String, IntroError>;
}
