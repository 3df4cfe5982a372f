//! Fallback Intro Writer - never lets a provider failure reach the user.
//!
//! Wraps another `IntroWriter`. An empty answer becomes a stock paragraph
//! and a provider error becomes a short apology. `NotConfigured` passes
//! through unchanged so the caller can report the feature as disabled.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::biodata::{IntroductionRequest, FALLBACK_EMPTY, FALLBACK_ERROR};
use crate::ports::{IntroError, IntroWriter};

pub struct FallbackIntroWriter {
    inner: Arc<dyn IntroWriter>,
}

impl FallbackIntroWriter {
    pub fn new(inner: Arc<dyn IntroWriter>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl IntroWriter for FallbackIntroWriter {
    async fn draft_introduction(
        &self,
        request: &IntroductionRequest,
    ) -> Result<String, IntroError> {
        match self.inner.draft_introduction(request).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!("Introduction writer returned nothing, using fallback");
                Ok(FALLBACK_EMPTY.to_string())
            }
            Ok(text) => Ok(text),
            Err(IntroError::NotConfigured) => Err(IntroError::NotConfigured),
            Err(e) => {
                tracing::warn!(error = %e, "Introduction writer failed, using fallback");
                Ok(FALLBACK_ERROR.to_string())
            }
        }
    }
}

/// Stands in when no AI credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledIntroWriter;

#[async_trait]
impl IntroWriter for DisabledIntroWriter {
    async fn draft_introduction(
        &self,
        _request: &IntroductionRequest,
    ) -> Result<String, IntroError> {
        Err(IntroError::NotConfigured)
    }
}
