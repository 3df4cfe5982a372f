//! Mock Intro Writer for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::biodata::IntroductionRequest;
use crate::ports::{IntroError, IntroWriter};

/// Returns a fixed reply or error and records every request.
#[derive(Debug, Clone)]
pub struct MockIntroWriter {
    reply: Result<String, IntroError>,
    calls: Arc<Mutex<Vec<IntroductionRequest>>>,
}

impl MockIntroWriter {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Arc::default(),
        }
    }

    pub fn failing(error: IntroError) -> Self {
        Self {
            reply: Err(error),
            calls: Arc::default(),
        }
    }

    fn calls_guard(&self) -> MutexGuard<'_, Vec<IntroductionRequest>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<IntroductionRequest> {
        self.calls_guard().clone()
    }
}

#[async_trait]
impl IntroWriter for MockIntroWriter {
    async fn draft_introduction(
        &self,
        request: &IntroductionRequest,
    ) -> Result<String, IntroError> {
        self.calls_guard().push(request.clone());
        self.reply.clone()
    }
}
