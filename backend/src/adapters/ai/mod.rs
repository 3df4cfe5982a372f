//! AI Intro Writer Adapters.
//!
//! Implementations of the IntroWriter port.
//!
//! ## Available Adapters
//!
//! - `GeminiIntroWriter` - Google Gemini `generateContent`
//! - `FallbackIntroWriter` - Wrapper substituting stock text on failure
//! - `DisabledIntroWriter` - Used when no credentials are configured
//! - `MockIntroWriter` - Configurable mock for testing

mod fallback_writer;
mod gemini_writer;
mod mock_writer;

pub use fallback_writer::{DisabledIntroWriter, FallbackIntroWriter};
pub use gemini_writer::{GeminiConfig, GeminiIntroWriter};
pub use mock_writer::MockIntroWriter;
