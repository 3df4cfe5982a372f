//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub json_logs: bool,

    /// Enable request tracing
    #[serde(default = "default_enable_tracing")]
    pub enable_tracing: bool,

    /// Use the Pandoc PDF renderer when Pandoc is installed
    #[serde(default = "default_pdf_export")]
    pub pdf_export: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            json_logs: false,
            enable_tracing: default_enable_tracing(),
            pdf_export: default_pdf_export(),
        }
    }
}

fn default_enable_tracing() -> bool {
    true
}

fn default_pdf_export() -> bool {
    true
}
