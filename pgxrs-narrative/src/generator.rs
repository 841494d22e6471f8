use async_trait::async_trait;

use crate::error::GenerationError;
use crate::prompt::Prompt;

/// A text generation service. Treated as best effort: every call has a
/// deadline enforced by the caller and a failure only means fallback text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// False for stand-ins that can never produce text.
    fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;
}

/// Stand-in when no service is configured; every request fails immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn name(&self) -> &str {
        "disabled"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn generate(&self, _prompt: &Prompt) -> Result<String, GenerationError> {
        Err(GenerationError::Disabled)
    }
}
