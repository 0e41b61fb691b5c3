/// Text generation abstraction
///
/// Distillation and quiz generation only ever need "prompt in, text out".
/// Keeping that behind a trait lets the HTTP-backed client be swapped for a
/// deterministic stub in tests.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiGenerator;

/// A single generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Optional system instruction sent ahead of the prompt
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.0,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait for LLM text generation backends
///
/// Each call is a bounded, single-shot request. Implementations must not
/// retry; callers decide how a failure is surfaced.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate one completion for the request
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;

    /// Generator name for logging and debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("Explain gravity")
            .with_system("You are a helpful tutor.")
            .with_temperature(0.7);

        assert_eq!(request.prompt, "Explain gravity");
        assert_eq!(request.system.as_deref(), Some("You are a helpful tutor."));
        assert_eq!(request.temperature, 0.7);
    }

    #[test]
    fn test_request_defaults_to_deterministic_sampling() {
        let request = GenerationRequest::new("Quiz me");
        assert_eq!(request.system, None);
        assert_eq!(request.temperature, 0.0);
    }
}
