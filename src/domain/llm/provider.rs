use async_trait::async_trait;
use std::fmt::Debug;

use super::{ChatCompletion, ChatPrompt};
use crate::domain::DomainError;

/// A hosted model that answers a chat prompt with text
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    async fn complete(
        &self,
        model: &str,
        prompt: ChatPrompt,
    ) -> Result<ChatCompletion, DomainError>;

    /// Name used in error messages and logs
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Answers every prompt with a fixed text or a fixed failure
    #[derive(Debug, Clone)]
    pub struct MockLlmProvider {
        name: &'static str,
        answer: Result<String, String>,
        prompts: Arc<Mutex<Vec<(String, ChatPrompt)>>>,
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                answer: Err("No mock answer configured".to_string()),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_content(mut self, content: impl Into<String>) -> Self {
            self.answer = Ok(content.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.answer = Err(error.into());
            self
        }

        /// Prompts received so far, with the model they targeted
        pub fn prompts(&self) -> Vec<(String, ChatPrompt)> {
            self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn complete(
            &self,
            model: &str,
            prompt: ChatPrompt,
        ) -> Result<ChatCompletion, DomainError> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push((model.to_string(), prompt));
            }

            match &self.answer {
                Ok(text) => Ok(ChatCompletion::new("mock-id", model, text.clone())),
                Err(error) => Err(DomainError::provider(self.name, error)),
            }
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
