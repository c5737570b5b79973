//! Hosted language model seam used by the README summarizer

mod chat;
mod provider;

pub use chat::{ChatCompletion, ChatPrompt, ChatRole, ChatTurn};
pub use provider::LlmProvider;

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
