//! README summarizer domain

mod entity;
mod prompt;
mod source;

pub use entity::{GithubRepository, ReadmeSummary, RepositorySummary};
pub use prompt::{build_user_prompt, parse_summary, truncate_chars, SYSTEM_PROMPT};
pub use source::ReadmeSource;

#[cfg(test)]
pub use source::MockReadmeSource;
