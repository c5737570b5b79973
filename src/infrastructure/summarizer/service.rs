//! README summarization service

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use validator::Validate;

use crate::domain::llm::{ChatPrompt, LlmProvider};
use crate::domain::summarizer::{
    build_user_prompt, parse_summary, truncate_chars, GithubRepository, ReadmeSource,
    RepositorySummary, SYSTEM_PROMPT,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_summarization, SummarizationOutcome};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_README_CHARS: usize = 12_000;

/// Tunables for the summarizer
#[derive(Debug, Clone)]
pub struct SummarizerSettings {
    pub model: String,
    pub temperature: f32,
    pub max_readme_chars: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_readme_chars: DEFAULT_MAX_README_CHARS,
        }
    }
}

/// Fetches a repository README and has an LLM summarize it
#[derive(Debug)]
pub struct SummarizerService {
    readme_source: Arc<dyn ReadmeSource>,
    llm: Arc<dyn LlmProvider>,
    settings: SummarizerSettings,
}

impl SummarizerService {
    pub fn new(readme_source: Arc<dyn ReadmeSource>, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            readme_source,
            llm,
            settings: SummarizerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SummarizerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Summarize the README of a repository
    pub async fn summarize(
        &self,
        repository: GithubRepository,
    ) -> Result<RepositorySummary, DomainError> {
        let started = Instant::now();
        let result = self.summarize_inner(repository).await;

        let outcome = match &result {
            Ok(_) => SummarizationOutcome::Success,
            Err(DomainError::NotFound { .. }) => SummarizationOutcome::ReadmeNotFound,
            Err(_) => SummarizationOutcome::Error,
        };
        record_summarization(&self.settings.model, outcome, started.elapsed());

        result
    }

    async fn summarize_inner(
        &self,
        repository: GithubRepository,
    ) -> Result<RepositorySummary, DomainError> {
        let readme = self.readme_source.fetch_readme(&repository).await?;
        let content = truncate_chars(&readme, self.settings.max_readme_chars);

        if content.len() < readme.len() {
            info!(
                owner = %repository.owner,
                repo = %repository.repo,
                max_chars = self.settings.max_readme_chars,
                "README truncated before summarization"
            );
        }

        let prompt = ChatPrompt::new(
            SYSTEM_PROMPT,
            build_user_prompt(content),
            self.settings.temperature,
        );

        let answer = self.llm.complete(&self.settings.model, prompt).await?;
        if answer.cut_off {
            warn!(model = %answer.model, "Model answer was cut off at its token limit");
        }

        let summary = parse_summary(&answer.text);

        if let Err(e) = summary.validate() {
            warn!(
                owner = %repository.owner,
                repo = %repository.repo,
                error = %e,
                "LLM output did not match the expected summary format"
            );
            return Err(DomainError::provider(
                self.llm.provider_name(),
                "Model response did not contain a summary",
            ));
        }

        info!(
            owner = %repository.owner,
            repo = %repository.repo,
            key_points = summary.key_points.len(),
            "README summarized"
        );

        Ok(RepositorySummary {
            summary,
            repository,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::summarizer::MockReadmeSource;

    const WELL_FORMED: &str = "Summary: A web framework.\n\
                               Key Points:\n\
                               - Fast\n\
                               - Modular\n\
                               Technical Stack: Rust, Tokio\n\
                               Project Type: Library";

    fn repository() -> GithubRepository {
        GithubRepository::parse("https://github.com/tokio-rs/axum").unwrap()
    }

    fn readme_source(content: &'static str) -> Arc<MockReadmeSource> {
        let mut source = MockReadmeSource::new();
        source
            .expect_fetch_readme()
            .times(1)
            .returning(move |_| Ok(content.to_string()));
        Arc::new(source)
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let llm = MockLlmProvider::new("openai").with_content(WELL_FORMED);
        let service = SummarizerService::new(readme_source("# axum"), Arc::new(llm.clone()));

        let result = service.summarize(repository()).await.unwrap();

        assert_eq!(result.summary.summary, "A web framework.");
        assert_eq!(result.summary.key_points, vec!["Fast", "Modular"]);
        assert_eq!(result.summary.project_type, "Library");
        assert_eq!(result.repository.repo, "axum");

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        let (model, prompt) = &prompts[0];
        assert_eq!(model, DEFAULT_MODEL);
        assert_eq!(prompt.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(prompt.instructions, SYSTEM_PROMPT);
        assert!(prompt.prompt.ends_with("# axum"));
    }

    #[tokio::test]
    async fn test_readme_is_truncated() {
        let llm = MockLlmProvider::new("openai").with_content(WELL_FORMED);
        let service = SummarizerService::new(readme_source("abcdefghij"), Arc::new(llm.clone()))
            .with_settings(SummarizerSettings {
                max_readme_chars: 4,
                ..Default::default()
            });

        service.summarize(repository()).await.unwrap();

        let (_, prompt) = &llm.prompts()[0];
        assert!(prompt.prompt.ends_with("README content:\nabcd"));
    }

    #[tokio::test]
    async fn test_missing_readme_propagates_not_found() {
        let mut source = MockReadmeSource::new();
        source
            .expect_fetch_readme()
            .returning(|_| Err(DomainError::not_found("README not found")));
        let llm = MockLlmProvider::new("openai").with_content(WELL_FORMED);
        let service = SummarizerService::new(Arc::new(source), Arc::new(llm.clone()));

        let err = service.summarize(repository()).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_output_is_provider_error() {
        let llm = MockLlmProvider::new("openai").with_content("Sorry, I cannot help with that.");
        let service = SummarizerService::new(readme_source("# x"), Arc::new(llm));

        let err = service.summarize(repository()).await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let llm = MockLlmProvider::new("openai").with_error("rate limited");
        let service = SummarizerService::new(readme_source("# x"), Arc::new(llm));

        let err = service.summarize(repository()).await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
    }
}
