//! Summarizer domain types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::DomainError;

/// Accepts `[http(s)://][www.]github.com/<owner>/<repo>[.git][/...]`
static GITHUB_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)/([A-Za-z0-9._-]+?)(?:\.git)?(?:/.*)?$",
    )
    .unwrap()
});

/// A GitHub repository resolved from a user-supplied URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepository {
    pub owner: String,
    pub repo: String,
    pub url: String,
}

impl GithubRepository {
    /// Resolve owner and repository name from a GitHub URL
    pub fn parse(url: &str) -> Result<Self, DomainError> {
        let trimmed = url.trim();

        let captures = GITHUB_URL_PATTERN.captures(trimmed).ok_or_else(|| {
            DomainError::validation(format!("'{}' is not a GitHub repository URL", trimmed))
        })?;

        let owner = captures[1].to_string();
        let repo = captures[2].to_string();

        if repo == "." || repo == ".." {
            return Err(DomainError::validation(format!(
                "'{}' is not a GitHub repository URL",
                trimmed
            )));
        }

        Ok(Self {
            owner,
            repo,
            url: trimmed.to_string(),
        })
    }
}

/// Structured summary of a README produced by the LLM
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReadmeSummary {
    #[validate(length(min = 1, message = "summary must not be empty"))]
    pub summary: String,
    pub key_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_stack: Option<Vec<String>>,
    pub project_type: String,
}

/// Result of summarizing a repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositorySummary {
    pub summary: ReadmeSummary,
    pub repository: GithubRepository,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_url() {
        let repo = GithubRepository::parse("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.repo, "rust");
        assert_eq!(repo.url, "https://github.com/rust-lang/rust");
    }

    #[test]
    fn test_parse_url_variants() {
        for url in [
            "github.com/tokio-rs/axum",
            "http://github.com/tokio-rs/axum",
            "https://www.github.com/tokio-rs/axum/",
            "https://github.com/tokio-rs/axum.git",
            "https://github.com/tokio-rs/axum/tree/main/axum",
            "  https://github.com/tokio-rs/axum  ",
        ] {
            let repo = GithubRepository::parse(url).unwrap();
            assert_eq!(repo.owner, "tokio-rs", "{}", url);
            assert_eq!(repo.repo, "axum", "{}", url);
        }
    }

    #[test]
    fn test_parse_dotted_repo_name() {
        let repo = GithubRepository::parse("https://github.com/vercel/next.js").unwrap();
        assert_eq!(repo.repo, "next.js");
    }

    #[test]
    fn test_parse_invalid_urls() {
        for url in [
            "",
            "https://gitlab.com/owner/repo",
            "https://github.com/",
            "https://github.com/owner",
            "https://github.com/owner/",
            "https://github.com/-owner/repo",
            "https://github.com/owner/..",
            "not a url",
        ] {
            let err = GithubRepository::parse(url).unwrap_err();
            assert!(matches!(err, DomainError::Validation { .. }), "{}", url);
        }
    }

    #[test]
    fn test_summary_validation() {
        let summary = ReadmeSummary {
            summary: "A web framework".to_string(),
            key_points: vec![],
            technical_stack: None,
            project_type: String::new(),
        };
        assert!(summary.validate().is_ok());

        let empty = ReadmeSummary::default();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = ReadmeSummary {
            summary: "s".to_string(),
            key_points: vec!["a".to_string()],
            technical_stack: Some(vec!["Rust".to_string()]),
            project_type: "Library".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["keyPoints"][0], "a");
        assert_eq!(json["technicalStack"][0], "Rust");
        assert_eq!(json["projectType"], "Library");
    }
}
