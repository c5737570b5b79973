//! README source trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::GithubRepository;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Fetches the raw README of a repository
///
/// A missing README is reported as `DomainError::NotFound`; any other
/// upstream failure as `DomainError::Provider`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadmeSource: Send + Sync + Debug {
    async fn fetch_readme(&self, repository: &GithubRepository) -> Result<String, DomainError>;
}
