//! GitHub API integration

mod client;

pub use client::{GithubReadmeClient, DEFAULT_GITHUB_API_URL};
