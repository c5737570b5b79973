//! README summarizer request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::summarizer::RepositorySummary;

/// Body of `POST /api/github-summarizer`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarizeRequest {
    #[serde(rename = "githubUrl", default)]
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeResponse {
    pub success: bool,
    pub message: String,
    pub data: RepositorySummary,
}

impl SummarizeResponse {
    pub fn new(data: RepositorySummary) -> Self {
        Self {
            success: true,
            message: "README summarized successfully".to_string(),
            data,
        }
    }
}
