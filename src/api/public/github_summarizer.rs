//! README summarization for API key holders

use axum::extract::State;
use tracing::info;

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SummarizeRequest, SummarizeResponse};
use crate::domain::summarizer::GithubRepository;

/// POST /api/github-summarizer
///
/// The key is checked first, then the body, then one unit of quota is
/// consumed before any outbound call is made.
pub async fn summarize_repository(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
    Json(body): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let github_url = body
        .github_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("GitHub URL is required"))?;

    let repository = GithubRepository::parse(&github_url)?;

    let summarizer = state
        .summarizer
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("README summarization is not configured"))?;

    state.api_key_service.consume_quota(&api_key).await?;

    info!(
        key_id = %api_key.id(),
        owner = %repository.owner,
        repo = %repository.repo,
        "Summarizing repository README"
    );

    let summary = summarizer.summarize(repository).await?;

    Ok(Json(SummarizeResponse::new(summary)))
}
