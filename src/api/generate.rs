//! Prompt generation endpoint

use axum::extract::State;

use super::state::AppState;
use super::types::{ApiError, GenerateRequest, GenerateResponse, Json};

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let prompt = state.generation_service.generate(request.into()).await?;

    Ok(Json(GenerateResponse { prompt }))
}
