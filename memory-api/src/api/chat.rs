use axum::{Json, extract::State, response::IntoResponse};
use tracing::error;

use crate::{
    core::state::AppState,
    models::{
        error::{ApiError, ApiResult},
        memory::ChatInput,
    },
};

pub async fn chat(
    State(state): State<AppState>,
    Json(input): Json<ChatInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let agent = state.chat_agent.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Memory-enhanced chat is not configured".to_string())
    })?;

    let scope = state.scope(input.user_id.as_deref(), input.agent_id.as_deref());
    let reply = agent
        .chat_with_memory(
            &input.query,
            &scope,
            input.store_conversation,
            input.metadata,
        )
        .await
        .map_err(|e| {
            error!("Error in chat for user {:?}: {}", scope.user_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(reply))
}
