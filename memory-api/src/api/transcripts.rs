use axum::{Json, extract::State, response::IntoResponse};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    models::{
        error::ApiResult,
        memory::{AddOutcome, AddTranscriptInput, TranscriptResponse},
    },
};

/// Stores the transcript verbatim, then optionally extracts memories from it.
///
/// The two writes are independent: a failed extraction does not undo storage.
pub async fn add_transcript(
    State(state): State<AppState>,
    Json(input): Json<AddTranscriptInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let scope = state.scope(input.user_id.as_deref(), input.agent_id.as_deref());
    info!(
        "Processing transcript of {} messages for user {:?}",
        input.transcript.len(),
        scope.user_id
    );

    let store = state
        .transcripts
        .store_request(&input.transcript, &scope, &input.metadata);
    let storage = match state.memory.add(store).await {
        Ok(result) => AddOutcome::added(result),
        Err(e) => {
            error!(
                "Error storing transcript for user {:?}, agent {:?}: {}",
                scope.user_id, scope.agent_id, e
            );
            AddOutcome::failed(e.to_string())
        },
    };

    let extraction = if input.extract_memories {
        let extract = state.transcripts.extraction_request(
            &input.transcript,
            &scope,
            &input.metadata,
            input.prompt.as_deref(),
        );
        Some(match state.memory.add(extract).await {
            Ok(result) => AddOutcome::added(result),
            Err(e) => {
                error!(
                    "Error extracting memories for user {:?}, agent {:?}: {}",
                    scope.user_id, scope.agent_id, e
                );
                AddOutcome::failed(e.to_string())
            },
        })
    } else {
        None
    };

    Ok(Json(TranscriptResponse::new(storage, extraction)))
}
