use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
};
use mem0_sdk::{AddRequest, Scope, SearchRequest};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    core::{
        categorizer::{Categorizer, MEMORY_CATEGORIES},
        state::AppState,
    },
    models::{
        error::{ApiError, ApiResult},
        memory::{
            AddMemoryInput, AddOutcome, DeleteAllMemoriesInput, DeleteMemoryInput,
            GetAllMemoriesInput, MemoryListResponse, SearchInput, SearchResponse, StatusResponse,
        },
    },
};

pub async fn search_memory(
    State(state): State<AppState>,
    Json(input): Json<SearchInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let scope = state.scope(input.user_id.as_deref(), input.agent_id.as_deref());

    let request = SearchRequest {
        query: input.query,
        scope: scope.clone(),
        limit: state.search_limit,
    };

    let response = match state.memory.search(request).await {
        Ok(result) => {
            info!(
                "Search for user {:?} returned {} memories",
                scope.user_id,
                result.results.len()
            );
            SearchResponse::Found(result)
        },
        Err(e) => {
            error!(
                "Error searching memory for user {:?}, agent {:?}: {}",
                scope.user_id, scope.agent_id, e
            );
            SearchResponse::failed(e.to_string())
        },
    };

    Ok(Json(response))
}

pub async fn add_memory(
    State(state): State<AppState>,
    Json(input): Json<AddMemoryInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let scope = state.scope(input.user_id.as_deref(), input.agent_id.as_deref());

    let mut metadata = input.metadata;
    if let Some(categorizer) = &state.categorizer
        && !metadata.contains_key("categories")
    {
        let categories = categorizer
            .categorize(&Categorizer::content_of(&input.messages))
            .await;
        metadata.insert("categories".to_string(), Value::from(categories));
    }

    let request = AddRequest::new(input.messages, scope.clone())
        .with_infer(input.infer)
        .with_metadata(metadata)
        .with_prompt(input.prompt.filter(|p| !p.trim().is_empty()));

    let outcome = match state.memory.add(request).await {
        Ok(result) => {
            info!(
                "Added {} memory events for user {:?}",
                result.results.len(),
                scope.user_id
            );
            AddOutcome::added(result)
        },
        Err(e) => {
            error!(
                "Error adding memory for user {:?}, agent {:?}: {}",
                scope.user_id, scope.agent_id, e
            );
            AddOutcome::failed(e.to_string())
        },
    };

    Ok(Json(outcome))
}

async fn list_memories(state: &AppState, input: GetAllMemoriesInput) -> MemoryListResponse {
    let scope = Scope::user(state.user_id(input.user_id.as_deref()));

    match state.memory.get_all(&scope).await {
        Ok(memories) => MemoryListResponse::success(memories),
        Err(e) => {
            error!("Error getting memories for user {:?}: {}", scope.user_id, e);
            MemoryListResponse::failed(e.to_string())
        },
    }
}

pub async fn get_all_memories(
    State(state): State<AppState>,
    Query(input): Query<GetAllMemoriesInput>,
) -> impl IntoResponse {
    Json(list_memories(&state, input).await)
}

/// An empty body means "no fields"; anything else must be valid JSON for `T`.
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))
}

pub async fn get_all_memories_post(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let input: GetAllMemoriesInput = optional_body(&body)?;
    Ok(Json(list_memories(&state, input).await))
}

pub async fn delete_memory(
    State(state): State<AppState>,
    Json(input): Json<DeleteMemoryInput>,
) -> ApiResult<impl IntoResponse> {
    input.validate()?;
    let memory_id = input.memory_id.trim();

    let response = match state.memory.delete(memory_id).await {
        Ok(()) => {
            info!("Deleted memory {}", memory_id);
            StatusResponse::ok("memory deleted")
        },
        Err(e) => {
            error!("Error deleting memory {}: {}", memory_id, e);
            StatusResponse::failed(e.to_string())
        },
    };

    Ok(Json(response))
}

/// Without a body or ids this wipes the whole store.
pub async fn delete_all_memories(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let input: DeleteAllMemoriesInput = optional_body(&body)?;
    let non_blank = |id: Option<String>| id.filter(|id| !id.trim().is_empty());
    let scope = Scope {
        user_id: non_blank(input.user_id),
        agent_id: non_blank(input.agent_id),
        run_id: None,
    };

    let result = if scope.is_empty() {
        info!("Resetting the memory store");
        state.memory.reset().await
    } else {
        info!(
            "Deleting all memories for user {:?}, agent {:?}",
            scope.user_id, scope.agent_id
        );
        state.memory.delete_all(&scope).await
    };

    let response = match result {
        Ok(()) => StatusResponse::ok("all memories deleted"),
        Err(e) => {
            error!("Error deleting all memories: {}", e);
            StatusResponse::failed(e.to_string())
        },
    };

    Ok(Json(response))
}

pub async fn get_memory_categories() -> impl IntoResponse {
    Json(MEMORY_CATEGORIES)
}
