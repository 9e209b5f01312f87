pub mod chat;
pub mod health;
pub mod memories;
pub mod transcripts;
pub mod webapp;


use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    core::{auth::require_api_key, config::Settings, state::AppState},
    middleware::{error_handler, request_id},
};

pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let guarded_routes = Router::new()
        .route("/search_memory", post(memories::search_memory))
        .route("/add_memory", post(memories::add_memory))
        .route("/add_transcript", post(transcripts::add_transcript))
        .route(
            "/get_all_memories",
            get(memories::get_all_memories).post(memories::get_all_memories_post),
        )
        .route("/delete_memory", post(memories::delete_memory))
        .route("/delete_all_memories", post(memories::delete_all_memories))
        .route("/chat", post(chat::chat))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_api_key,
        ))
        .with_state(state);

    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/ping", post(health::ping))
        .route(
            "/get_memory_categories",
            get(memories::get_memory_categories),
        );

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .merge(webapp::fallback(&settings.webapp.dist_dir))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::add_request_id))
        .layer(middleware::from_fn(error_handler::handle_errors))
        .layer(cors_layer(&settings.server.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
