use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/sql", post(handlers::sql_handler))
        .route(
            "/chat",
            get(handlers::get_chat_handler)
                .post(handlers::post_chat_handler)
                .delete(handlers::reset_chat_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
