use crate::transport::http::types::{AppState, HealthResponse, MessageResponse};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting", body = MessageResponse)
    )
)]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hola mundo"))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let movies = state.store.lock().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        movies,
    })
}
