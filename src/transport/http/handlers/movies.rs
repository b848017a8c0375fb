use crate::domain::movie::Movie;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{
    AppState, ListMoviesQuery, MessageResponse, MoviePayload, ValidationErrorResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/movies",
    params(ListMoviesQuery),
    responses(
        (status = 200, description = "Movies, optionally filtered by genre", body = [Movie])
    )
)]
pub async fn list_movies_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Movie>> {
    let query = ListMoviesQuery::from_pairs(pairs);
    let store = state.store.lock().await;
    Json(store.list(query.genre.as_deref()))
}

#[utoipa::path(
    get,
    path = "/movies/{id}",
    params(
        ("id" = String, Path, description = "Movie id")
    ),
    responses(
        (status = 200, description = "The movie", body = Movie),
        (status = 404, description = "No movie with this id", body = MessageResponse)
    )
)]
pub async fn get_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    let store = state.store.lock().await;
    let movie = store.get(&id)?;
    Ok(Json(movie.clone()))
}

#[utoipa::path(
    post,
    path = "/movies",
    request_body = MoviePayload,
    responses(
        (status = 201, description = "Movie created", body = Movie),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse)
    )
)]
pub async fn create_movie_handler(
    State(state): State<AppState>,
    payload: Result<Json<MoviePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(MoviePayload(candidate)) = payload?;

    let mut store = state.store.lock().await;
    let movie = store.create(&candidate).inspect_err(|e| {
        tracing::debug!(error = %e, "rejected movie create");
    })?;
    tracing::info!(id = %movie.id, title = %movie.title, total = store.len(), "movie created");

    Ok((StatusCode::CREATED, Json(movie)))
}

#[utoipa::path(
    delete,
    path = "/movies/{id}",
    params(
        ("id" = String, Path, description = "Movie id")
    ),
    responses(
        (status = 204, description = "Movie deleted"),
        (status = 404, description = "No movie with this id", body = MessageResponse)
    )
)]
pub async fn delete_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.lock().await;
    let removed = store.delete(&id)?;
    tracing::info!(id = %removed.id, total = store.len(), "movie deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/movies/{id}",
    params(
        ("id" = String, Path, description = "Movie id")
    ),
    request_body = MoviePayload,
    responses(
        (status = 200, description = "Movie updated", body = Movie),
        (status = 400, description = "Validation failed", body = ValidationErrorResponse),
        (status = 404, description = "No movie with this id", body = MessageResponse)
    )
)]
pub async fn update_movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoviePayload>, JsonRejection>,
) -> Result<Json<Movie>, ApiError> {
    let Json(MoviePayload(patch)) = payload?;

    let mut store = state.store.lock().await;
    let movie = store.update(&id, &patch).inspect_err(|e| {
        tracing::debug!(id = %id, error = %e, "rejected movie update");
    })?;
    tracing::info!(id = %movie.id, "movie updated");

    Ok(Json(movie))
}
