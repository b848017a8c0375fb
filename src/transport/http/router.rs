use crate::domain::movie::{Genre, Movie, Violation, ViolationCode};
use crate::transport::http::cors::{reject_disallowed_origin, CorsPolicy};
use crate::transport::http::handlers::{health, movies};
use crate::transport::http::types::{
    AppState, HealthResponse, MessageResponse, MoviePayload, ValidationErrorResponse,
};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root_handler,
        health::healthcheck_handler,
        movies::list_movies_handler,
        movies::get_movie_handler,
        movies::create_movie_handler,
        movies::delete_movie_handler,
        movies::update_movie_handler
    ),
    components(schemas(
        Movie,
        Genre,
        MoviePayload,
        Violation,
        ViolationCode,
        ValidationErrorResponse,
        MessageResponse,
        HealthResponse
    ))
)]
pub struct ApiDoc;

/// Routes only, without CORS or docs.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/movies",
            get(movies::list_movies_handler).post(movies::create_movie_handler),
        )
        .route(
            "/movies/:id",
            get(movies::get_movie_handler)
                .delete(movies::delete_movie_handler)
                .patch(movies::update_movie_handler),
        )
        .with_state(app_state)
}

/// The full application: routes, Swagger UI, CORS enforcement and request tracing.
pub fn create_app(app_state: AppState, cors: CorsPolicy) -> Router {
    let cors_layer = cors.layer();
    create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(middleware::from_fn_with_state(
            Arc::new(cors),
            reject_disallowed_origin,
        ))
        .layer(TraceLayer::new_for_http())
}
