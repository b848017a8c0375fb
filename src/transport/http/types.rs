use crate::app::movie_store::MovieStore;
use crate::domain::movie::Violation;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::{IntoParams, ToSchema};

pub const NOT_FOUND_MESSAGE: &str = "Movie not found";
pub const CORS_REJECTED_MESSAGE: &str = "Not allowed by CORS";

#[derive(Clone)]
pub struct AppState {
    /// The single lock around the store; every handler holds it for one whole operation.
    pub store: Arc<Mutex<MovieStore>>,
}

impl AppState {
    pub fn new(store: MovieStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

/// Query string of `GET /movies`.
///
/// Built from the raw key/value pairs so that repeated or unknown keys never
/// fail extraction. When `genre` is repeated the first value wins.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMoviesQuery {
    /// Only return movies tagged with this genre (case-insensitive).
    pub genre: Option<String>,
}

impl ListMoviesQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let genre = pairs
            .into_iter()
            .find(|(key, _)| key == "genre")
            .map(|(_, value)| value);
        Self { genre }
    }
}

/// Raw JSON body of a create or patch request. Validation happens in the store.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(transparent)]
pub struct MoviePayload(#[schema(value_type = Object)] pub JsonValue);

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: Vec<Violation>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Number of movies currently held in memory.
    pub movies: usize,
}
