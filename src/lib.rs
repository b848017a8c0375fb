pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::movie_store::{MovieStore, StoreError};
pub use domain::movie::{Genre, Movie, MoviePatch, NewMovie, ValidationErrors, Violation};
pub use infra::config::ServerConfig;
