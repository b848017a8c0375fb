//! The Movie Store.
//!
//! Holds the authoritative in-memory sequence of movies and implements the
//! CRUD operations on top of it. The store has no interior locking: callers
//! share it behind a single mutex (see `transport::http::AppState`), so every
//! operation below runs as one atomic step.

use crate::domain::movie::{validate_movie, validate_partial_movie, Movie, ValidationErrors};
use anyhow::{bail, Context};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("movie not found")]
    NotFound,

    #[error("invalid movie payload: {0}")]
    Validation(#[from] ValidationErrors),
}

#[derive(Debug, Default)]
pub struct MovieStore {
    movies: Vec<Movie>,
}

impl MovieStore {
    /// Builds a store from already-trusted records.
    ///
    /// Fails if two records share an id.
    pub fn new(movies: Vec<Movie>) -> anyhow::Result<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(movies.len());
        for movie in &movies {
            if !seen.insert(movie.id.as_str()) {
                bail!("duplicate movie id '{}'", movie.id);
            }
        }
        Ok(Self { movies })
    }

    /// Parses a JSON array of movies and checks every record against the write schema.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let records: Vec<JsonValue> =
            serde_json::from_str(raw).context("seed data must be a JSON array")?;

        let mut movies: Vec<Movie> = Vec::with_capacity(records.len());
        for (idx, record) in records.into_iter().enumerate() {
            let id = record
                .get("id")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .with_context(|| format!("seed record #{} has no string id", idx))?
                .to_string();
            let movie = validate_movie(&record)
                .with_context(|| format!("seed record #{} ('{}') is invalid", idx, id))?
                .with_id(id);
            movies.push(movie);
        }

        Self::new(movies)
    }

    /// Reads the seed file at `path`.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All movies, or only those tagged with `genre` (case-insensitive).
    ///
    /// An empty filter string is treated as no filter.
    pub fn list(&self, genre: Option<&str>) -> Vec<Movie> {
        match genre.filter(|g| !g.is_empty()) {
            None => self.movies.clone(),
            Some(wanted) => self
                .movies
                .iter()
                .filter(|m| m.genre.iter().any(|g| g.matches_ignore_case(wanted)))
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Result<&Movie, StoreError> {
        self.movies
            .iter()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)
    }

    /// Validates `candidate`, assigns a fresh id and appends the record.
    pub fn create(&mut self, candidate: &JsonValue) -> Result<Movie, StoreError> {
        let new_movie = validate_movie(candidate)?;
        let movie = new_movie.with_id(uuid::Uuid::new_v4().to_string());
        self.movies.push(movie.clone());
        Ok(movie)
    }

    /// Removes the first record with `id`.
    pub fn delete(&mut self, id: &str) -> Result<Movie, StoreError> {
        let idx = self.position(id)?;
        Ok(self.movies.remove(idx))
    }

    /// Validates the fields present in `patch` and merges them over the record.
    ///
    /// The patch is validated before the lookup, so a bad patch for an unknown id
    /// reports the validation failure.
    pub fn update(&mut self, id: &str, patch: &JsonValue) -> Result<Movie, StoreError> {
        let patch = validate_partial_movie(patch)?;
        let idx = self.position(id)?;

        let mut updated = self.movies[idx].clone();
        patch.apply_to(&mut updated);
        self.movies[idx] = updated.clone();
        Ok(updated)
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.movies
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::NotFound)
    }
}
