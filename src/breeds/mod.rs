//! Breed validation against an external reference list.
//!
//! A [`BreedValidator`] asks a [`BreedSource`] for the full list of known breed
//! names and matches the requested breed case-insensitively. Answers, both
//! positive and negative, are kept in a [`BreedCache`] for a bounded time.

mod cache;
mod client;

pub use cache::BreedCache;
pub use client::{TheCatApiClient, DEFAULT_URL as THECATAPI_URL};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AgencyError, AgencyResult};

/// Failures talking to the breed reference service.
#[derive(Debug, Error)]
pub enum BreedSourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected response body: {0}")]
    Body(String),
}

/// Provider of the bulk list of known breed names.
#[async_trait]
pub trait BreedSource: Send + Sync {
    async fn fetch_breeds(&self) -> Result<Vec<String>, BreedSourceError>;
}

/// A breed name as spelled by the reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBreed(String);

impl NormalizedBreed {
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Cache key for a breed query: trimmed and lowercased.
pub fn normalize(breed: &str) -> String {
    breed.trim().to_lowercase()
}

/// Validates breed names, consulting the cache before the source.
#[derive(Clone)]
pub struct BreedValidator {
    source: Arc<dyn BreedSource>,
    cache: BreedCache,
}

impl BreedValidator {
    pub fn new(source: Arc<dyn BreedSource>, cache: BreedCache) -> Self {
        Self { source, cache }
    }

    /// Resolve `breed` to its canonical spelling.
    ///
    /// Fails with `InvalidBreed` when the lookup succeeds without a match, and
    /// with `ExternalServiceUnavailable` when the source cannot be reached.
    pub async fn validate(&self, breed: &str) -> AgencyResult<NormalizedBreed> {
        let key = normalize(breed);
        if key.is_empty() {
            return Err(AgencyError::invalid_input("breed must not be empty"));
        }

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(breed = %key, known = cached.is_some(), "Breed cache hit");
            return Self::resolve(cached, breed);
        }

        let names = self.source.fetch_breeds().await.map_err(|e| {
            tracing::warn!(error = %e, "Breed lookup failed");
            AgencyError::ExternalServiceUnavailable(e.to_string())
        })?;
        let found = self.cache.store_list(&names, &key);
        tracing::info!(
            count = names.len(),
            cached = self.cache.len(),
            "Fetched breed reference list"
        );
        Self::resolve(found, breed)
    }

    fn resolve(found: Option<String>, requested: &str) -> AgencyResult<NormalizedBreed> {
        found
            .map(NormalizedBreed)
            .ok_or_else(|| AgencyError::InvalidBreed(requested.trim().to_string()))
    }
}

/// A fixed breed list, for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticBreedSource {
    names: Vec<String>,
}

impl StaticBreedSource {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl BreedSource for StaticBreedSource {
    async fn fetch_breeds(&self) -> Result<Vec<String>, BreedSourceError> {
        Ok(self.names.clone())
    }
}
