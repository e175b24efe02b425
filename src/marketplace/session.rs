use crate::backend::PropertyRepository;
use crate::models::Property;
use crate::search::{apply, PropertyQuery, SearchFilters};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of listings shown on the landing page
pub const FEATURED_COUNT: usize = 6;

/// Outcome of the latest fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// Nothing matched, not an error
    Empty,
    Ready(usize),
    /// Last fetch failed; earlier results are still held
    Failed(String),
}

/// One user's browsing state: remote results plus the active filters
///
/// The remote fetch applies the coarse filter and `visible` re-filters
/// locally, so quick changes like the city box need no round trip.
pub struct SearchSession {
    repository: Arc<dyn PropertyRepository>,
    filters: SearchFilters,
    results: Vec<Property>,
    error: Option<String>,
}

impl SearchSession {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self {
            repository,
            filters: SearchFilters::default(),
            results: Vec::new(),
            error: None,
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Apply new filters and fetch from the backend
    pub async fn search(&mut self, filters: SearchFilters) -> Result<usize> {
        self.filters = filters;
        self.refresh().await
    }

    /// Fetch again with the current filters
    ///
    /// On failure the previous results stay untouched.
    pub async fn refresh(&mut self) -> Result<usize> {
        let query = PropertyQuery::from_filters(&self.filters);
        debug!(
            "Searching {} with {} clauses",
            self.repository.backend_name(),
            query.clauses.len()
        );

        match self.repository.fetch(&query).await {
            Ok(results) => {
                self.results = results;
                self.error = None;
                let visible = self.visible().len();
                info!(
                    "Fetched {} properties, {} visible after local filtering",
                    self.results.len(),
                    visible
                );
                Ok(visible)
            }
            Err(err) => {
                warn!("Property fetch failed: {:#}", err);
                self.error = Some(format!("{:#}", err));
                Err(err)
            }
        }
    }

    /// Narrow by city without refetching
    ///
    /// No fetch happens, so a failure from the last fetch is still reported
    /// by `state` until a later `search` or `refresh` succeeds.
    pub fn quick_search(&mut self, city: &str) {
        self.filters.city = city.trim().to_string();
    }

    pub async fn clear_filters(&mut self) -> Result<usize> {
        self.search(SearchFilters::default()).await
    }

    /// Remote results after the local re-filter
    pub fn visible(&self) -> Vec<&Property> {
        apply(&self.results, &self.filters)
    }

    /// First `count` remote results, unfiltered
    pub fn featured(&self, count: usize) -> &[Property] {
        &self.results[..count.min(self.results.len())]
    }

    pub fn state(&self) -> SearchState {
        if let Some(error) = &self.error {
            return SearchState::Failed(error.clone());
        }
        match self.visible().len() {
            0 => SearchState::Empty,
            n => SearchState::Ready(n),
        }
    }
}
