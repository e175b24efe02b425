use crate::backend::{FavoriteRepository, PropertyRepository};
use crate::models::{Property, UserContext};
use crate::search::PropertyQuery;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Saved-listing cache for the signed-in user
///
/// The cache holds one user's ids at a time. A toggle for anyone else
/// reloads from the repository before deciding which way to flip.
pub struct Favorites {
    favorites: Arc<dyn FavoriteRepository>,
    properties: Arc<dyn PropertyRepository>,
    owner: Option<String>,
    ids: BTreeSet<String>,
}

impl Favorites {
    pub fn new(
        favorites: Arc<dyn FavoriteRepository>,
        properties: Arc<dyn PropertyRepository>,
    ) -> Self {
        Self {
            favorites,
            properties,
            owner: None,
            ids: BTreeSet::new(),
        }
    }

    /// Replace the cache with the user's saved ids
    pub async fn load(&mut self, user: &UserContext) -> Result<usize> {
        let ids = self
            .favorites
            .list(&user.id)
            .await
            .with_context(|| format!("Failed to load favorites for {}", user.id))?;
        self.ids = ids.into_iter().collect();
        self.owner = Some(user.id.clone());
        debug!("Loaded {} favorites for {}", self.ids.len(), user.id);
        Ok(self.ids.len())
    }

    /// Flip the saved state of a listing and return the new state
    pub async fn toggle(&mut self, user: &UserContext, property_id: &str) -> Result<bool> {
        if self.owner.as_deref() != Some(user.id.as_str()) {
            self.load(user).await?;
        }

        if self.ids.contains(property_id) {
            self.favorites
                .delete(&user.id, property_id)
                .await
                .context("Failed to remove favorite")?;
            self.ids.remove(property_id);
            info!("{} removed {} from favorites", user.id, property_id);
            Ok(false)
        } else {
            self.favorites
                .insert(&user.id, property_id)
                .await
                .context("Failed to add favorite")?;
            self.ids.insert(property_id.to_string());
            info!("{} saved {}", user.id, property_id);
            Ok(true)
        }
    }

    /// Saved state in the cache of whichever user was loaded last
    pub fn is_favorited(&self, property_id: &str) -> bool {
        self.ids.contains(property_id)
    }

    /// User the cached ids belong to, if any were loaded
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    /// Rows for every listing the user saved, including ones no longer available
    pub async fn favorite_properties(&self, user: &UserContext) -> Result<Vec<Property>> {
        let ids = self
            .favorites
            .list(&user.id)
            .await
            .with_context(|| format!("Failed to load favorites for {}", user.id))?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.properties
            .fetch(&PropertyQuery::by_ids(ids))
            .await
            .context("Failed to fetch favorite properties")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::data::sample_properties;

    fn favorites() -> (Arc<MemoryBackend>, Favorites) {
        let backend = Arc::new(MemoryBackend::with_properties(sample_properties()));
        let favorites = Favorites::new(backend.clone(), backend.clone());
        (backend, favorites)
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let (backend, mut favorites) = favorites();
        let user = UserContext::new("student-1");

        assert!(favorites.toggle(&user, "prop-pune-kothrud").await.unwrap());
        assert!(favorites.is_favorited("prop-pune-kothrud"));
        assert_eq!(backend.list("student-1").await.unwrap().len(), 1);

        assert!(!favorites.toggle(&user, "prop-pune-kothrud").await.unwrap());
        assert!(!favorites.is_favorited("prop-pune-kothrud"));
        assert!(backend.list("student-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_toggle_leaves_cache_alone() {
        let (backend, mut favorites) = favorites();
        let user = UserContext::new("student-1");
        favorites.load(&user).await.unwrap();

        // Saved elsewhere, so the cache is stale and the insert collides.
        FavoriteRepository::insert(backend.as_ref(), "student-1", "prop-delhi-rohini")
            .await
            .unwrap();
        assert!(favorites.toggle(&user, "prop-delhi-rohini").await.is_err());
        assert!(favorites.ids().is_empty());

        favorites.load(&user).await.unwrap();
        assert!(favorites.is_favorited("prop-delhi-rohini"));
    }

    #[tokio::test]
    async fn first_toggle_reads_saved_state_from_the_repository() {
        let (backend, mut favorites) = favorites();
        let user = UserContext::new("student-1");
        FavoriteRepository::insert(backend.as_ref(), "student-1", "prop-delhi-rohini")
            .await
            .unwrap();

        assert!(!favorites.toggle(&user, "prop-delhi-rohini").await.unwrap());
        assert_eq!(favorites.owner(), Some("student-1"));
        assert!(backend.list("student-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn favorite_properties_include_unavailable_rows() {
        let (_, mut favorites) = favorites();
        let user = UserContext::new("student-2");
        assert!(favorites.favorite_properties(&user).await.unwrap().is_empty());

        favorites.toggle(&user, "prop-chennai-guindy").await.unwrap();
        favorites.toggle(&user, "prop-delhi-rohini").await.unwrap();

        let saved = favorites.favorite_properties(&user).await.unwrap();
        let ids: Vec<&str> = saved.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["prop-chennai-guindy", "prop-delhi-rohini"]);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let (_, mut favorites) = favorites();
        let alice = UserContext::new("alice");
        let bob = UserContext::new("bob");

        favorites.toggle(&alice, "prop-mumbai-andheri").await.unwrap();
        assert_eq!(favorites.load(&bob).await.unwrap(), 0);
        assert_eq!(favorites.load(&alice).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn toggle_for_another_user_uses_their_own_saved_state() {
        let (backend, mut favorites) = favorites();
        let alice = UserContext::new("alice");
        let bob = UserContext::new("bob");

        assert!(favorites.toggle(&alice, "prop-delhi-rohini").await.unwrap());
        assert!(favorites.toggle(&bob, "prop-delhi-rohini").await.unwrap());

        assert_eq!(favorites.owner(), Some("bob"));
        assert!(favorites.is_favorited("prop-delhi-rohini"));
        assert_eq!(backend.list("bob").await.unwrap(), vec!["prop-delhi-rohini"]);
        assert_eq!(backend.list("alice").await.unwrap(), vec!["prop-delhi-rohini"]);

        assert!(!favorites.toggle(&alice, "prop-delhi-rohini").await.unwrap());
        assert_eq!(backend.list("bob").await.unwrap(), vec!["prop-delhi-rohini"]);
        assert!(backend.list("alice").await.unwrap().is_empty());
    }
}
