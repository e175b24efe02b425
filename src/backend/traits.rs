use crate::models::{NewProperty, Property};
use crate::search::PropertyQuery;
use anyhow::Result;
use async_trait::async_trait;

/// Access to the `properties` collection
/// Implemented by the hosted REST backend and by the in-memory store used in tests
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Run a filtered fetch
    async fn fetch(&self, query: &PropertyQuery) -> Result<Vec<Property>>;

    async fn get(&self, id: &str) -> Result<Option<Property>>;

    /// Insert a listing and return the stored row
    async fn insert(&self, property: NewProperty) -> Result<Property>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Get the name of the backend
    fn backend_name(&self) -> &'static str;
}

/// Access to the `favorites` collection
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Property ids saved by the user
    async fn list(&self, user_id: &str) -> Result<Vec<String>>;

    async fn insert(&self, user_id: &str, property_id: &str) -> Result<()>;

    async fn delete(&self, user_id: &str, property_id: &str) -> Result<()>;
}
