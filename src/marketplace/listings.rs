use crate::backend::PropertyRepository;
use crate::models::{NewProperty, Property, PropertyType, UserContext};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Landlord-supplied listing fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub square_feet: u32,
    pub property_type: PropertyType,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub available_date: NaiveDate,
    #[serde(default)]
    pub utilities: Vec<String>,
    pub pet_policy: String,
    pub parking: bool,
    pub furnished: bool,
    pub student_friendly: bool,
    pub university: String,
    pub walking_time: u32,
    pub driving_time: u32,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl ListingDraft {
    /// Insert payload owned by `landlord_id`; new listings start available and unverified
    pub fn into_new_property(self, landlord_id: &str) -> NewProperty {
        let images = self
            .images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();

        NewProperty {
            title: self.title,
            description: self.description,
            address: self.address,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            property_type: self.property_type,
            images,
            amenities: self.amenities,
            available: true,
            available_date: self.available_date,
            utilities: self.utilities,
            pet_policy: self.pet_policy,
            parking: self.parking,
            furnished: self.furnished,
            student_friendly: self.student_friendly,
            verified: false,
            rating: 0.0,
            review_count: 0,
            university: self.university,
            walking_time: self.walking_time,
            driving_time: self.driving_time,
            latitude: self.latitude,
            longitude: self.longitude,
            landlord_id: landlord_id.to_string(),
        }
    }
}

/// Create, look up and withdraw listings
pub struct Listings {
    repository: Arc<dyn PropertyRepository>,
}

impl Listings {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, user: &UserContext, draft: ListingDraft) -> Result<Property> {
        let property = self
            .repository
            .insert(draft.into_new_property(&user.id))
            .await
            .context("Failed to add property")?;
        info!("{} listed {} ({})", user.id, property.title, property.id);
        Ok(property)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Property>> {
        self.repository
            .get(id)
            .await
            .with_context(|| format!("Failed to fetch property {}", id))
    }

    /// Withdraw a listing; only its landlord may do so
    pub async fn remove(&self, user: &UserContext, id: &str) -> Result<()> {
        let property = self
            .get(id)
            .await?
            .with_context(|| format!("Property {} not found", id))?;

        if property.landlord_id != user.id {
            bail!("{} is not the landlord of property {}", user.id, id);
        }

        self.repository.delete(id).await?;
        info!("{} withdrew {}", user.id, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::data::sample_listing_draft;
    use crate::search::{PropertyQuery, SearchFilters};

    fn listings() -> (Arc<MemoryBackend>, Listings) {
        let backend = Arc::new(MemoryBackend::new());
        (backend.clone(), Listings::new(backend))
    }

    #[test]
    fn draft_forces_server_side_defaults() {
        let property = sample_listing_draft().into_new_property("owner-7");
        assert!(property.available);
        assert!(!property.verified);
        assert_eq!(property.rating, 0.0);
        assert_eq!(property.review_count, 0);
        assert_eq!(property.landlord_id, "owner-7");
        assert_eq!(property.images.len(), 1);
    }

    #[tokio::test]
    async fn created_listing_is_searchable() {
        let (backend, listings) = listings();
        let landlord = UserContext::new("owner-7");

        let created = listings
            .create(&landlord, sample_listing_draft())
            .await
            .unwrap();
        assert_eq!(listings.get(&created.id).await.unwrap(), Some(created.clone()));

        let filters = SearchFilters {
            city: "kolkata".to_string(),
            ..SearchFilters::default()
        };
        let found = backend
            .fetch(&PropertyQuery::from_filters(&filters))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
    }

    #[tokio::test]
    async fn only_the_landlord_can_remove() {
        let (_, listings) = listings();
        let landlord = UserContext::new("owner-7");
        let stranger = UserContext::new("someone-else");

        let created = listings
            .create(&landlord, sample_listing_draft())
            .await
            .unwrap();

        let err = listings.remove(&stranger, &created.id).await.unwrap_err();
        assert!(err.to_string().contains("not the landlord"));
        assert!(listings.get(&created.id).await.unwrap().is_some());

        listings.remove(&landlord, &created.id).await.unwrap();
        assert!(listings.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn removing_unknown_listing_fails() {
        let (_, listings) = listings();
        let landlord = UserContext::new("owner-7");
        assert!(listings.remove(&landlord, "nope").await.is_err());
    }
}
