use crate::backend::traits::{FavoriteRepository, PropertyRepository};
use crate::models::{Favorite, NewProperty, Property};
use crate::search::{Clause, Literal, Order, PropertyQuery};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// In-process stand-in for the hosted backend
///
/// Executes clauses with the same semantics as the remote query API.
#[derive(Default)]
pub struct MemoryBackend {
    properties: RwLock<Vec<Property>>,
    favorites: RwLock<Vec<Favorite>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: Vec<Property>) -> Self {
        Self {
            properties: RwLock::new(properties),
            favorites: RwLock::new(Vec::new()),
        }
    }
}

fn column(property: &Property, name: &str) -> Option<Literal> {
    let value = match name {
        "id" => Literal::Text(property.id.clone()),
        "city" => Literal::Text(property.city.clone()),
        "state" => Literal::Text(property.state.clone()),
        "university" => Literal::Text(property.university.clone()),
        "landlord_id" => Literal::Text(property.landlord_id.clone()),
        "property_type" => Literal::Text(property.property_type.as_str().to_string()),
        "price" => Literal::Int(property.price),
        "bedrooms" => Literal::Int(i64::from(property.bedrooms)),
        "bathrooms" => Literal::Int(i64::from(property.bathrooms)),
        "walking_time" => Literal::Int(i64::from(property.walking_time)),
        "driving_time" => Literal::Int(i64::from(property.driving_time)),
        "available" => Literal::Bool(property.available),
        "furnished" => Literal::Bool(property.furnished),
        "parking" => Literal::Bool(property.parking),
        "verified" => Literal::Bool(property.verified),
        "student_friendly" => Literal::Bool(property.student_friendly),
        _ => return None,
    };
    Some(value)
}

fn satisfies(property: &Property, clause: &Clause) -> bool {
    let Some(actual) = column(property, clause.column()) else {
        return false;
    };

    match (clause, &actual) {
        (Clause::Eq { value, .. }, actual) => value == actual,
        (Clause::Gte { value, .. }, Literal::Int(actual)) => actual >= value,
        (Clause::Lte { value, .. }, Literal::Int(actual)) => actual <= value,
        (Clause::ILike { pattern, .. }, Literal::Text(actual)) => ilike(actual, pattern),
        (Clause::In { values, .. }, actual) => values.contains(actual),
        _ => false,
    }
}

/// `ILIKE` for patterns whose wildcards sit only at the ends
fn ilike(text: &str, pattern: &str) -> bool {
    let (leading, rest) = match pattern.strip_prefix('%') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };

    let (trailing, body) = match rest.strip_suffix('%') {
        Some(body) if !body.ends_with('\\') || body.ends_with("\\\\") => (true, body),
        _ => (false, rest),
    };

    let needle = unescape_like(body).to_lowercase();
    let haystack = text.to_lowercase();

    match (leading, trailing) {
        (true, true) => haystack.contains(&needle),
        (true, false) => haystack.ends_with(&needle),
        (false, true) => haystack.starts_with(&needle),
        (false, false) => haystack == needle,
    }
}

fn unescape_like(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[async_trait]
impl PropertyRepository for MemoryBackend {
    async fn fetch(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
        let properties = self.properties.read().await;
        let mut rows: Vec<Property> = properties
            .iter()
            .filter(|p| query.clauses.iter().all(|clause| satisfies(p, clause)))
            .cloned()
            .collect();

        if let Some(Order::NewestFirst) = query.order {
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        debug!(
            "Memory fetch matched {} of {} rows",
            rows.len(),
            properties.len()
        );
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Property>> {
        let properties = self.properties.read().await;
        Ok(properties.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, property: NewProperty) -> Result<Property> {
        let row = property.into_row(Uuid::new_v4().to_string(), Utc::now());
        self.properties.write().await.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.properties.write().await.retain(|p| p.id != id);
        self.favorites
            .write()
            .await
            .retain(|favorite| favorite.property_id != id);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl FavoriteRepository for MemoryBackend {
    async fn list(&self, user_id: &str) -> Result<Vec<String>> {
        let favorites = self.favorites.read().await;
        Ok(favorites
            .iter()
            .filter(|favorite| favorite.user_id == user_id)
            .map(|favorite| favorite.property_id.clone())
            .collect())
    }

    async fn insert(&self, user_id: &str, property_id: &str) -> Result<()> {
        let mut favorites = self.favorites.write().await;
        if favorites
            .iter()
            .any(|f| f.user_id == user_id && f.property_id == property_id)
        {
            bail!(
                "Duplicate favorite: user {} already saved {}",
                user_id,
                property_id
            );
        }

        favorites.push(Favorite {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            property_id: property_id.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn delete(&self, user_id: &str, property_id: &str) -> Result<()> {
        self.favorites
            .write()
            .await
            .retain(|f| !(f.user_id == user_id && f.property_id == property_id));
        Ok(())
    }
}
