use crate::models::{Property, PropertyType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User-chosen search constraints
///
/// Empty sets and absent tri-states mean "no constraint". Numeric bounds
/// are inclusive. The default value constrains nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchFilters {
    /// Case-insensitive substring of the city
    pub city: String,
    pub min_price: i64,
    pub max_price: i64,
    pub bedrooms: BTreeSet<u32>,
    pub property_types: BTreeSet<PropertyType>,
    /// Every listed amenity must be present
    pub amenities: BTreeSet<String>,
    /// Max walking minutes to campus
    pub max_distance: u32,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    pub verified: Option<bool>,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            city: String::new(),
            min_price: 0,
            max_price: i64::MAX,
            bedrooms: BTreeSet::new(),
            property_types: BTreeSet::new(),
            amenities: BTreeSet::new(),
            max_distance: u32::MAX,
            furnished: None,
            parking: None,
            verified: None,
        }
    }
}

impl SearchFilters {
    pub fn toggle_bedrooms(&mut self, count: u32) {
        if !self.bedrooms.remove(&count) {
            self.bedrooms.insert(count);
        }
    }

    pub fn toggle_property_type(&mut self, kind: PropertyType) {
        if !self.property_types.remove(&kind) {
            self.property_types.insert(kind);
        }
    }

    pub fn toggle_amenity(&mut self, amenity: &str) {
        if !self.amenities.remove(amenity) {
            self.amenities.insert(amenity.to_string());
        }
    }

    /// Number of selected options, as shown on the filter badge
    pub fn active_filter_count(&self) -> usize {
        let flags = [self.furnished, self.parking, self.verified]
            .iter()
            .filter(|flag| **flag == Some(true))
            .count();

        self.bedrooms.len() + self.property_types.len() + self.amenities.len() + flags
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == SearchFilters::default()
    }
}

/// Decide whether a property passes every active constraint
pub fn matches(property: &Property, filters: &SearchFilters) -> bool {
    if !filters.city.is_empty()
        && !property
            .city
            .to_lowercase()
            .contains(&filters.city.to_lowercase())
    {
        return false;
    }

    if property.price < filters.min_price || property.price > filters.max_price {
        return false;
    }

    if !filters.bedrooms.is_empty() && !filters.bedrooms.contains(&property.bedrooms) {
        return false;
    }

    if !filters.property_types.is_empty()
        && !filters.property_types.contains(&property.property_type)
    {
        return false;
    }

    if !filters
        .amenities
        .iter()
        .all(|amenity| property.has_amenity(amenity))
    {
        return false;
    }

    if property.walking_time > filters.max_distance {
        return false;
    }

    flag_matches(filters.furnished, property.furnished)
        && flag_matches(filters.parking, property.parking)
        && flag_matches(filters.verified, property.verified)
}

fn flag_matches(wanted: Option<bool>, actual: bool) -> bool {
    wanted.map_or(true, |wanted| wanted == actual)
}

/// Keep the matching properties, preserving order
pub fn apply<'a, I>(properties: I, filters: &SearchFilters) -> Vec<&'a Property>
where
    I: IntoIterator<Item = &'a Property>,
{
    properties
        .into_iter()
        .filter(|property| matches(property, filters))
        .collect()
}
