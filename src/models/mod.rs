use anyhow::bail;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of rental unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Apartment,
    House,
    Studio,
    SharedRoom,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Studio,
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::SharedRoom,
    ];

    /// Tag as stored in the `property_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Studio => "studio",
            PropertyType::SharedRoom => "shared-room",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Studio => "Studio",
            PropertyType::SharedRoom => "PG/Shared Room",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apartment" => Ok(PropertyType::Apartment),
            "house" => Ok(PropertyType::House),
            "studio" => Ok(PropertyType::Studio),
            "shared-room" | "shared_room" | "pg" => Ok(PropertyType::SharedRoom),
            other => bail!("Unknown property type: {}", other),
        }
    }
}

/// Landlord fields embedded in a property row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandlordSummary {
    pub full_name: String,
    pub phone: String,
    pub profile_image: Option<String>,
    pub verified: bool,
}

/// Rental listing as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
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
    pub available: bool,
    pub available_date: NaiveDate,
    #[serde(default)]
    pub utilities: Vec<String>,
    pub pet_policy: String,
    pub parking: bool,
    pub furnished: bool,
    pub student_friendly: bool,
    pub verified: bool,
    pub rating: f64,
    pub review_count: u32,
    pub university: String,
    pub walking_time: u32,
    pub driving_time: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub landlord_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlord: Option<LandlordSummary>,
}

impl Property {
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.iter().any(|a| a == amenity)
    }
}

/// Insert payload for the `properties` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProperty {
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
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub available: bool,
    pub available_date: NaiveDate,
    pub utilities: Vec<String>,
    pub pet_policy: String,
    pub parking: bool,
    pub furnished: bool,
    pub student_friendly: bool,
    pub verified: bool,
    pub rating: f64,
    pub review_count: u32,
    pub university: String,
    pub walking_time: u32,
    pub driving_time: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub landlord_id: String,
}

impl NewProperty {
    /// Materialize a stored row with server-assigned fields
    pub fn into_row(self, id: String, now: DateTime<Utc>) -> Property {
        Property {
            id,
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
            images: self.images,
            amenities: self.amenities,
            available: self.available,
            available_date: self.available_date,
            utilities: self.utilities,
            pet_policy: self.pet_policy,
            parking: self.parking,
            furnished: self.furnished,
            student_friendly: self.student_friendly,
            verified: self.verified,
            rating: self.rating,
            review_count: self.review_count,
            university: self.university,
            walking_time: self.walking_time,
            driving_time: self.driving_time,
            latitude: self.latitude,
            longitude: self.longitude,
            landlord_id: self.landlord_id,
            created_at: now,
            updated_at: now,
            landlord: None,
        }
    }
}

/// Saved property for a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub property_id: String,
    pub created_at: DateTime<Utc>,
}

/// Signed-in user, passed to every operation that needs identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub id: String,
    pub email: Option<String>,
}

impl UserContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_uses_kebab_case_tags() {
        let json = serde_json::to_string(&PropertyType::SharedRoom).unwrap();
        assert_eq!(json, "\"shared-room\"");

        let parsed: PropertyType = serde_json::from_str("\"studio\"").unwrap();
        assert_eq!(parsed, PropertyType::Studio);
        assert_eq!("PG".parse::<PropertyType>().unwrap(), PropertyType::SharedRoom);
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn decodes_backend_row_with_embedded_landlord() {
        let row = serde_json::json!({
            "id": "7d3c",
            "title": "2BHK near campus",
            "description": "Quiet flat",
            "address": "Sector 15, Rohini",
            "city": "Delhi",
            "state": "Delhi",
            "pincode": "110085",
            "price": 25000,
            "bedrooms": 2,
            "bathrooms": 2,
            "square_feet": 900,
            "property_type": "apartment",
            "images": [],
            "amenities": ["WiFi", "AC"],
            "available": true,
            "available_date": "2024-07-01",
            "utilities": ["Water"],
            "pet_policy": "No pets allowed",
            "parking": true,
            "furnished": true,
            "student_friendly": true,
            "verified": false,
            "rating": 4.5,
            "review_count": 12,
            "university": "University of Delhi",
            "walking_time": 10,
            "driving_time": 3,
            "latitude": 28.7041,
            "longitude": 77.1025,
            "landlord_id": "owner-1",
            "created_at": "2024-06-01T10:00:00.123456+00:00",
            "updated_at": "2024-06-01T10:00:00+00:00",
            "landlord": {
                "full_name": "Rajesh Kumar Sharma",
                "phone": "+91-9876543210",
                "profile_image": null,
                "verified": true
            }
        });

        let property: Property = serde_json::from_value(row).unwrap();
        assert_eq!(property.property_type, PropertyType::Apartment);
        assert_eq!(property.available_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert!(property.has_amenity("AC"));
        assert!(!property.has_amenity("ac"));
        assert_eq!(
            property.landlord.as_ref().map(|l| l.full_name.as_str()),
            Some("Rajesh Kumar Sharma")
        );
    }
}
