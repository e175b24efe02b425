//! Reference option lists and seed listings.

use crate::marketplace::ListingDraft;
use crate::models::{LandlordSummary, Property, PropertyType};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub const CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Chennai", "Kolkata", "Pune", "Ahmedabad",
    "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal", "Visakhapatnam",
    "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra", "Nashik", "Faridabad", "Meerut",
    "Rajkot", "Kalyan-Dombivali", "Vasai-Virar", "Varanasi", "Srinagar", "Aurangabad",
    "Dhanbad", "Amritsar", "Navi Mumbai", "Allahabad",
];

pub const UNIVERSITIES: &[&str] = &[
    "Indian Institute of Technology (IIT) Delhi",
    "Indian Institute of Technology (IIT) Bombay",
    "Indian Institute of Science (IISc) Bangalore",
    "Jawaharlal Nehru University (JNU)",
    "University of Delhi",
    "Banaras Hindu University (BHU)",
    "Jamia Millia Islamia",
    "Jadavpur University",
    "Anna University",
    "Osmania University",
    "University of Mumbai",
    "Pune University",
    "Hyderabad University",
    "Vellore Institute of Technology (VIT)",
];

/// Amenities offered as quick filters on the search bar
pub const SEARCH_AMENITIES: &[&str] = &["WiFi", "AC", "Furnished", "Parking", "Security", "Power Backup"];

/// Amenities a landlord can tick when listing
pub const LISTING_AMENITIES: &[&str] = &[
    "WiFi", "AC", "Furnished", "Security", "Parking", "Water Supply", "Power Backup", "Elevator",
    "Garden", "Balcony", "Kitchen", "Laundry", "Gym", "Swimming Pool", "Study Room",
    "Common Area", "Mess/Canteen", "Library", "Recreation Room", "CCTV", "Warden",
];

pub const UTILITIES: &[&str] = &["Electricity", "Water", "Internet", "Gas", "Maintenance", "Security"];

/// Bedroom counts offered on the search bar (0 is a studio)
pub const BEDROOM_OPTIONS: [u32; 5] = [0, 1, 2, 3, 4];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn listed_at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

struct Seed {
    id: &'static str,
    title: &'static str,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    price: i64,
    bedrooms: u32,
    property_type: PropertyType,
    amenities: &'static [&'static str],
    walking_time: u32,
    furnished: bool,
    parking: bool,
    verified: bool,
    available: bool,
    university: &'static str,
    listed_day: u32,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "prop-delhi-rohini",
        title: "2BHK Furnished Apartment near IIT Delhi",
        address: "Sector 15, Rohini",
        city: "Delhi",
        state: "Delhi",
        price: 25000,
        bedrooms: 2,
        property_type: PropertyType::Apartment,
        amenities: &["WiFi", "AC", "Furnished", "Security", "Parking", "Water Supply"],
        walking_time: 10,
        furnished: true,
        parking: true,
        verified: true,
        available: true,
        university: "Indian Institute of Technology (IIT) Delhi",
        listed_day: 12,
    },
    Seed {
        id: "prop-mumbai-andheri",
        title: "Single Room PG for Girls near Mumbai University",
        address: "Andheri West",
        city: "Mumbai",
        state: "Maharashtra",
        price: 15000,
        bedrooms: 1,
        property_type: PropertyType::SharedRoom,
        amenities: &["WiFi", "Meals Included", "Laundry", "Housekeeping", "Security", "AC"],
        walking_time: 15,
        furnished: true,
        parking: false,
        verified: false,
        available: true,
        university: "University of Mumbai",
        listed_day: 10,
    },
    Seed {
        id: "prop-bangalore-malleswaram",
        title: "3BHK Independent House near IISc Bangalore",
        address: "Malleswaram",
        city: "Bangalore",
        state: "Karnataka",
        price: 35000,
        bedrooms: 3,
        property_type: PropertyType::House,
        amenities: &["WiFi", "Garden", "Parking", "Kitchen", "Balcony", "Security"],
        walking_time: 20,
        furnished: false,
        parking: true,
        verified: true,
        available: true,
        university: "Indian Institute of Science (IISc) Bangalore",
        listed_day: 8,
    },
    Seed {
        id: "prop-new-delhi-munirka",
        title: "Compact Studio near JNU",
        address: "Munirka Village",
        city: "New Delhi",
        state: "Delhi",
        price: 12000,
        bedrooms: 0,
        property_type: PropertyType::Studio,
        amenities: &["WiFi", "Power Backup"],
        walking_time: 5,
        furnished: true,
        parking: false,
        verified: false,
        available: true,
        university: "Jawaharlal Nehru University (JNU)",
        listed_day: 15,
    },
    Seed {
        id: "prop-pune-kothrud",
        title: "Shared Flat for Engineering Students",
        address: "Kothrud",
        city: "Pune",
        state: "Maharashtra",
        price: 9000,
        bedrooms: 2,
        property_type: PropertyType::SharedRoom,
        amenities: &[],
        walking_time: 25,
        furnished: false,
        parking: false,
        verified: false,
        available: true,
        university: "Pune University",
        listed_day: 3,
    },
    Seed {
        id: "prop-hyderabad-gachibowli",
        title: "Premium 4BHK near Hyderabad University",
        address: "Gachibowli",
        city: "Hyderabad",
        state: "Telangana",
        price: 120000,
        bedrooms: 4,
        property_type: PropertyType::House,
        amenities: &["WiFi", "AC", "Gym", "Swimming Pool", "Parking", "CCTV"],
        walking_time: 45,
        furnished: true,
        parking: true,
        verified: true,
        available: true,
        university: "Hyderabad University",
        listed_day: 1,
    },
    Seed {
        id: "prop-chennai-guindy",
        title: "1BHK near Anna University (let)",
        address: "Guindy",
        city: "Chennai",
        state: "Tamil Nadu",
        price: 14000,
        bedrooms: 1,
        property_type: PropertyType::Apartment,
        amenities: &["WiFi", "Water Supply"],
        walking_time: 8,
        furnished: false,
        parking: true,
        verified: true,
        available: false,
        university: "Anna University",
        listed_day: 20,
    },
];

fn seed_row(seed: &Seed) -> Property {
    let listed = listed_at(seed.listed_day);
    Property {
        id: seed.id.to_string(),
        title: seed.title.to_string(),
        description: format!("{} in {}, {}.", seed.title, seed.address, seed.city),
        address: seed.address.to_string(),
        city: seed.city.to_string(),
        state: seed.state.to_string(),
        pincode: String::new(),
        price: seed.price,
        bedrooms: seed.bedrooms,
        bathrooms: seed.bedrooms.max(1),
        square_feet: 300 + seed.bedrooms * 300,
        property_type: seed.property_type,
        images: Vec::new(),
        amenities: strings(seed.amenities),
        available: seed.available,
        available_date: date(2024, 7, 1),
        utilities: strings(&["Electricity", "Water"]),
        pet_policy: "No pets allowed".to_string(),
        parking: seed.parking,
        furnished: seed.furnished,
        student_friendly: true,
        verified: seed.verified,
        rating: 0.0,
        review_count: 0,
        university: seed.university.to_string(),
        walking_time: seed.walking_time,
        driving_time: seed.walking_time / 3,
        latitude: 0.0,
        longitude: 0.0,
        landlord_id: "landlord-sample".to_string(),
        created_at: listed,
        updated_at: listed,
        landlord: Some(LandlordSummary {
            full_name: "Rajesh Kumar Sharma".to_string(),
            phone: "+91-9876543210".to_string(),
            profile_image: None,
            verified: true,
        }),
    }
}

/// Listings used to seed the in-memory backend
pub fn sample_properties() -> Vec<Property> {
    SEEDS.iter().map(seed_row).collect()
}

/// A complete listing form, as a landlord would submit it
pub fn sample_listing_draft() -> ListingDraft {
    ListingDraft {
        title: "Sunny 1BHK near Jadavpur University".to_string(),
        description: "Top floor flat with balcony and study corner.".to_string(),
        address: "Raja S.C. Mullick Road".to_string(),
        city: "Kolkata".to_string(),
        state: "West Bengal".to_string(),
        pincode: "700032".to_string(),
        price: 11000,
        bedrooms: 1,
        bathrooms: 1,
        square_feet: 450,
        property_type: PropertyType::Apartment,
        images: vec![
            "https://images.pexels.com/photos/1743229/pexels-photo-1743229.jpeg".to_string(),
            "  ".to_string(),
        ],
        amenities: strings(&["WiFi", "Balcony", "Study Room"]),
        available_date: date(2024, 8, 1),
        utilities: strings(&["Electricity", "Water"]),
        pet_policy: "No pets allowed".to_string(),
        parking: false,
        furnished: true,
        student_friendly: true,
        university: "Jadavpur University".to_string(),
        walking_time: 12,
        driving_time: 4,
        latitude: 22.4986,
        longitude: 88.3716,
    }
}
