use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rental_scout::backend::{
    BackendConfig, FavoriteRepository, MemoryBackend, PropertyRepository, RestBackend,
};
use rental_scout::data;
use rental_scout::marketplace::{
    Favorites, ListingDraft, Listings, SearchSession, SearchState, FEATURED_COUNT,
};
use rental_scout::models::{Property, PropertyType, UserContext};
use rental_scout::search::SearchFilters;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rental-scout", version, about = "Search and manage student rental listings")]
struct Cli {
    /// Use the built-in sample listings instead of the hosted backend
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search available listings
    Search(SearchArgs),
    /// Show the newest listings
    Featured,
    /// Show one listing
    Show { id: String },
    /// List a user's saved listings
    Favorites {
        #[arg(long)]
        user: String,
    },
    /// Save or unsave a listing
    Favorite {
        #[arg(long)]
        user: String,
        property_id: String,
    },
    /// Create a listing from a JSON draft
    Add {
        #[arg(long)]
        user: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Withdraw one of your listings
    Remove {
        #[arg(long)]
        user: String,
        property_id: String,
    },
    /// Print the filter options offered on the search bar
    Options,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// City substring, case-insensitive
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    min_price: Option<i64>,
    #[arg(long)]
    max_price: Option<i64>,
    /// Accepted bedroom counts, e.g. 1,2
    #[arg(long, value_delimiter = ',')]
    bedrooms: Vec<u32>,
    /// Accepted property types, e.g. apartment,shared-room
    #[arg(long = "type", value_delimiter = ',')]
    types: Vec<PropertyType>,
    /// Required amenity, repeatable
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    /// Max walking minutes to campus
    #[arg(long)]
    max_distance: Option<u32>,
    #[arg(long)]
    furnished: Option<bool>,
    #[arg(long)]
    parking: Option<bool>,
    #[arg(long)]
    verified: Option<bool>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn filters(&self) -> SearchFilters {
        let defaults = SearchFilters::default();
        SearchFilters {
            city: self.city.clone().unwrap_or_default(),
            min_price: self.min_price.unwrap_or(defaults.min_price),
            max_price: self.max_price.unwrap_or(defaults.max_price),
            bedrooms: self.bedrooms.iter().copied().collect(),
            property_types: self.types.iter().copied().collect(),
            amenities: self.amenities.iter().cloned().collect(),
            max_distance: self.max_distance.unwrap_or(defaults.max_distance),
            furnished: self.furnished,
            parking: self.parking,
            verified: self.verified,
        }
    }
}

struct Backends {
    properties: Arc<dyn PropertyRepository>,
    favorites: Arc<dyn FavoriteRepository>,
}

fn connect(demo: bool) -> Result<Backends> {
    if demo {
        info!("Using in-memory sample listings");
        let backend = Arc::new(MemoryBackend::with_properties(data::sample_properties()));
        return Ok(Backends {
            properties: backend.clone(),
            favorites: backend,
        });
    }

    let config = BackendConfig::from_env()?;
    info!("Connecting to {}", config.url);
    let backend = Arc::new(RestBackend::new(config)?);
    Ok(Backends {
        properties: backend.clone(),
        favorites: backend,
    })
}

fn print_property(index: usize, property: &Property, saved: bool) {
    let marker = if saved { " ♥" } else { "" };
    println!(
        "{}. {} ({} ₹/month){}",
        index + 1,
        property.title,
        property.price,
        marker
    );
    println!(
        "   {}, {} · {} · {} bd / {} ba",
        property.address,
        property.city,
        property.property_type.label(),
        property.bedrooms,
        property.bathrooms
    );
    println!(
        "   {} min walk to {}",
        property.walking_time, property.university
    );
    if !property.amenities.is_empty() {
        println!("   Amenities: {}", property.amenities.join(", "));
    }
    println!("   ID: {}", property.id);
    println!();
}

fn print_list<'a, I>(properties: I, favorites: Option<&Favorites>)
where
    I: IntoIterator<Item = &'a Property>,
{
    for (i, property) in properties.into_iter().enumerate() {
        let saved = favorites.map_or(false, |f| f.is_favorited(&property.id));
        print_property(i, property, saved);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("🏠 Rental Scout");

    if let Command::Options = cli.command {
        println!("Cities: {}", data::CITIES.join(", "));
        println!("Universities: {}", data::UNIVERSITIES.join(", "));
        let types: Vec<&str> = PropertyType::ALL.iter().map(|t| t.as_str()).collect();
        println!("Types: {}", types.join(", "));
        let bedrooms: Vec<String> = data::BEDROOM_OPTIONS.iter().map(u32::to_string).collect();
        println!("Bedrooms: {}", bedrooms.join(", "));
        println!("Search amenities: {}", data::SEARCH_AMENITIES.join(", "));
        println!("Listing amenities: {}", data::LISTING_AMENITIES.join(", "));
        println!("Utilities: {}", data::UTILITIES.join(", "));
        return Ok(());
    }

    let backends = connect(cli.demo)?;

    match cli.command {
        Command::Search(args) => {
            let mut session = SearchSession::new(backends.properties);
            session.search(args.filters()).await?;
            let visible = session.visible();

            if args.json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
                return Ok(());
            }

            if let SearchState::Ready(count) = session.state() {
                let noun = if count == 1 { "property" } else { "properties" };
                println!("{} {} found\n", count, noun);
                print_list(visible, None);
            } else {
                println!("No properties found. Try adjusting your search filters.");
            }
        }
        Command::Featured => {
            let mut session = SearchSession::new(backends.properties);
            session.refresh().await?;
            print_list(session.featured(FEATURED_COUNT), None);
        }
        Command::Show { id } => {
            let listings = Listings::new(backends.properties);
            let property = listings
                .get(&id)
                .await?
                .with_context(|| format!("Property {} not found", id))?;
            print_property(0, &property, false);
            println!("{}", property.description);
            if let Some(landlord) = &property.landlord {
                let badge = if landlord.verified { " (verified)" } else { "" };
                println!("Landlord: {}{} · {}", landlord.full_name, badge, landlord.phone);
            }
        }
        Command::Favorites { user } => {
            let user = UserContext::new(user);
            let mut favorites = Favorites::new(backends.favorites, backends.properties);
            favorites.load(&user).await?;
            let saved = favorites.favorite_properties(&user).await?;
            if saved.is_empty() {
                println!("No favorites yet.");
            } else {
                println!("{} saved\n", saved.len());
                print_list(&saved, Some(&favorites));
            }
        }
        Command::Favorite { user, property_id } => {
            let user = UserContext::new(user);
            let mut favorites = Favorites::new(backends.favorites, backends.properties);
            favorites.load(&user).await?;
            if favorites.toggle(&user, &property_id).await? {
                println!("Saved {}", property_id);
            } else {
                println!("Removed {} from favorites", property_id);
            }
        }
        Command::Add { user, file } => {
            let user = UserContext::new(user);
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let draft: ListingDraft = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid listing draft in {}", file.display()))?;
            let property = Listings::new(backends.properties)
                .create(&user, draft)
                .await?;
            println!("💾 Listed {} as {}", property.title, property.id);
        }
        Command::Remove { user, property_id } => {
            let user = UserContext::new(user);
            Listings::new(backends.properties)
                .remove(&user, &property_id)
                .await?;
            println!("Withdrew {}", property_id);
        }
        Command::Options => {}
    }

    Ok(())
}
