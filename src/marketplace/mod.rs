pub mod favorites;
pub mod listings;
pub mod session;

pub use favorites::Favorites;
pub use listings::{ListingDraft, Listings};
pub use session::{SearchSession, SearchState, FEATURED_COUNT};
