pub mod filter;
pub mod query;

pub use filter::{apply, matches, SearchFilters};
pub use query::{to_remote_query, Clause, Literal, Order, PropertyQuery};
