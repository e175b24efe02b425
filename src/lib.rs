//! Search, favorites and listing management for a student rental marketplace
//! backed by a hosted PostgREST database.

pub mod backend;
pub mod data;
pub mod marketplace;
pub mod models;
pub mod search;
