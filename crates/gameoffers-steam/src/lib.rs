pub mod client;
pub mod error;
pub mod types;

pub use gameoffers_core::Lookup;

pub use client::{SteamClient, DEFAULT_BASE_URL};
pub use error::SteamError;
pub use types::{AppDetails, Genre, Metacritic, Platforms, PriceOverview, ReleaseDate, SearchHit};
