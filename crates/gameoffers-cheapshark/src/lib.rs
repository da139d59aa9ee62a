pub mod client;
pub mod error;
pub mod listing;
pub mod merge;
pub mod numeric;
pub mod resolver;
pub mod source;
pub mod stores;
pub mod types;

#[cfg(test)]
mod test_support;

pub use gameoffers_core::Lookup;

pub use client::CheapSharkClient;
pub use error::CheapSharkError;
pub use listing::{list_deals, DealListQuery, DealPage, ListedDeal};
pub use resolver::{BestKnownDeal, DealResolution, DealResolver, NormalizedDeal};
pub use source::DealSource;
pub use stores::{Clock, StoreDirectory, StoreDirectoryCache, SystemClock, UNKNOWN_STORE};
pub use types::{
    DealGameInfo, DealLookup, DealSummary, GameDeal, GameInfo, GameLookup, GameSummary,
    PriceHistory, RawDealPage, StoreEntry,
};
