//! Stockist discovery

pub mod descriptor;
pub mod handlers;
pub mod matching;

pub use descriptor::StockistDescriptor;
pub use handlers::StockistAppState;
pub use matching::{NearbyStockist, RandomQuoteMatcher, StockistMatcher};
