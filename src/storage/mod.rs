//! Store implementations and startup seeding

pub mod in_memory;
pub mod seed;

pub use in_memory::InMemoryMarketStore;
pub use seed::{default_catalog, seed_store};
