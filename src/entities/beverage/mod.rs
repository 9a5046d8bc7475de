//! Beverage catalog (read-only over HTTP; filled at seed time)

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::BeverageDescriptor;
pub use handlers::CatalogAppState;
pub use model::{ALL_CATEGORIES, Beverage, CatalogQuery, NewBeverage};
