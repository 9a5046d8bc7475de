use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ids::BeverageId;

/// A catalog entry, sold by the crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beverage {
    pub id: BeverageId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    /// Price of one crate
    pub unit_price: Decimal,
    pub vat_included: bool,
    pub image_url: Option<String>,
    pub quantity_per_crate: u32,
    pub created_at: DateTime<Utc>,
}

impl Beverage {
    /// `all` matches everything, any other filter is a case-insensitive
    /// exact match on the category.
    pub fn in_category(&self, filter: &str) -> bool {
        filter.eq_ignore_ascii_case(ALL_CATEGORIES) || self.category.eq_ignore_ascii_case(filter)
    }
}

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub struct NewBeverage {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub unit_price: Decimal,
    pub vat_included: bool,
    pub image_url: Option<String>,
    pub quantity_per_crate: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}
