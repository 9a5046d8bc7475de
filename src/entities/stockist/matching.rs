//! Stockist matching
//!
//! There is no geolocation yet: [`RandomQuoteMatcher`] annotates every
//! stockist with a made-up distance, rating, fee and delivery window. Swap in
//! another [`StockistMatcher`] through the server builder once real quotes
//! exist.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Mutex;

use crate::core::ids::UserId;
use crate::entities::user::User;

/// Public view of a stockist plus its quote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStockist {
    pub id: UserId,
    pub name: String,
    pub business_name: Option<String>,
    pub is_vat_registered: bool,
    pub address: Option<String>,
    /// Kilometres
    pub distance: Decimal,
    pub rating: Decimal,
    pub delivery_fee: Decimal,
    pub estimated_time: String,
}

pub trait StockistMatcher: Send + Sync {
    /// Quote each stockist, closest first
    fn rank(&self, stockists: Vec<User>) -> Vec<NearbyStockist>;
}

pub struct RandomQuoteMatcher {
    rng: Mutex<StdRng>,
}

impl RandomQuoteMatcher {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic quotes for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn quote<R: Rng + ?Sized>(rng: &mut R, stockist: User) -> NearbyStockist {
        let distance = Decimal::new(rng.random_range(0..200), 2);
        let rating = Decimal::new(rng.random_range(35..=50), 1);
        let delivery_fee = Decimal::from(rng.random_range(40i64..100));
        let earliest: u32 = 15 + rng.random_range(0..25);
        let latest: u32 = 30 + rng.random_range(0..15);

        NearbyStockist {
            id: stockist.id,
            name: stockist.name,
            business_name: stockist.business_name,
            is_vat_registered: stockist.is_vat_registered,
            address: stockist.address,
            distance,
            rating,
            delivery_fee,
            estimated_time: format!("{}-{} min", earliest, latest),
        }
    }
}

impl Default for RandomQuoteMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StockistMatcher for RandomQuoteMatcher {
    fn rank(&self, stockists: Vec<User>) -> Vec<NearbyStockist> {
        let mut quotes: Vec<NearbyStockist> = {
            // a panic mid-draw leaves the generator usable
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            stockists
                .into_iter()
                .map(|stockist| Self::quote(&mut *rng, stockist))
                .collect()
        };
        quotes.sort_by(|a, b| a.distance.cmp(&b.distance).then(a.id.cmp(&b.id)));
        quotes
    }
}
