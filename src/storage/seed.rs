//! Startup data: the beverage catalog and an optional bootstrap admin

use rust_decimal_macros::dec;

use crate::config::SeedConfig;
use crate::core::auth::UserType;
use crate::core::error::MarketResult;
use crate::core::service::{CatalogRepository, MarketStore, UserRepository};
use crate::entities::beverage::NewBeverage;
use crate::entities::user::NewUser;
use crate::entities::user::password::hash_password_blocking;

fn crate_of(
    name: &str,
    description: &str,
    category: &str,
    unit_price: rust_decimal::Decimal,
    image: &str,
    quantity_per_crate: u32,
) -> NewBeverage {
    NewBeverage {
        name: name.to_string(),
        description: Some(description.to_string()),
        category: category.to_string(),
        unit_price,
        vat_included: true,
        image_url: Some(format!(
            "https://images.unsplash.com/{}?q=80&w=200&h=150&auto=format&fit=crop",
            image
        )),
        quantity_per_crate,
    }
}

/// The six crates every marketplace starts with
pub fn default_catalog() -> Vec<NewBeverage> {
    vec![
        crate_of(
            "Heineken Beer",
            "330ml × 24 bottles per crate",
            "beer",
            dec!(265),
            "photo-1600788886242-5c96aabe3757",
            24,
        ),
        crate_of(
            "Coca-Cola Crate",
            "500ml × 24 bottles per crate",
            "soft-drinks",
            dec!(350),
            "photo-1629203432180-71e9b18d855a",
            24,
        ),
        crate_of(
            "St. George Beer",
            "330ml × 24 bottles per crate",
            "beer",
            dec!(240),
            "photo-1608270586620-248524c67de9",
            24,
        ),
        crate_of(
            "Ambo Water",
            "500ml × 20 bottles per crate",
            "water",
            dec!(180),
            "photo-1616118132534-381148898bb4",
            20,
        ),
        crate_of(
            "Dashen Beer",
            "330ml × 24 bottles per crate",
            "beer",
            dec!(230),
            "photo-1518791841217-8f162f1e1131",
            24,
        ),
        crate_of(
            "Sprite Crate",
            "500ml × 24 bottles per crate",
            "soft-drinks",
            dec!(350),
            "photo-1553136122-a3bbf3e2c483",
            24,
        ),
    ]
}

/// Apply the seed section of the configuration.
///
/// Idempotent: a store that already has a catalog or the admin account is
/// left as it is.
pub async fn seed_store(store: &dyn MarketStore, seed: &SeedConfig) -> MarketResult<()> {
    if seed.catalog {
        if store.list_beverages().await?.is_empty() {
            let catalog = default_catalog();
            let count = catalog.len();
            for beverage in catalog {
                store.insert_beverage(beverage).await?;
            }
            tracing::info!("Seeded {} catalog beverages", count);
        } else {
            tracing::info!("Catalog already present, not seeding");
        }
    }

    if let Some(admin) = &seed.admin {
        if store.get_user_by_username(&admin.username).await?.is_some() {
            tracing::warn!("Admin '{}' already exists, not seeding", admin.username);
            return Ok(());
        }
        let password_hash = hash_password_blocking(admin.password.clone()).await?;
        let user = store
            .create_user(NewUser {
                username: admin.username.clone(),
                password_hash,
                email: admin.email.clone(),
                name: admin.name.clone(),
                phone: admin.phone.clone(),
                business_name: None,
                tin: None,
                address: None,
                user_type: UserType::Admin,
                is_vat_registered: false,
            })
            .await?;
        tracing::info!("Seeded admin account '{}' (id {})", user.username, user.id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminSeed;
    use crate::storage::InMemoryMarketStore;

    #[test]
    fn test_catalog_contents() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog[0].name, "Heineken Beer");
        assert_eq!(catalog[0].unit_price, dec!(265));
        assert_eq!(catalog.iter().filter(|b| b.category == "beer").count(), 3);
        assert_eq!(catalog[3].quantity_per_crate, 20);
    }

    #[tokio::test]
    async fn test_seed_catalog_and_admin() {
        let store = InMemoryMarketStore::new();
        let seed = SeedConfig {
            catalog: true,
            admin: Some(AdminSeed {
                username: "root".to_string(),
                password: "secret123".to_string(),
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                phone: "+251911000000".to_string(),
            }),
        };

        seed_store(&store, &seed).await.unwrap();

        assert_eq!(store.list_beverages().await.unwrap().len(), 6);
        let admin = store.get_user_by_username("root").await.unwrap().unwrap();
        assert_eq!(admin.user_type, UserType::Admin);
        assert_ne!(admin.password_hash, "secret123");
    }

    #[tokio::test]
    async fn test_seeding_twice_changes_nothing() {
        let store = InMemoryMarketStore::new();
        let seed = SeedConfig {
            catalog: true,
            admin: Some(AdminSeed {
                username: "root".to_string(),
                password: "secret123".to_string(),
                name: "Root".to_string(),
                email: "root@example.com".to_string(),
                phone: "+251911000000".to_string(),
            }),
        };

        seed_store(&store, &seed).await.unwrap();
        seed_store(&store, &seed).await.unwrap();

        assert_eq!(store.list_beverages().await.unwrap().len(), 6);
        assert_eq!(
            store.list_users_by_type(UserType::Admin).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_seed_nothing() {
        let store = InMemoryMarketStore::new();
        let seed = SeedConfig {
            catalog: false,
            admin: None,
        };
        seed_store(&store, &seed).await.unwrap();
        assert!(store.list_beverages().await.unwrap().is_empty());
    }
}
