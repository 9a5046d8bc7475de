use std::sync::Arc;
use tracing::{info, warn};

use crate::core::auth::{AuthPolicy, UserType};
use crate::core::error::{MarketError, MarketResult};
use crate::core::events::{EventBus, MarketEvent};
use crate::core::extractors::SessionUser;
use crate::core::ids::UserId;
use crate::core::service::{CatalogRepository, InventoryRepository, MarketStore, UserRepository};
use crate::entities::inventory::model::{InventoryEntry, StockistInventory, UpsertInventoryRequest};

/// Per-stockist stock levels
#[derive(Clone)]
pub struct InventoryTracker {
    store: Arc<dyn MarketStore>,
    events: EventBus,
}

impl InventoryTracker {
    pub fn new(store: Arc<dyn MarketStore>, events: EventBus) -> Self {
        Self { store, events }
    }

    /// Set the quantity a stockist holds of one beverage.
    ///
    /// Stockists edit their own stock; vansales and admins name the stockist.
    pub async fn upsert(
        &self,
        actor: &SessionUser,
        request: UpsertInventoryRequest,
    ) -> MarketResult<StockistInventory> {
        AuthPolicy::role_or_admin(&[UserType::Stockist, UserType::Vansales])
            .enforce(&actor.context(), "edit inventory")?;

        let stockist_id = match (actor.user_type, request.stockist_id) {
            (UserType::Stockist, Some(id)) if id != actor.id => {
                return Err(MarketError::forbidden(
                    "stockists can only edit their own inventory",
                ));
            }
            (UserType::Stockist, _) => actor.id,
            (_, Some(id)) => id,
            (_, None) => {
                return Err(MarketError::invalid_field(
                    "stockistId",
                    "stockistId is required",
                ));
            }
        };

        self.ensure_stockist(stockist_id).await?;
        if self.store.get_beverage(request.beverage_id).await?.is_none() {
            return Err(MarketError::invalid_field(
                "beverageId",
                format!("beverage {} does not exist", request.beverage_id),
            ));
        }
        let quantity = u32::try_from(request.quantity).map_err(|_| {
            MarketError::invalid_field("quantity", "quantity must not be negative")
        })?;

        let row = self
            .store
            .upsert_inventory(stockist_id, request.beverage_id, quantity)
            .await?;

        info!(
            "Inventory of stockist {} for beverage {} set to {}",
            row.stockist_id, row.beverage_id, row.quantity
        );
        self.events.publish(MarketEvent::InventoryUpdated {
            stockist_id: row.stockist_id,
            beverage_id: row.beverage_id,
            quantity: row.quantity,
        });

        Ok(row)
    }

    /// Inventory rows joined with their catalog entries
    pub async fn inventory_for(&self, stockist_id: UserId) -> MarketResult<Vec<InventoryEntry>> {
        let rows = self.store.list_inventory(stockist_id).await?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match self.store.get_beverage(row.beverage_id).await? {
                Some(beverage) => entries.push(InventoryEntry { row, beverage }),
                None => warn!(
                    "Skipping inventory row {}: beverage {} not in catalog",
                    row.id, row.beverage_id
                ),
            }
        }
        Ok(entries)
    }

    async fn ensure_stockist(&self, user_id: UserId) -> MarketResult<()> {
        match self.store.get_user(user_id).await? {
            Some(user) if user.user_type == UserType::Stockist => Ok(()),
            Some(_) => Err(MarketError::invalid_field(
                "stockistId",
                format!("user {} is not a stockist", user_id),
            )),
            None => Err(MarketError::invalid_field(
                "stockistId",
                format!("user {} does not exist", user_id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::BeverageId;
    use crate::entities::user::NewUser;
    use crate::storage::{InMemoryMarketStore, default_catalog};
    use axum::http::StatusCode;

    async fn user(store: &InMemoryMarketStore, username: &str, user_type: UserType) -> SessionUser {
        store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                email: format!("{}@example.com", username),
                name: username.to_string(),
                phone: "+251911000000".to_string(),
                business_name: None,
                tin: None,
                address: None,
                user_type,
                is_vat_registered: false,
            })
            .await
            .unwrap()
            .session_user()
    }

    async fn setup() -> (InventoryTracker, Arc<InMemoryMarketStore>, SessionUser) {
        let store = Arc::new(InMemoryMarketStore::new());
        for beverage in default_catalog() {
            store.insert_beverage(beverage).await.unwrap();
        }
        let stockist = user(&store, "shop", UserType::Stockist).await;
        let tracker = InventoryTracker::new(store.clone(), EventBus::new(8));
        (tracker, store, stockist)
    }

    fn request(stockist_id: Option<UserId>, beverage: i32, quantity: i64) -> UpsertInventoryRequest {
        UpsertInventoryRequest {
            stockist_id,
            beverage_id: BeverageId::new(beverage),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let (tracker, _, stockist) = setup().await;

        let first = tracker.upsert(&stockist, request(None, 1, 10)).await.unwrap();
        let second = tracker.upsert(&stockist, request(None, 1, 4)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 4);

        let entries = tracker.inventory_for(stockist.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].beverage.name, "Heineken Beer");
    }

    #[tokio::test]
    async fn test_actor_rules() {
        let (tracker, store, stockist) = setup().await;
        let other = user(&store, "rival", UserType::Stockist).await;
        let van = user(&store, "van", UserType::Vansales).await;
        let cafe = user(&store, "cafe", UserType::Business).await;

        let err = tracker
            .upsert(&other, request(Some(stockist.id), 1, 3))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = tracker.upsert(&cafe, request(None, 1, 3)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = tracker.upsert(&van, request(None, 1, 3)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = tracker
            .upsert(&van, request(Some(cafe.id), 1, 3))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let row = tracker
            .upsert(&van, request(Some(stockist.id), 2, 7))
            .await
            .unwrap();
        assert_eq!(row.stockist_id, stockist.id);
    }

    #[tokio::test]
    async fn test_unknown_beverage_rejected() {
        let (tracker, _, stockist) = setup().await;
        let err = tracker.upsert(&stockist, request(None, 42, 1)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_orphaned_rows_are_skipped() {
        let (tracker, store, stockist) = setup().await;
        store
            .upsert_inventory(stockist.id, BeverageId::new(99), 5)
            .await
            .unwrap();
        tracker.upsert(&stockist, request(None, 3, 2)).await.unwrap();

        let entries = tracker.inventory_for(stockist.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].row.beverage_id, BeverageId::new(3));
    }
}
