//! In-memory implementation of the marketplace store
//!
//! All tables live behind one `RwLock`, so each repository call is atomic
//! with respect to every other and the per-table id counters cannot race.
//! The guard is never held across an `.await`.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::auth::UserType;
use crate::core::error::{EntityError, MarketError, MarketResult, OrderError, StorageError};
use crate::core::ids::{BeverageId, InventoryId, OrderId, OrderItemId, ReceiptId, UserId};
use crate::core::service::{
    CatalogRepository, InventoryRepository, OrderRepository, ReceiptRepository, UserRepository,
};
use crate::core::status::OrderStatus;
use crate::entities::beverage::{Beverage, NewBeverage};
use crate::entities::inventory::StockistInventory;
use crate::entities::order::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::entities::receipt::{NewVatReceipt, VatReceipt};
use crate::entities::user::{NewUser, User};

/// Auto-increment counter for one table, starting at 1
#[derive(Debug, Default)]
struct Sequence(i32);

impl Sequence {
    fn next(&mut self) -> i32 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    beverages: BTreeMap<BeverageId, Beverage>,
    inventory: BTreeMap<InventoryId, StockistInventory>,
    orders: BTreeMap<OrderId, Order>,
    order_items: BTreeMap<OrderItemId, OrderItem>,
    receipts: BTreeMap<ReceiptId, VatReceipt>,

    user_seq: Sequence,
    beverage_seq: Sequence,
    inventory_seq: Sequence,
    order_seq: Sequence,
    order_item_seq: Sequence,
    receipt_seq: Sequence,
}

/// Process-local store for every marketplace table
///
/// Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryMarketStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> MarketResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| {
            MarketError::Storage(StorageError::LockPoisoned {
                message: format!("Failed to acquire read lock: {}", e),
            })
        })
    }

    fn write(&self) -> MarketResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| {
            MarketError::Storage(StorageError::LockPoisoned {
                message: format!("Failed to acquire write lock: {}", e),
            })
        })
    }
}

/// Newest first, ties broken by id so ordering is stable
fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl UserRepository for InMemoryMarketStore {
    async fn create_user(&self, user: NewUser) -> MarketResult<User> {
        let mut tables = self.write()?;

        if tables
            .users
            .values()
            .any(|existing| existing.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(EntityError::AlreadyExists {
                entity_type: "user".to_string(),
                key: user.username,
            }
            .into());
        }

        let id = UserId::new(tables.user_seq.next());
        let created = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            name: user.name,
            phone: user.phone,
            business_name: user.business_name,
            tin: user.tin,
            address: user.address,
            user_type: user.user_type,
            is_vat_registered: user.is_vat_registered,
            created_at: Utc::now(),
        };
        tables.users.insert(id, created.clone());

        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> MarketResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> MarketResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn list_users_by_type(&self, user_type: UserType) -> MarketResult<Vec<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .filter(|user| user.user_type == user_type)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryMarketStore {
    async fn insert_beverage(&self, beverage: NewBeverage) -> MarketResult<Beverage> {
        let mut tables = self.write()?;

        let id = BeverageId::new(tables.beverage_seq.next());
        let created = Beverage {
            id,
            name: beverage.name,
            description: beverage.description,
            category: beverage.category,
            unit_price: beverage.unit_price,
            vat_included: beverage.vat_included,
            image_url: beverage.image_url,
            quantity_per_crate: beverage.quantity_per_crate,
            created_at: Utc::now(),
        };
        tables.beverages.insert(id, created.clone());

        Ok(created)
    }

    async fn get_beverage(&self, id: BeverageId) -> MarketResult<Option<Beverage>> {
        Ok(self.read()?.beverages.get(&id).cloned())
    }

    async fn list_beverages(&self) -> MarketResult<Vec<Beverage>> {
        Ok(self.read()?.beverages.values().cloned().collect())
    }

    async fn list_beverages_by_category(&self, category: &str) -> MarketResult<Vec<Beverage>> {
        Ok(self
            .read()?
            .beverages
            .values()
            .filter(|beverage| beverage.in_category(category))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InventoryRepository for InMemoryMarketStore {
    async fn upsert_inventory(
        &self,
        stockist_id: UserId,
        beverage_id: BeverageId,
        quantity: u32,
    ) -> MarketResult<StockistInventory> {
        let mut tables = self.write()?;
        let now = Utc::now();

        if let Some(row) = tables
            .inventory
            .values_mut()
            .find(|row| row.stockist_id == stockist_id && row.beverage_id == beverage_id)
        {
            row.quantity = quantity;
            row.updated_at = now;
            return Ok(row.clone());
        }

        let id = InventoryId::new(tables.inventory_seq.next());
        let row = StockistInventory {
            id,
            stockist_id,
            beverage_id,
            quantity,
            updated_at: now,
        };
        tables.inventory.insert(id, row.clone());

        Ok(row)
    }

    async fn list_inventory(&self, stockist_id: UserId) -> MarketResult<Vec<StockistInventory>> {
        Ok(self
            .read()?
            .inventory
            .values()
            .filter(|row| row.stockist_id == stockist_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderRepository for InMemoryMarketStore {
    async fn create_order_with_items(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> MarketResult<(Order, Vec<OrderItem>)> {
        let mut tables = self.write()?;

        if tables
            .orders
            .values()
            .any(|existing| existing.order_number == order.order_number)
        {
            return Err(EntityError::NumberTaken {
                entity_type: "order".to_string(),
                number: order.order_number,
            }
            .into());
        }

        let now = Utc::now();
        let id = OrderId::new(tables.order_seq.next());
        let created = Order {
            id,
            order_number: order.order_number,
            customer_id: order.customer_id,
            stockist_id: None,
            status: OrderStatus::Placed,
            delivery_address: order.delivery_address,
            delivery_fee: order.totals.delivery_fee,
            subtotal: order.totals.subtotal,
            vat_amount: order.totals.vat_amount,
            total: order.totals.total,
            customer_tin: order.customer_tin,
            delivery_time: order.delivery_time,
            created_at: now,
            updated_at: now,
        };

        let mut created_items = Vec::with_capacity(items.len());
        for item in items {
            let item_id = OrderItemId::new(tables.order_item_seq.next());
            let row = OrderItem {
                id: item_id,
                order_id: id,
                beverage_id: item.beverage_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.subtotal,
            };
            tables.order_items.insert(item_id, row.clone());
            created_items.push(row);
        }
        tables.orders.insert(id, created.clone());

        Ok((created, created_items))
    }

    async fn get_order(&self, id: OrderId) -> MarketResult<Option<Order>> {
        Ok(self.read()?.orders.get(&id).cloned())
    }

    async fn get_order_by_number(&self, order_number: &str) -> MarketResult<Option<Order>> {
        Ok(self
            .read()?
            .orders
            .values()
            .find(|order| order.order_number == order_number)
            .cloned())
    }

    async fn list_order_items(&self, order_id: OrderId) -> MarketResult<Vec<OrderItem>> {
        Ok(self
            .read()?
            .order_items
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn list_orders_by_customer(&self, customer_id: UserId) -> MarketResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .read()?
            .orders
            .values()
            .filter(|order| order.customer_id == customer_id)
            .cloned()
            .collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn list_orders_by_stockist(&self, stockist_id: UserId) -> MarketResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .read()?
            .orders
            .values()
            .filter(|order| order.stockist_id == Some(stockist_id))
            .cloned()
            .collect();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
        stockist_id: Option<UserId>,
    ) -> MarketResult<Order> {
        let mut tables = self.write()?;

        let order = tables
            .orders
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("order", id))?;

        if order.status != expected {
            return Err(OrderError::StatusConflict {
                order_id: id.to_string(),
                expected,
                actual: order.status,
            }
            .into());
        }

        order.status = next;
        if let Some(stockist_id) = stockist_id {
            order.stockist_id = Some(stockist_id);
        }
        order.updated_at = Utc::now();

        Ok(order.clone())
    }
}

#[async_trait]
impl ReceiptRepository for InMemoryMarketStore {
    async fn issue_receipt(&self, receipt: NewVatReceipt) -> MarketResult<(VatReceipt, Order)> {
        let mut tables = self.write()?;

        let status = tables
            .orders
            .get(&receipt.order_id)
            .map(|order| order.status)
            .ok_or_else(|| MarketError::not_found("order", receipt.order_id))?;

        if tables
            .receipts
            .values()
            .any(|existing| existing.order_id == receipt.order_id)
        {
            return Err(EntityError::AlreadyExists {
                entity_type: "receipt for order".to_string(),
                key: receipt.order_id.to_string(),
            }
            .into());
        }
        if tables
            .receipts
            .values()
            .any(|existing| existing.receipt_number == receipt.receipt_number)
        {
            return Err(EntityError::NumberTaken {
                entity_type: "receipt".to_string(),
                number: receipt.receipt_number,
            }
            .into());
        }
        if status != OrderStatus::Delivered {
            return Err(OrderError::NotDelivered { status }.into());
        }

        let now = Utc::now();
        let id = ReceiptId::new(tables.receipt_seq.next());
        let issued = VatReceipt {
            id,
            order_id: receipt.order_id,
            receipt_number: receipt.receipt_number,
            seller_name: receipt.seller_name,
            seller_tin: receipt.seller_tin,
            buyer_name: receipt.buyer_name,
            buyer_tin: receipt.buyer_tin,
            subtotal: receipt.subtotal,
            vat_amount: receipt.vat_amount,
            total: receipt.total,
            receipt_data: receipt.receipt_data,
            issued_at: now,
        };
        tables.receipts.insert(id, issued.clone());

        let order = tables
            .orders
            .get_mut(&issued.order_id)
            .ok_or_else(|| MarketError::not_found("order", issued.order_id))?;
        order.status = OrderStatus::Completed;
        order.updated_at = now;

        Ok((issued, order.clone()))
    }

    async fn get_receipt_by_order(&self, order_id: OrderId) -> MarketResult<Option<VatReceipt>> {
        Ok(self
            .read()?
            .receipts
            .values()
            .find(|receipt| receipt.order_id == order_id)
            .cloned())
    }
}
