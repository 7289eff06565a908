//! In-memory storage adapter for Till.
//!
//! Implements [`CommerceStore`] on plain collections behind a single mutex,
//! so every operation is trivially atomic. Used by handler tests and local
//! development; production runs on the PostgreSQL adapter.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use till_commerce::cart::{validate_quantity, CartLine};
use till_commerce::catalog::Product;
use till_commerce::checkout::{ShippingInfo, ShippingProfile};
use till_commerce::error::CommerceError;
use till_commerce::ids::{CartLineId, LogEntryId, OrderId, ProductId, UserId};
use till_commerce::inventory::{ChangeType, InventoryLogEntry, StockAdjustment};
use till_commerce::order::{Order, OrderDetail, OrderStatus, PaymentMethod, PlacedOrder};
use till_commerce::pricing;
use till_commerce::store::CommerceStore;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct StoredCartLine {
    cart_id: CartLineId,
    user_id: UserId,
    product_id: ProductId,
    quantity: i64,
}

#[derive(Debug, Default)]
struct State {
    sessions: HashMap<String, (UserId, DateTime<Utc>)>,
    users: HashMap<UserId, ShippingProfile>,
    products: Vec<Product>,
    cart: Vec<StoredCartLine>,
    orders: Vec<Order>,
    order_details: Vec<OrderDetail>,
    logs: Vec<InventoryLogEntry>,
    next_user_id: i64,
    next_product_id: i64,
    next_cart_id: i64,
    next_order_id: i64,
    next_detail_id: i64,
    next_log_id: i64,
}

impl State {
    fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    fn joined_cart(&self, user_id: UserId) -> Result<Vec<CartLine>, CommerceError> {
        self.cart
            .iter()
            .filter(|line| line.user_id == user_id)
            .map(|line| {
                let product = self
                    .product(line.product_id)
                    .ok_or(CommerceError::ProductNotFound(line.product_id))?;
                Ok(CartLine {
                    cart_id: line.cart_id,
                    product_id: line.product_id,
                    name: product.name.clone(),
                    price: product.price,
                    quantity: line.quantity,
                    image_uri: product.image_uri.clone(),
                })
            })
            .collect()
    }
}

/// In-memory commerce store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user and return its id.
    pub fn seed_user(&self) -> UserId {
        let mut state = self.state.lock();
        state.next_user_id += 1;
        let id = UserId::new(state.next_user_id);
        state.users.insert(id, ShippingProfile::default());
        id
    }

    /// Seed a product and return its id.
    pub fn seed_product(&self, name: &str, price_cents: i64, stock_quantity: i64) -> ProductId {
        let mut state = self.state.lock();
        state.next_product_id += 1;
        let id = ProductId::new(state.next_product_id);
        state.products.push(Product {
            product_id: id,
            name: name.to_string(),
            category: None,
            price: till_commerce::Money::from_cents(price_cents),
            stock_quantity,
            image_uri: None,
        });
        id
    }

    /// Overwrite a product's price, standing in for catalog management.
    pub fn set_product_price(&self, product_id: ProductId, price_cents: i64) {
        let mut state = self.state.lock();
        if let Some(product) = state
            .products
            .iter_mut()
            .find(|p| p.product_id == product_id)
        {
            product.price = till_commerce::Money::from_cents(price_cents);
        }
    }

    /// Issue a bearer token for a user, valid for one hour.
    pub fn issue_token(&self, user_id: UserId) -> String {
        self.issue_token_with_ttl(user_id, Duration::hours(1))
    }

    /// Issue a bearer token with an explicit lifetime.
    pub fn issue_token_with_ttl(&self, user_id: UserId, ttl: Duration) -> String {
        let mut state = self.state.lock();
        let token = format!("tok-{}-{}", user_id.as_i64(), state.sessions.len() + 1);
        state.sessions.insert(token.clone(), (user_id, Utc::now() + ttl));
        token
    }
}

#[async_trait::async_trait]
impl CommerceStore for InMemoryStore {
    async fn resolve_token(&self, token: &str) -> Result<Option<UserId>, CommerceError> {
        let state = self.state.lock();
        Ok(state
            .sessions
            .get(token)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(user_id, _)| *user_id))
    }

    async fn products(&self) -> Result<Vec<Product>, CommerceError> {
        Ok(self.state.lock().products.clone())
    }

    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, CommerceError> {
        Ok(self.state.lock().product(product_id).cloned())
    }

    async fn cart(&self, user_id: UserId) -> Result<Vec<CartLine>, CommerceError> {
        self.state.lock().joined_cart(user_id)
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;
        let mut state = self.state.lock();
        if state.product(product_id).is_none() {
            return Err(CommerceError::Validation(format!(
                "unknown product: {product_id}"
            )));
        }
        if let Some(line) = state
            .cart
            .iter_mut()
            .find(|line| line.user_id == user_id && line.product_id == product_id)
        {
            line.quantity += quantity;
            return Ok(());
        }
        state.next_cart_id += 1;
        let cart_id = CartLineId::new(state.next_cart_id);
        state.cart.push(StoredCartLine {
            cart_id,
            user_id,
            product_id,
            quantity,
        });
        Ok(())
    }

    async fn update_cart_line(
        &self,
        cart_id: CartLineId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;
        let mut state = self.state.lock();
        let line = state
            .cart
            .iter_mut()
            .find(|line| line.cart_id == cart_id)
            .ok_or(CommerceError::CartLineNotFound(cart_id))?;
        line.quantity = quantity;
        Ok(())
    }

    async fn remove_cart_line(&self, cart_id: CartLineId) -> Result<(), CommerceError> {
        let mut state = self.state.lock();
        let before = state.cart.len();
        state.cart.retain(|line| line.cart_id != cart_id);
        if state.cart.len() == before {
            return Err(CommerceError::CartLineNotFound(cart_id));
        }
        Ok(())
    }

    async fn shipping_profile(&self, user_id: UserId) -> Result<ShippingProfile, CommerceError> {
        let state = self.state.lock();
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(CommerceError::UserNotFound(user_id))
    }

    async fn save_shipping_profile(
        &self,
        user_id: UserId,
        info: &ShippingInfo,
    ) -> Result<(), CommerceError> {
        let mut state = self.state.lock();
        let profile = state
            .users
            .get_mut(&user_id)
            .ok_or(CommerceError::UserNotFound(user_id))?;
        *profile = ShippingProfile::from(info.clone());
        Ok(())
    }

    async fn place_order(
        &self,
        user_id: UserId,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CommerceError> {
        // The whole placement runs under one lock: nothing else can touch
        // the cart between the read and the clear, and a failure before the
        // final writes leaves the state untouched.
        let mut state = self.state.lock();
        let lines = state.joined_cart(user_id)?;
        if lines.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let priced = pricing::price_cart(&lines)?;

        state.next_order_id += 1;
        let order_id = OrderId::new(state.next_order_id);
        let order = Order {
            order_id,
            user_id,
            order_date: Utc::now(),
            total_amount: priced.total,
            status: OrderStatus::Pending,
            payment_method,
        };
        let details: Vec<OrderDetail> = priced
            .lines
            .iter()
            .map(|line| {
                state.next_detail_id += 1;
                OrderDetail {
                    order_detail_id: state.next_detail_id.into(),
                    order_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    subtotal: line.total_price,
                }
            })
            .collect();

        state.orders.push(order);
        state.order_details.extend(details);
        state.cart.retain(|line| line.user_id != user_id);

        Ok(PlacedOrder {
            order_id,
            total_amount: priced.total,
            payment_method,
        })
    }

    async fn orders(&self, user_id: UserId) -> Result<Vec<Order>, CommerceError> {
        let state = self.state.lock();
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_id.cmp(&a.order_id));
        Ok(orders)
    }

    async fn order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<(Order, Vec<OrderDetail>)>, CommerceError> {
        let state = self.state.lock();
        let Some(order) = state
            .orders
            .iter()
            .find(|o| o.order_id == order_id && o.user_id == user_id)
            .cloned()
        else {
            return Ok(None);
        };
        let details = state
            .order_details
            .iter()
            .filter(|d| d.order_id == order_id)
            .cloned()
            .collect();
        Ok(Some((order, details)))
    }

    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), CommerceError> {
        let mut state = self.state.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or(CommerceError::OrderNotFound(order_id))?;
        order.status = order.status.transition_to(status)?;
        Ok(())
    }

    async fn record_inventory_change(
        &self,
        product_id: ProductId,
        change_type: ChangeType,
        quantity_changed: i64,
        remarks: Option<&str>,
    ) -> Result<InventoryLogEntry, CommerceError> {
        if quantity_changed < 1 {
            return Err(CommerceError::Validation(format!(
                "quantity changed must be a positive integer, got {quantity_changed}"
            )));
        }
        let mut state = self.state.lock();
        if state.product(product_id).is_none() {
            return Err(CommerceError::ProductNotFound(product_id));
        }
        state.next_log_id += 1;
        let entry = InventoryLogEntry {
            log_id: LogEntryId::new(state.next_log_id),
            product_id,
            log_date: Utc::now(),
            change_type,
            quantity_changed,
            remarks: remarks.map(str::to_string),
        };
        state.logs.push(entry.clone());
        Ok(entry)
    }

    async fn adjust_stock(
        &self,
        adjustment: &StockAdjustment,
    ) -> Result<InventoryLogEntry, CommerceError> {
        adjustment.validate()?;
        let mut state = self.state.lock();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.product_id == adjustment.product_id)
            .ok_or(CommerceError::ProductNotFound(adjustment.product_id))?;

        if adjustment.change_type == ChangeType::Remove
            && adjustment.quantity > product.stock_quantity
        {
            return Err(CommerceError::InsufficientStock {
                product_id: adjustment.product_id,
                requested: adjustment.quantity,
                available: product.stock_quantity,
            });
        }
        product.stock_quantity += adjustment.change_type.signed_delta(adjustment.quantity);

        state.next_log_id += 1;
        let entry = InventoryLogEntry {
            log_id: LogEntryId::new(state.next_log_id),
            product_id: adjustment.product_id,
            log_date: Utc::now(),
            change_type: adjustment.change_type,
            quantity_changed: adjustment.quantity,
            remarks: adjustment.remarks.clone(),
        };
        state.logs.push(entry.clone());
        Ok(entry)
    }

    async fn inventory_logs(&self) -> Result<Vec<InventoryLogEntry>, CommerceError> {
        Ok(self.state.lock().logs.clone())
    }

    async fn inventory_log(
        &self,
        log_id: LogEntryId,
    ) -> Result<Option<InventoryLogEntry>, CommerceError> {
        Ok(self
            .state
            .lock()
            .logs
            .iter()
            .find(|entry| entry.log_id == log_id)
            .cloned())
    }
}
