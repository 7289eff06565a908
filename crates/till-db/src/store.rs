//! `CommerceStore` implementation on PostgreSQL.

use crate::{storage_err, PgStore};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{query, Row};
use till_commerce::cart::{validate_quantity, CartLine};
use till_commerce::catalog::Product;
use till_commerce::checkout::{ShippingInfo, ShippingProfile};
use till_commerce::error::CommerceError;
use till_commerce::ids::{CartLineId, LogEntryId, OrderId, ProductId, UserId};
use till_commerce::inventory::{ChangeType, InventoryLogEntry, StockAdjustment};
use till_commerce::money::Money;
use till_commerce::order::{Order, OrderDetail, OrderStatus, PaymentMethod, PlacedOrder};
use till_commerce::pricing;
use tracing::instrument;

/// Database row for a cart line joined with its product.
struct CartRow {
    cart_id: i64,
    product_id: i64,
    name: String,
    price_cents: i64,
    quantity: i64,
    image_uri: Option<String>,
}

impl TryFrom<PgRow> for CartRow {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            cart_id: row.try_get("cart_id")?,
            product_id: row.try_get("product_id")?,
            name: row.try_get("name")?,
            price_cents: row.try_get("price_cents")?,
            quantity: row.try_get("quantity")?,
            image_uri: row.try_get("image_uri")?,
        })
    }
}

impl From<CartRow> for CartLine {
    fn from(row: CartRow) -> Self {
        CartLine {
            cart_id: CartLineId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            price: Money::from_cents(row.price_cents),
            quantity: row.quantity,
            image_uri: row.image_uri,
        }
    }
}

/// Database row for an order header.
struct OrderRow {
    order_id: i64,
    user_id: i64,
    order_date: chrono::DateTime<chrono::Utc>,
    total_cents: i64,
    order_status: String,
    payment_method: String,
}

impl TryFrom<PgRow> for OrderRow {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            order_id: row.try_get("order_id")?,
            user_id: row.try_get("user_id")?,
            order_date: row.try_get("order_date")?,
            total_cents: row.try_get("total_cents")?,
            order_status: row.try_get("order_status")?,
            payment_method: row.try_get("payment_method")?,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = CommerceError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.order_status).ok_or_else(|| {
            CommerceError::Storage(format!("unknown order status: {}", row.order_status))
        })?;
        let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
            CommerceError::Storage(format!("unknown payment method: {}", row.payment_method))
        })?;
        Ok(Order {
            order_id: OrderId::new(row.order_id),
            user_id: UserId::new(row.user_id),
            order_date: row.order_date,
            total_amount: Money::from_cents(row.total_cents),
            status,
            payment_method,
        })
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        product_id: ProductId::new(row.try_get("product_id")?),
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        price: Money::from_cents(row.try_get("price_cents")?),
        stock_quantity: row.try_get("stock_quantity")?,
        image_uri: row.try_get("image_uri")?,
    })
}

fn log_entry_from_row(row: &PgRow) -> Result<InventoryLogEntry, CommerceError> {
    let change_type: String = row.try_get("change_type").map_err(storage_err)?;
    let change_type = ChangeType::parse(&change_type)
        .ok_or_else(|| CommerceError::Storage(format!("unknown change type: {change_type}")))?;
    Ok(InventoryLogEntry {
        log_id: LogEntryId::new(row.try_get("log_id").map_err(storage_err)?),
        product_id: ProductId::new(row.try_get("product_id").map_err(storage_err)?),
        log_date: row.try_get("log_date").map_err(storage_err)?,
        change_type,
        quantity_changed: row.try_get("quantity_changed").map_err(storage_err)?,
        remarks: row.try_get("remarks").map_err(storage_err)?,
    })
}

const CART_SELECT: &str = "SELECT c.cart_id, c.product_id, p.name, p.price_cents, c.quantity, p.image_uri
     FROM cart c
     JOIN products p ON p.product_id = c.product_id
     WHERE c.user_id = $1
     ORDER BY c.cart_id";

#[async_trait]
impl till_commerce::store::CommerceStore for PgStore {
    #[instrument(name = "pg.resolve_token", skip(self, token))]
    async fn resolve_token(&self, token: &str) -> Result<Option<UserId>, CommerceError> {
        let row = query("SELECT user_id FROM sessions WHERE token = $1 AND expires_at > now()")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        match row {
            Some(row) => {
                let id: i64 = row.try_get("user_id").map_err(storage_err)?;
                Ok(Some(UserId::new(id)))
            }
            None => Ok(None),
        }
    }

    #[instrument(name = "pg.products", skip(self))]
    async fn products(&self) -> Result<Vec<Product>, CommerceError> {
        let rows = query(
            "SELECT product_id, name, category, price_cents, stock_quantity, image_uri
             FROM products ORDER BY product_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        rows.iter()
            .map(|row| product_from_row(row).map_err(storage_err))
            .collect()
    }

    #[instrument(name = "pg.product", skip(self))]
    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, CommerceError> {
        let row = query(
            "SELECT product_id, name, category, price_cents, stock_quantity, image_uri
             FROM products WHERE product_id = $1",
        )
        .bind(product_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        row.map(|row| product_from_row(&row).map_err(storage_err))
            .transpose()
    }

    #[instrument(name = "pg.cart", skip(self))]
    async fn cart(&self, user_id: UserId) -> Result<Vec<CartLine>, CommerceError> {
        let rows = query(CART_SELECT)
            .bind(user_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;
        rows.into_iter()
            .map(|row| CartRow::try_from(row).map(CartLine::from).map_err(storage_err))
            .collect()
    }

    #[instrument(name = "pg.add_to_cart", skip(self))]
    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;
        let exists = query("SELECT 1 FROM products WHERE product_id = $1")
            .bind(product_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        if exists.is_none() {
            return Err(CommerceError::Validation(format!(
                "unknown product: {product_id}"
            )));
        }
        // Additive upsert: the merge is a single statement, so concurrent
        // adds for the same (user, product) serialize on the row instead of
        // duplicating it or losing an increment.
        query(
            "INSERT INTO cart (user_id, product_id, quantity) VALUES ($1, $2, $3)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET quantity = cart.quantity + EXCLUDED.quantity",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    #[instrument(name = "pg.update_cart_line", skip(self))]
    async fn update_cart_line(
        &self,
        cart_id: CartLineId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;
        // Addressed by line id alone; ownership is not checked.
        let result = query("UPDATE cart SET quantity = $2 WHERE cart_id = $1")
            .bind(cart_id.as_i64())
            .bind(quantity)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(CommerceError::CartLineNotFound(cart_id));
        }
        Ok(())
    }

    #[instrument(name = "pg.remove_cart_line", skip(self))]
    async fn remove_cart_line(&self, cart_id: CartLineId) -> Result<(), CommerceError> {
        let result = query("DELETE FROM cart WHERE cart_id = $1")
            .bind(cart_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(CommerceError::CartLineNotFound(cart_id));
        }
        Ok(())
    }

    #[instrument(name = "pg.shipping_profile", skip(self))]
    async fn shipping_profile(&self, user_id: UserId) -> Result<ShippingProfile, CommerceError> {
        let row = query("SELECT full_name, address, contact_number FROM users WHERE user_id = $1")
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?
            .ok_or(CommerceError::UserNotFound(user_id))?;
        Ok(ShippingProfile {
            full_name: row.try_get("full_name").map_err(storage_err)?,
            address: row.try_get("address").map_err(storage_err)?,
            contact_number: row.try_get("contact_number").map_err(storage_err)?,
        })
    }

    #[instrument(name = "pg.save_shipping_profile", skip(self, info))]
    async fn save_shipping_profile(
        &self,
        user_id: UserId,
        info: &ShippingInfo,
    ) -> Result<(), CommerceError> {
        let result = query(
            "UPDATE users SET full_name = $2, address = $3, contact_number = $4
             WHERE user_id = $1",
        )
        .bind(user_id.as_i64())
        .bind(&info.full_name)
        .bind(&info.address)
        .bind(&info.contact_number)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(CommerceError::UserNotFound(user_id));
        }
        Ok(())
    }

    #[instrument(name = "pg.place_order", skip(self))]
    async fn place_order(
        &self,
        user_id: UserId,
        payment_method: PaymentMethod,
    ) -> Result<PlacedOrder, CommerceError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        // Lock the cart rows for the whole placement so a concurrent
        // add/update on the same rows waits until we commit or roll back.
        let locked_cart = format!("{CART_SELECT} FOR UPDATE OF c");
        let rows = query(&locked_cart)
            .bind(user_id.as_i64())
            .fetch_all(&mut *tx)
            .await
            .map_err(storage_err)?;

        let lines: Vec<CartLine> = rows
            .into_iter()
            .map(|row| CartRow::try_from(row).map(CartLine::from).map_err(storage_err))
            .collect::<Result<_, _>>()?;
        if lines.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        let priced = pricing::price_cart(&lines)?;

        let order_row = query(
            "INSERT INTO orders (user_id, total_cents, order_status, payment_method)
             VALUES ($1, $2, $3, $4)
             RETURNING order_id",
        )
        .bind(user_id.as_i64())
        .bind(priced.total.cents())
        .bind(OrderStatus::Pending.as_str())
        .bind(payment_method.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;
        let order_id: i64 = order_row.try_get("order_id").map_err(storage_err)?;

        for line in &priced.lines {
            query(
                "INSERT INTO order_details (order_id, product_id, quantity, subtotal_cents)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(line.product_id.as_i64())
            .bind(line.quantity)
            .bind(line.total_price.cents())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        }

        query("DELETE FROM cart WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;

        Ok(PlacedOrder {
            order_id: OrderId::new(order_id),
            total_amount: priced.total,
            payment_method,
        })
    }

    #[instrument(name = "pg.orders", skip(self))]
    async fn orders(&self, user_id: UserId) -> Result<Vec<Order>, CommerceError> {
        let rows = query(
            "SELECT order_id, user_id, order_date, total_cents, order_status, payment_method
             FROM orders WHERE user_id = $1
             ORDER BY order_date DESC, order_id DESC",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        rows.into_iter()
            .map(|row| {
                OrderRow::try_from(row)
                    .map_err(storage_err)
                    .and_then(Order::try_from)
            })
            .collect()
    }

    #[instrument(name = "pg.order", skip(self))]
    async fn order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<(Order, Vec<OrderDetail>)>, CommerceError> {
        let row = query(
            "SELECT order_id, user_id, order_date, total_cents, order_status, payment_method
             FROM orders WHERE order_id = $1 AND user_id = $2",
        )
        .bind(order_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let order = Order::try_from(OrderRow::try_from(row).map_err(storage_err)?)?;

        let detail_rows = query(
            "SELECT order_detail_id, order_id, product_id, quantity, subtotal_cents
             FROM order_details WHERE order_id = $1
             ORDER BY order_detail_id",
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        let details = detail_rows
            .iter()
            .map(|row| -> Result<OrderDetail, sqlx::Error> {
                Ok(OrderDetail {
                    order_detail_id: row.try_get::<i64, _>("order_detail_id")?.into(),
                    order_id: row.try_get::<i64, _>("order_id")?.into(),
                    product_id: row.try_get::<i64, _>("product_id")?.into(),
                    quantity: row.try_get("quantity")?,
                    subtotal: Money::from_cents(row.try_get("subtotal_cents")?),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_err)?;

        Ok(Some((order, details)))
    }

    #[instrument(name = "pg.update_order_status", skip(self))]
    async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), CommerceError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        let row = query("SELECT order_status FROM orders WHERE order_id = $1 FOR UPDATE")
            .bind(order_id.as_i64())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_err)?
            .ok_or(CommerceError::OrderNotFound(order_id))?;
        let current: String = row.try_get("order_status").map_err(storage_err)?;
        let current = OrderStatus::parse(&current)
            .ok_or_else(|| CommerceError::Storage(format!("unknown order status: {current}")))?;
        current.transition_to(status)?;

        query("UPDATE orders SET order_status = $2 WHERE order_id = $1")
            .bind(order_id.as_i64())
            .bind(status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        tx.commit().await.map_err(storage_err)?;
        Ok(())
    }

    #[instrument(name = "pg.record_inventory_change", skip(self, remarks))]
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
        let exists = query("SELECT 1 FROM products WHERE product_id = $1")
            .bind(product_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        if exists.is_none() {
            return Err(CommerceError::ProductNotFound(product_id));
        }
        let row = query(
            "INSERT INTO inventory_log (product_id, change_type, quantity_changed, remarks)
             VALUES ($1, $2, $3, $4)
             RETURNING log_id, product_id, log_date, change_type, quantity_changed, remarks",
        )
        .bind(product_id.as_i64())
        .bind(change_type.as_str())
        .bind(quantity_changed)
        .bind(remarks)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;
        log_entry_from_row(&row)
    }

    #[instrument(name = "pg.adjust_stock", skip(self, adjustment))]
    async fn adjust_stock(
        &self,
        adjustment: &StockAdjustment,
    ) -> Result<InventoryLogEntry, CommerceError> {
        adjustment.validate()?;
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let row = query("SELECT stock_quantity FROM products WHERE product_id = $1 FOR UPDATE")
            .bind(adjustment.product_id.as_i64())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_err)?
            .ok_or(CommerceError::ProductNotFound(adjustment.product_id))?;
        let available: i64 = row.try_get("stock_quantity").map_err(storage_err)?;

        if adjustment.change_type == ChangeType::Remove && adjustment.quantity > available {
            return Err(CommerceError::InsufficientStock {
                product_id: adjustment.product_id,
                requested: adjustment.quantity,
                available,
            });
        }

        query("UPDATE products SET stock_quantity = stock_quantity + $2 WHERE product_id = $1")
            .bind(adjustment.product_id.as_i64())
            .bind(adjustment.change_type.signed_delta(adjustment.quantity))
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        let row = query(
            "INSERT INTO inventory_log (product_id, change_type, quantity_changed, remarks)
             VALUES ($1, $2, $3, $4)
             RETURNING log_id, product_id, log_date, change_type, quantity_changed, remarks",
        )
        .bind(adjustment.product_id.as_i64())
        .bind(adjustment.change_type.as_str())
        .bind(adjustment.quantity)
        .bind(adjustment.remarks.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;
        let entry = log_entry_from_row(&row)?;

        tx.commit().await.map_err(storage_err)?;
        Ok(entry)
    }

    #[instrument(name = "pg.inventory_logs", skip(self))]
    async fn inventory_logs(&self) -> Result<Vec<InventoryLogEntry>, CommerceError> {
        let rows = query(
            "SELECT log_id, product_id, log_date, change_type, quantity_changed, remarks
             FROM inventory_log ORDER BY log_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        rows.iter().map(log_entry_from_row).collect()
    }

    #[instrument(name = "pg.inventory_log", skip(self))]
    async fn inventory_log(
        &self,
        log_id: LogEntryId,
    ) -> Result<Option<InventoryLogEntry>, CommerceError> {
        let row = query(
            "SELECT log_id, product_id, log_date, change_type, quantity_changed, remarks
             FROM inventory_log WHERE log_id = $1",
        )
        .bind(log_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        row.as_ref().map(log_entry_from_row).transpose()
    }
}
