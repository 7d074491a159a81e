// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::Page;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewOrder, Order, OrderFilter, OrderItem, OrderStatus, OrderWithItems};

const ORDER_COLUMNS: &str = "id, user_id, status, total_cents, address_id, payment_method, \
     created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, quantity, unit_price_cents, created_at";

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: OrderFilter) {
    query.push(" WHERE 1 = 1");
    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(from) = filter.created_from {
        query.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        query.push(" AND created_at <= ").push_bind(to);
    }
}

/// Access to `orders` and `order_items`.
#[derive(Debug, Clone, Copy)]
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Places an order in one transaction.
    ///
    /// Each line is priced from the catalogue at this moment and the total is
    /// the sum of the lines. An address, when given, must belong to the
    /// ordering user.
    pub async fn create(&self, order: NewOrder) -> StoreResult<OrderWithItems> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        if let Some(address_id) = order.address_id {
            let owned = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM user_addresses WHERE id = ? AND user_id = ?",
            )
            .bind(address_id)
            .bind(order.user_id)
            .fetch_one(&mut *tx)
            .await?;
            if owned == 0 {
                return Err(StoreError::not_found("address", address_id));
            }
        }

        let sql = format!(
            "INSERT INTO orders (user_id, status, total_cents, address_id, payment_method, \
             created_at, updated_at) VALUES (?, ?, 0, ?, ?, ?, ?) RETURNING {ORDER_COLUMNS}"
        );
        let header = sqlx::query_as::<_, Order>(&sql)
            .bind(order.user_id)
            .bind(OrderStatus::Pending)
            .bind(order.address_id)
            .bind(&order.payment_method)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match StoreError::from(e) {
                StoreError::InvalidReference { .. } => StoreError::not_found("user", order.user_id),
                other => other,
            })?;

        let item_sql = format!(
            "INSERT INTO order_items (order_id, product_id, product_name, quantity, \
             unit_price_cents, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let (name, price_cents) = sqlx::query_as::<_, (String, i64)>(
                "SELECT name, price_cents FROM products WHERE id = ?",
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::not_found("product", line.product_id))?;

            let item = sqlx::query_as::<_, OrderItem>(&item_sql)
                .bind(header.id)
                .bind(line.product_id)
                .bind(&name)
                .bind(line.quantity)
                .bind(price_cents)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?;
            items.push(item);
        }

        let total_cents: i64 = items.iter().map(|i| i.unit_price_cents * i.quantity).sum();
        let sql = format!("UPDATE orders SET total_cents = ? WHERE id = ? RETURNING {ORDER_COLUMNS}");
        let header = sqlx::query_as::<_, Order>(&sql)
            .bind(total_cents)
            .bind(header.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            order_id = header.id,
            user_id = header.user_id,
            total_cents,
            lines = items.len(),
            "Order placed"
        );
        Ok(OrderWithItems {
            order: header,
            items,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<OrderWithItems>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
        let Some(order) = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ? ORDER BY id");
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(id)
            .fetch_all(self.pool)
            .await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    pub async fn get(&self, id: i64) -> StoreResult<OrderWithItems> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    /// Orders matching `filter`, newest first, each with its lines.
    pub async fn list(&self, filter: OrderFilter, page: Page) -> StoreResult<Vec<OrderWithItems>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);
        let orders = query.build_query_as::<Order>().fetch_all(self.pool).await?;
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let mut lines = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id IN ("
        ));
        let mut ids = lines.separated(", ");
        for order in &orders {
            ids.push_bind(order.id);
        }
        ids.push_unseparated(") ORDER BY id");

        let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for item in lines.build_query_as::<OrderItem>().fetch_all(self.pool).await? {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }

    pub async fn count(&self, filter: OrderFilter) -> StoreResult<i64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM orders");
        push_filter(&mut query, filter);
        Ok(query.build_query_scalar::<i64>().fetch_one(self.pool).await?)
    }

    pub async fn update_status(&self, id: i64, status: OrderStatus) -> StoreResult<Order> {
        let sql = format!(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("order", id))?;

        debug!(order_id = id, status = %status, "Order status changed");
        Ok(order)
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("order", id));
        }
        Ok(())
    }
}
