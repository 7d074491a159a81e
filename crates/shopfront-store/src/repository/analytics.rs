// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

use chrono::Utc;
use sqlx::SqlitePool;

use super::Page;
use crate::error::{StoreError, StoreResult};
use crate::models::{AnalyticsEvent, NewAnalyticsEvent};

const EVENT_COLUMNS: &str = "id, user_id, action, product_id, session_id, timestamp";

/// Access to `analytics_events`.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnalyticsRepository<'a> {
    pub(crate) fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Most recent events first.
    pub async fn list(&self, page: Page) -> StoreResult<Vec<AnalyticsEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM analytics_events \
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"
        );
        Ok(sqlx::query_as::<_, AnalyticsEvent>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<AnalyticsEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM analytics_events WHERE user_id = ? \
             ORDER BY timestamp DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, AnalyticsEvent>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn record(&self, event: NewAnalyticsEvent) -> StoreResult<AnalyticsEvent> {
        let sql = format!(
            "INSERT INTO analytics_events (user_id, action, product_id, session_id, timestamp) \
             VALUES (?, ?, ?, ?, ?) RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, AnalyticsEvent>(&sql)
            .bind(event.user_id)
            .bind(&event.action)
            .bind(event.product_id)
            .bind(&event.session_id)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await
            .map_err(|e| match StoreError::from(e) {
                StoreError::InvalidReference { .. } => {
                    StoreError::not_found("user", event.user_id.unwrap_or_default())
                }
                other => other,
            })
    }

    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM analytics_events WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("analytics event", id));
        }
        Ok(())
    }
}
