//! # Settings Repository
//!
//! Key-value settings storage with upsert semantics. The only well-known key
//! today is `bankBalance`; the helpers below keep its decimal-string
//! encoding in one place.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shopbook_core::{Money, BANK_BALANCE_KEY};

/// Repository for the settings key-value map.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets a setting value, or None if the key was never set.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }

    /// Creates or replaces a setting.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, "Upserting setting");

        let now = Utc::now();

        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
             updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reads the bank balance.
    ///
    /// Missing or unparseable values read as zero, matching the dashboard's
    /// contract: a fresh store has a balance of 0.00.
    pub async fn bank_balance(&self) -> DbResult<Money> {
        let balance = self
            .get(BANK_BALANCE_KEY)
            .await?
            .and_then(|value| value.parse::<Money>().ok())
            .unwrap_or_default();

        Ok(balance)
    }

    /// Stores the bank balance as a decimal string.
    pub async fn set_bank_balance(&self, balance: Money) -> DbResult<()> {
        self.set(BANK_BALANCE_KEY, &balance.to_string()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_unset_key_is_none() {
        let db = test_db().await;
        assert_eq!(db.settings().get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_replace() {
        let db = test_db().await;
        let repo = db.settings();

        repo.set("storeName", "Corner Shop").await.unwrap();
        assert_eq!(
            repo.get("storeName").await.unwrap().as_deref(),
            Some("Corner Shop")
        );

        repo.set("storeName", "Main Street Shop").await.unwrap();
        assert_eq!(
            repo.get("storeName").await.unwrap().as_deref(),
            Some("Main Street Shop")
        );
    }

    #[tokio::test]
    async fn test_bank_balance_defaults_to_zero() {
        let db = test_db().await;
        let repo = db.settings();

        assert_eq!(repo.bank_balance().await.unwrap(), Money::zero());

        // Unparseable value also reads as zero
        repo.set(BANK_BALANCE_KEY, "not-a-number").await.unwrap();
        assert_eq!(repo.bank_balance().await.unwrap(), Money::zero());

        repo.set_bank_balance(Money::from_cents(50000)).await.unwrap();
        assert_eq!(repo.bank_balance().await.unwrap().cents(), 50000);
        assert_eq!(
            repo.get(BANK_BALANCE_KEY).await.unwrap().as_deref(),
            Some("500.00")
        );
    }
}
