//! Repository for the `wallets` table.
//!
//! Invariant: once a user has any wallet on a chain, exactly one wallet on
//! that chain is primary. The first wallet auto-promotes; marking a new
//! wallet primary demotes the previous one in the same transaction; primary
//! wallets cannot be deleted. A partial unique index backs this up.

use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::types::DbId;

use crate::models::wallet::{CreateWallet, Wallet};
use crate::StoreResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, address, chain, is_primary, created_at, updated_at";

/// Provides wallet CRUD and primary-wallet management.
pub struct WalletRepo;

impl WalletRepo {
    /// List a user's wallets, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Wallet>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM wallets WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Wallet>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Register a wallet.
    ///
    /// Duplicate (address, chain) pairs per user fail `WALLET_EXISTS`. When
    /// the request marks the wallet primary the previous primary is demoted
    /// here; otherwise the wallet auto-promotes if it is the first on its
    /// chain.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateWallet,
    ) -> StoreResult<Wallet> {
        let mut tx = pool.begin().await?;

        let chain = input.chain.as_str();

        let existing: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM wallets WHERE user_id = $1 AND address = $2 AND chain = $3",
        )
        .bind(user_id)
        .bind(&input.address)
        .bind(chain)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Err(CoreError::WalletExists.into());
        }

        let mut is_primary = input.is_primary.unwrap_or(false);
        if is_primary {
            sqlx::query(
                "UPDATE wallets SET is_primary = FALSE
                 WHERE user_id = $1 AND chain = $2 AND is_primary",
            )
            .bind(user_id)
            .bind(chain)
            .execute(&mut *tx)
            .await?;
        } else {
            let has_primary: Option<(DbId,)> = sqlx::query_as(
                "SELECT id FROM wallets WHERE user_id = $1 AND chain = $2 AND is_primary",
            )
            .bind(user_id)
            .bind(chain)
            .fetch_optional(&mut *tx)
            .await?;
            // First wallet on this chain becomes primary regardless.
            if has_primary.is_none() {
                is_primary = true;
            }
        }

        let insert_query = format!(
            "INSERT INTO wallets (user_id, address, chain, is_primary)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let wallet = sqlx::query_as::<_, Wallet>(&insert_query)
            .bind(user_id)
            .bind(&input.address)
            .bind(chain)
            .bind(is_primary)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(wallet_id = wallet.id, user_id, chain, "Wallet created");
        Ok(wallet)
    }

    /// Promote a wallet to primary, demoting the current primary on the
    /// same chain in one transaction.
    pub async fn set_primary(pool: &PgPool, id: DbId, user_id: DbId) -> StoreResult<Wallet> {
        let mut tx = pool.begin().await?;

        let lookup = format!(
            "SELECT {COLUMNS} FROM wallets WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let wallet = sqlx::query_as::<_, Wallet>(&lookup)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::WalletNotFound)?;

        if wallet.is_primary {
            return Err(CoreError::AlreadyPrimary.into());
        }

        sqlx::query(
            "UPDATE wallets SET is_primary = FALSE
             WHERE user_id = $1 AND chain = $2 AND is_primary",
        )
        .bind(user_id)
        .bind(&wallet.chain)
        .execute(&mut *tx)
        .await?;

        let promote_query = format!(
            "UPDATE wallets SET is_primary = TRUE WHERE id = $1 RETURNING {COLUMNS}"
        );
        let promoted = sqlx::query_as::<_, Wallet>(&promote_query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(wallet_id = id, user_id, "Wallet set primary");
        Ok(promoted)
    }

    /// Delete a non-primary wallet.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> StoreResult<()> {
        let mut tx = pool.begin().await?;

        let lookup = format!(
            "SELECT {COLUMNS} FROM wallets WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let wallet = sqlx::query_as::<_, Wallet>(&lookup)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::WalletNotFound)?;

        if wallet.is_primary {
            return Err(CoreError::CannotDeletePrimary.into());
        }

        sqlx::query("DELETE FROM wallets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(wallet_id = id, user_id, "Wallet deleted");
        Ok(())
    }
}
