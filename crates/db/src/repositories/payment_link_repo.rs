//! Repository for the `payment_links` table.

use sqlx::PgPool;

use scopematter_core::error::CoreError;
use scopematter_core::payments;
use scopematter_core::status::PaymentLinkStatus;
use scopematter_core::types::DbId;

use crate::models::payment_link::{
    CreatePaymentLink, PaymentLink, PaymentLinkWithWallet, PublicPaymentLink,
};
use crate::models::wallet::Wallet;
use crate::StoreResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, wallet_id, chain, asset, amount_usd, memo, slug, status_id, \
                       created_at, updated_at";

/// Provides payment-link issuance, listing, public lookup, and
/// deactivation.
pub struct PaymentLinkRepo;

impl PaymentLinkRepo {
    /// Create a payment link against one of the user's wallets.
    ///
    /// The wallet must belong to the user (`WALLET_NOT_FOUND`), live on the
    /// requested chain (`CHAIN_MISMATCH`), and the asset must be billable
    /// on that chain (`UNSUPPORTED_ASSET`).
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreatePaymentLink,
    ) -> StoreResult<PaymentLink> {
        let mut tx = pool.begin().await?;

        let wallet = sqlx::query_as::<_, Wallet>(
            "SELECT id, user_id, address, chain, is_primary, created_at, updated_at
             FROM wallets WHERE id = $1 AND user_id = $2",
        )
        .bind(input.wallet_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::WalletNotFound)?;

        if wallet.chain != input.chain.as_str() {
            return Err(CoreError::ChainMismatch.into());
        }
        if !payments::asset_supported(input.chain, input.asset) {
            return Err(CoreError::UnsupportedAsset.into());
        }

        let slug = payments::generate_slug();

        let insert_query = format!(
            "INSERT INTO payment_links (user_id, wallet_id, chain, asset, amount_usd, memo, slug)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let link = sqlx::query_as::<_, PaymentLink>(&insert_query)
            .bind(user_id)
            .bind(input.wallet_id)
            .bind(input.chain.as_str())
            .bind(input.asset.as_str())
            .bind(input.amount_usd)
            .bind(&input.memo)
            .bind(&slug)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(payment_link_id = link.id, user_id, slug = %link.slug, "Payment link created");
        Ok(link)
    }

    /// List a user's active payment links with wallet summaries, newest
    /// first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PaymentLinkWithWallet>, sqlx::Error> {
        sqlx::query_as::<_, PaymentLinkWithWallet>(
            "SELECT pl.id, pl.user_id, pl.wallet_id, pl.chain, pl.asset, pl.amount_usd, pl.memo,
                    pl.slug, pl.status_id, pl.created_at, pl.updated_at,
                    w.address AS wallet_address, w.chain AS wallet_chain,
                    w.is_primary AS wallet_is_primary
             FROM payment_links pl
             JOIN wallets w ON w.id = pl.wallet_id
             WHERE pl.user_id = $1 AND pl.status_id = $2
             ORDER BY pl.created_at DESC",
        )
        .bind(user_id)
        .bind(PaymentLinkStatus::Active.id())
        .fetch_all(pool)
        .await
    }

    /// Public lookup by slug. Only active links resolve.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<PublicPaymentLink>, sqlx::Error> {
        sqlx::query_as::<_, PublicPaymentLink>(
            "SELECT pl.slug, pl.chain, pl.asset, pl.amount_usd, pl.memo,
                    w.address AS wallet_address,
                    u.email AS payee_email, u.image_url AS payee_image_url
             FROM payment_links pl
             JOIN wallets w ON w.id = pl.wallet_id
             JOIN app_users u ON u.id = pl.user_id
             WHERE pl.slug = $1 AND pl.status_id = $2",
        )
        .bind(slug)
        .bind(PaymentLinkStatus::Active.id())
        .fetch_optional(pool)
        .await
    }

    /// Deactivate a link. Deactivating an inactive or foreign link reports
    /// `PAYMENTLINK_NOT_FOUND`.
    pub async fn deactivate(pool: &PgPool, id: DbId, user_id: DbId) -> StoreResult<PaymentLink> {
        let query = format!(
            "UPDATE payment_links SET status_id = $3
             WHERE id = $1 AND user_id = $2 AND status_id = $4
             RETURNING {COLUMNS}"
        );
        let link = sqlx::query_as::<_, PaymentLink>(&query)
            .bind(id)
            .bind(user_id)
            .bind(PaymentLinkStatus::Inactive.id())
            .bind(PaymentLinkStatus::Active.id())
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::PaymentLinkNotFound)?;

        tracing::info!(payment_link_id = id, user_id, "Payment link deactivated");
        Ok(link)
    }
}
