//! Payment link entity model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use scopematter_core::payments::{Asset, Chain};
use scopematter_core::status::StatusId;
use scopematter_core::types::{DbId, Timestamp};

/// A row from the `payment_links` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentLink {
    pub id: DbId,
    pub user_id: DbId,
    pub wallet_id: DbId,
    pub chain: String,
    pub asset: String,
    pub amount_usd: Option<Decimal>,
    pub memo: Option<String>,
    pub slug: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A payment link joined with its wallet's public fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentLinkWithWallet {
    pub id: DbId,
    pub user_id: DbId,
    pub wallet_id: DbId,
    pub chain: String,
    pub asset: String,
    pub amount_usd: Option<Decimal>,
    pub memo: Option<String>,
    pub slug: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub wallet_address: String,
    pub wallet_chain: String,
    pub wallet_is_primary: bool,
}

/// The payer-facing payload for `GET /public/pay/{slug}`: the link, its
/// destination wallet, and enough of the payee to render the page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicPaymentLink {
    pub slug: String,
    pub chain: String,
    pub asset: String,
    pub amount_usd: Option<Decimal>,
    pub memo: Option<String>,
    pub wallet_address: String,
    pub payee_email: Option<String>,
    pub payee_image_url: Option<String>,
}

/// DTO for creating a payment link.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePaymentLink {
    pub wallet_id: DbId,
    pub chain: Chain,
    pub asset: Asset,
    #[validate(custom(function = "validate_amount"))]
    pub amount_usd: Option<Decimal>,
    #[validate(length(max = 255, message = "Memo must be at most 255 characters"))]
    pub memo: Option<String>,
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_usd");
        err.message = Some("Please provide a valid amount".into());
        Err(err)
    }
}
