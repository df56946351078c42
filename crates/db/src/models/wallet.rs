//! Wallet entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use scopematter_core::payments::{self, Chain};
use scopematter_core::types::{DbId, Timestamp};

/// A row from the `wallets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wallet {
    pub id: DbId,
    pub user_id: DbId,
    pub address: String,
    pub chain: String,
    pub is_primary: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a wallet.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWallet {
    #[validate(custom(function = "validate_address"))]
    pub address: String,
    pub chain: Chain,
    pub is_primary: Option<bool>,
}

fn validate_address(address: &str) -> Result<(), ValidationError> {
    if payments::validate_address(address) {
        Ok(())
    } else {
        let mut err = ValidationError::new("address");
        err.message = Some("Invalid Ethereum address".into());
        Err(err)
    }
}
