//! Change order entity model, DTOs, and export read model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use scopematter_core::billing;
use scopematter_core::status::StatusId;
use scopematter_core::types::{DbId, Timestamp};

use crate::models::client::Client;
use crate::models::project::Project;

/// A row from the `change_orders` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ChangeOrder {
    pub id: DbId,
    pub request_id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub price_usd: Decimal,
    pub extra_days: Option<i32>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A change order joined with a summary of its originating request.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeOrderWithRequest {
    pub id: DbId,
    pub request_id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub price_usd: Decimal,
    pub extra_days: Option<i32>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub request_description: String,
    pub request_status_id: StatusId,
}

/// DTO for creating a change order from an out-of-scope request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChangeOrder {
    pub request_id: DbId,
    #[validate(custom(function = "validate_price_usd"))]
    pub price_usd: Decimal,
    #[validate(custom(function = "validate_extra_days"))]
    pub extra_days: Option<i32>,
}

/// DTO for updating a PENDING change order. Only supplied fields are
/// written; a supplied `status_id` is validated against the transition
/// table inside the repository.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateChangeOrder {
    #[validate(custom(function = "validate_price_usd"))]
    pub price_usd: Option<Decimal>,
    #[validate(custom(function = "validate_extra_days"))]
    pub extra_days: Option<i32>,
    pub status_id: Option<StatusId>,
}

/// Fully-resolved read model handed to the PDF renderer.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeOrderExport {
    pub project: Project,
    pub client: Client,
    pub change_order: ChangeOrderWithRequest,
}

fn validate_price_usd(price: &Decimal) -> Result<(), ValidationError> {
    billing::validate_price_usd(*price).map_err(|msg| {
        let mut err = ValidationError::new("price_usd");
        err.message = Some(msg.into());
        err
    })
}

fn validate_extra_days(extra_days: i32) -> Result<(), ValidationError> {
    billing::validate_extra_days(extra_days).map_err(|msg| {
        let mut err = ValidationError::new("extra_days");
        err.message = Some(msg.into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_create_dto_rejects_three_decimal_places() {
        let input = CreateChangeOrder {
            request_id: 1,
            price_usd: Decimal::from_str("300.005").unwrap(),
            extra_days: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_dto_accepts_two_decimal_places() {
        let input = CreateChangeOrder {
            request_id: 1,
            price_usd: Decimal::from_str("300.00").unwrap(),
            extra_days: Some(5),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_dto_validates_optional_fields_when_present() {
        let input = UpdateChangeOrder {
            price_usd: None,
            extra_days: Some(400),
            status_id: None,
        };
        assert!(input.validate().is_err());
    }
}
