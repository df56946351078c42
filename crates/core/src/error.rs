//! The closed set of business-rule errors surfaced to callers.
//!
//! Every expected rule violation in the service maps to exactly one variant
//! here; infrastructure failures (sqlx, redis) are NOT converted into these
//! and propagate separately. Ownership violations and plain non-existence
//! share the same `*NotFound` variant so a caller cannot distinguish
//! "exists but not yours" from "does not exist".

/// A business-rule violation. Safe to render directly to an end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Project not found")]
    ProjectNotFound,

    #[error("Scope item not found")]
    ScopeItemNotFound,

    #[error("Request not found")]
    RequestNotFound,

    #[error("Request is not eligible for a change order")]
    RequestNotEligible,

    #[error("Change order not found")]
    ChangeOrderNotFound,

    #[error("Change order status can no longer be updated")]
    InvalidStatusUpdate,

    #[error("Share link not found")]
    ShareLinkNotFound,

    #[error("Share link is no longer active")]
    ShareLinkNotActive,

    #[error("Share link has expired")]
    ShareLinkExpired,

    #[error("Wallet not found")]
    WalletNotFound,

    #[error("Wallet already exists")]
    WalletExists,

    #[error("Wallet is already primary")]
    AlreadyPrimary,

    #[error("Cannot delete primary wallet")]
    CannotDeletePrimary,

    #[error("Payment link not found")]
    PaymentLinkNotFound,

    #[error("Wallet chain does not match link chain")]
    ChainMismatch,

    #[error("Unsupported asset for this chain")]
    UnsupportedAsset,
}

impl CoreError {
    /// Stable symbolic code for the API error envelope.
    pub fn code(self) -> &'static str {
        match self {
            CoreError::ProjectNotFound => "PROJECT_NOT_FOUND",
            CoreError::ScopeItemNotFound => "SCOPE_ITEM_NOT_FOUND",
            CoreError::RequestNotFound => "REQUEST_NOT_FOUND",
            CoreError::RequestNotEligible => "REQUEST_NOT_ELIGIBLE",
            CoreError::ChangeOrderNotFound => "CHANGE_ORDER_NOT_FOUND",
            CoreError::InvalidStatusUpdate => "INVALID_STATUS_UPDATE",
            CoreError::ShareLinkNotFound => "SHARE_LINK_NOT_FOUND",
            CoreError::ShareLinkNotActive => "SHARE_LINK_NOT_ACTIVE",
            CoreError::ShareLinkExpired => "SHARE_LINK_EXPIRED",
            CoreError::WalletNotFound => "WALLET_NOT_FOUND",
            CoreError::WalletExists => "WALLET_EXISTS",
            CoreError::AlreadyPrimary => "ALREADY_PRIMARY",
            CoreError::CannotDeletePrimary => "CANNOT_DELETE_PRIMARY",
            CoreError::PaymentLinkNotFound => "PAYMENTLINK_NOT_FOUND",
            CoreError::ChainMismatch => "CHAIN_MISMATCH",
            CoreError::UnsupportedAsset => "UNSUPPORTED_ASSET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(CoreError::ProjectNotFound.code(), "PROJECT_NOT_FOUND");
        assert_eq!(CoreError::RequestNotEligible.code(), "REQUEST_NOT_ELIGIBLE");
        assert_eq!(
            CoreError::InvalidStatusUpdate.code(),
            "INVALID_STATUS_UPDATE"
        );
        assert_eq!(CoreError::PaymentLinkNotFound.code(), "PAYMENTLINK_NOT_FOUND");
    }

    #[test]
    fn test_messages_carry_no_internal_detail() {
        // Error strings go straight to clients; keep them short and free of
        // table names or ids.
        let msg = CoreError::ChangeOrderNotFound.to_string();
        assert!(!msg.contains("change_orders"));
        assert!(!msg.contains("id"));
    }
}
