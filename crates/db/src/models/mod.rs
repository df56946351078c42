//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Read models that pass through the cache also derive `Deserialize` so
//! they can round-trip as JSON.

pub mod change_order;
pub mod client;
pub mod dashboard;
pub mod payment_link;
pub mod project;
pub mod request;
pub mod scope_item;
pub mod share_link;
pub mod user;
pub mod wallet;
