//! `mferp-core` — shared vocabulary for the manufacturing domain.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the risk [`Flag`] tags, the shared [`Status`] vocabulary and the
//! traits the rule engine relies on.

pub mod entity;
pub mod error;
pub mod flag;
pub mod id;
pub mod status;

pub use entity::{Entity, Flagged};
pub use error::{DomainError, DomainResult};
pub use flag::{Flag, FlagSet};
pub use id::{InventoryItemId, ProductionOrderId, PurchaseOrderId};
pub use status::Status;
