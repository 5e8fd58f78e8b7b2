//! Purchasing domain model (purchase orders).
//!
//! Plain data handed to the rule engine; status transitions other than the one
//! the purchase-order rule set encodes are owned by the order-entry workflow.

pub mod order;

pub use order::{PurchaseOrder, PurchaseOrderLine, PurchaseOrderType};
