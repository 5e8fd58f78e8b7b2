//! Inventory domain model.
//!
//! Plain data handed to the rule engine by whoever owns persistence; no IO,
//! no storage, no rules here.

pub mod item;

pub use item::InventoryItem;
