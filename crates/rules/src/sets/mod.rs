//! The shipped rule sets, one per entity kind.
//!
//! Declaration order is part of each set's contract: later rules observe what
//! earlier rules did within the same pass.

pub mod inventory;
pub mod production;
pub mod purchasing;

pub use inventory::inventory_rules;
pub use production::production_rules;
pub use purchasing::purchase_order_rules;
