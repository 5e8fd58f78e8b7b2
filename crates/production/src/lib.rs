//! Production domain model (scheduled production runs).

pub mod order;

pub use order::ProductionOrder;
