use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mferp_core::{DomainError, DomainResult, Entity, FlagSet, Flagged, ProductionOrderId, Status};

/// A production run of one product.
///
/// `status` is optional because freshly planned orders arrive without one; the
/// production rule set normalizes that to `Scheduled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    pub id: ProductionOrderId,
    pub product_sku: String,
    pub qty: i64,
    #[serde(default)]
    pub room: Option<String>,
    /// Specific line within a room; takes precedence over `room` for capacity.
    #[serde(default)]
    pub assigned_line: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<Status>,
    /// Capacity units the run needs; falls back to `qty` when absent.
    #[serde(default)]
    pub required_capacity: Option<i64>,
    #[serde(default)]
    pub flags: FlagSet,
}

impl ProductionOrder {
    pub fn new(id: ProductionOrderId, product_sku: impl Into<String>, qty: i64) -> Self {
        Self {
            id,
            product_sku: product_sku.into(),
            qty,
            room: None,
            assigned_line: None,
            start_date: None,
            end_date: None,
            status: None,
            required_capacity: None,
            flags: FlagSet::new(),
        }
    }

    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn on_line(mut self, line: impl Into<String>) -> Self {
        self.assigned_line = Some(line.into());
        self
    }

    /// Input checks for callers that want to reject bad records up front.
    pub fn validate(&self) -> DomainResult<()> {
        if self.product_sku.trim().is_empty() {
            return Err(DomainError::validation("product_sku cannot be empty"));
        }
        if self.qty < 0 {
            return Err(DomainError::validation("qty cannot be negative"));
        }
        if matches!(self.required_capacity, Some(c) if c < 0) {
            return Err(DomainError::validation("required_capacity cannot be negative"));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(DomainError::invariant("end_date precedes start_date"));
            }
        }
        Ok(())
    }
}

impl Entity for ProductionOrder {
    type Id = ProductionOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Flagged for ProductionOrder {
    fn flags(&self) -> &FlagSet {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }
}
