use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mferp_core::{DomainError, DomainResult, Entity, FlagSet, Flagged, InventoryItemId};

/// A stocked material or finished good.
///
/// Counts are in the item's base unit. Optional attributes are `None` when the
/// upstream record simply does not carry them; rules treat absence as "no
/// constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub on_hand: i64,
    #[serde(default)]
    pub allocated: i64,
    #[serde(default)]
    pub reorder_point: Option<i64>,
    #[serde(default)]
    pub moq: Option<i64>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub qa_hold: bool,
    #[serde(default)]
    pub std_cost: Option<f64>,
    #[serde(default)]
    pub last_cost: Option<f64>,
    #[serde(default)]
    pub flags: FlagSet,
}

impl InventoryItem {
    pub fn new(id: InventoryItemId, sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            on_hand: 0,
            allocated: 0,
            reorder_point: None,
            moq: None,
            expiry_date: None,
            allergens: Vec::new(),
            qa_hold: false,
            std_cost: None,
            last_cost: None,
            flags: FlagSet::new(),
        }
    }

    /// Stock not yet promised to an order. `None` on overflow.
    pub fn available(&self) -> Option<i64> {
        self.on_hand.checked_sub(self.allocated)
    }

    /// On hand plus allocated: the quantity stock thresholds are measured against.
    /// `None` on overflow.
    pub fn total_position(&self) -> Option<i64> {
        self.on_hand.checked_add(self.allocated)
    }

    /// Input checks for callers that want to reject bad records up front.
    ///
    /// The rule engine does not call this; it evaluates whatever it is given.
    pub fn validate(&self) -> DomainResult<()> {
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.on_hand < 0 {
            return Err(DomainError::validation("on_hand cannot be negative"));
        }
        if self.allocated < 0 {
            return Err(DomainError::validation("allocated cannot be negative"));
        }
        if matches!(self.reorder_point, Some(r) if r < 0) {
            return Err(DomainError::validation("reorder_point cannot be negative"));
        }
        if matches!(self.moq, Some(m) if m < 0) {
            return Err(DomainError::validation("moq cannot be negative"));
        }
        Ok(())
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Flagged for InventoryItem {
    fn flags(&self) -> &FlagSet {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }
}
