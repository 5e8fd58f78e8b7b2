//! Read-only data every rule receives: the clock, the config and lookups.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use mferp_inventory::InventoryItem;

use crate::config::RulesConfig;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until `ts`, rounded up.
///
/// Zero means "later today" (or exactly now); negative values are in the past.
pub fn days_until(now: DateTime<Utc>, ts: DateTime<Utc>) -> i64 {
    let ms = (ts - now).num_milliseconds();
    // ceil(ms / day) for either sign.
    -(-ms).div_euclid(MILLIS_PER_DAY)
}

/// Inventory keyed by SKU, for rules that need cross-entity data.
#[derive(Debug, Clone, Default)]
pub struct InventoryIndex {
    by_sku: HashMap<String, InventoryItem>,
}

impl InventoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for the item's SKU.
    pub fn insert(&mut self, item: InventoryItem) {
        self.by_sku.insert(item.sku.clone(), item);
    }

    pub fn get(&self, sku: &str) -> Option<&InventoryItem> {
        self.by_sku.get(sku)
    }

    /// Unallocated stock for `sku`, if the SKU is known and the count fits.
    pub fn available(&self, sku: &str) -> Option<i64> {
        self.get(sku).and_then(InventoryItem::available)
    }

    pub fn len(&self) -> usize {
        self.by_sku.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sku.is_empty()
    }
}

impl FromIterator<InventoryItem> for InventoryIndex {
    /// Later items win when two share a SKU.
    fn from_iter<I: IntoIterator<Item = InventoryItem>>(iter: I) -> Self {
        let mut index = InventoryIndex::new();
        for item in iter {
            index.insert(item);
        }
        index
    }
}

/// Evaluation context passed to every condition and action.
///
/// Rules must read time from `now` only, which keeps a pass deterministic.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub now: DateTime<Utc>,
    pub config: &'a RulesConfig,
    pub inventory: Option<&'a InventoryIndex>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(now: DateTime<Utc>, config: &'a RulesConfig) -> Self {
        Self {
            now,
            config,
            inventory: None,
        }
    }

    pub fn with_inventory(mut self, inventory: &'a InventoryIndex) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn days_until(&self, ts: DateTime<Utc>) -> i64 {
        days_until(self.now, ts)
    }
}
