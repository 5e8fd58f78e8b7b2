//! Rules configuration: thresholds, capacity limits and operator messages.
//!
//! Every field has a default, so an empty JSON object (or no file at all) yields
//! the stock policy. Keys use the upper-snake names operators already know,
//! e.g. `LOW_STOCK_THRESHOLD_PCT`.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::days_until;
use crate::error::ConfigError;

/// Fraction of the total stock position below which an item is low.
pub const LOW_STOCK_THRESHOLD_PCT: f64 = 0.15;
/// Days before expiry at which an item is at risk.
pub const EXPIRY_DAYS_WARNING: i64 = 30;
/// Relative unit-cost deviation tolerated between PO lines.
pub const COST_VARIANCE_PCT: f64 = 0.10;
/// Days ahead of a start date within which an order counts as a rush.
pub const RUSH_WINDOW_DAYS: i64 = 7;

/// Room that ships with a capacity limit out of the box.
pub const MAIN_ROOM: &str = "Main Room";
pub const MAIN_ROOM_CAPACITY: i64 = 500;

/// What a purchase-order line's cost is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceBaseline {
    /// The first line carrying a cost.
    #[default]
    First,
    /// Arithmetic mean of all defined costs.
    Mean,
    /// Median of all defined costs.
    Median,
}

/// Rush-order policy. Read by callers (scheduling screens), never by rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RushPolicy {
    pub rush_window_days: i64,
    /// Template; `{days}` is replaced by the window length.
    pub rush_warning_message: String,
    /// Template; `{days}` is replaced by the window length.
    pub rush_approval_message: String,
}

impl Default for RushPolicy {
    fn default() -> Self {
        Self {
            rush_window_days: RUSH_WINDOW_DAYS,
            rush_warning_message:
                "Rush order: production starts within {days} days. Confirm material availability before scheduling."
                    .to_string(),
            rush_approval_message:
                "Orders starting within {days} days require production manager approval.".to_string(),
        }
    }
}

impl RushPolicy {
    /// A start date at most `rush_window_days` away (rounded up to whole days)
    /// is a rush. Start dates already in the past count as well.
    pub fn is_rush(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        days_until(now, start) <= self.rush_window_days
    }

    pub fn warning_message(&self) -> String {
        self.render(&self.rush_warning_message)
    }

    pub fn approval_message(&self) -> String {
        self.render(&self.rush_approval_message)
    }

    /// Warning text for `start`, or `None` when it is outside the rush window.
    pub fn warning(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
        self.is_rush(start, now).then(|| self.warning_message())
    }

    fn render(&self, template: &str) -> String {
        template.replace("{days}", &self.rush_window_days.to_string())
    }
}

/// Tunables consumed by the rule sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RulesConfig {
    pub low_stock_threshold_pct: f64,
    pub expiry_days_warning: i64,
    pub cost_variance_pct: f64,
    pub variance_baseline: VarianceBaseline,
    /// Room (or line) name to capacity units. Rooms not listed are unlimited.
    pub capacity_limits: BTreeMap<String, i64>,
    #[serde(flatten)]
    pub rush: RushPolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold_pct: LOW_STOCK_THRESHOLD_PCT,
            expiry_days_warning: EXPIRY_DAYS_WARNING,
            cost_variance_pct: COST_VARIANCE_PCT,
            variance_baseline: VarianceBaseline::First,
            capacity_limits: BTreeMap::from([(MAIN_ROOM.to_string(), MAIN_ROOM_CAPACITY)]),
            rush: RushPolicy::default(),
        }
    }
}

impl RulesConfig {
    /// Parse and validate a JSON config. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Capacity limit for `room`; `None` means unlimited.
    pub fn capacity_limit(&self, room: &str) -> Option<i64> {
        self.capacity_limits.get(room).copied()
    }

    pub fn with_capacity_limit(mut self, room: impl Into<String>, limit: i64) -> Self {
        self.capacity_limits.insert(room.into(), limit);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("LOW_STOCK_THRESHOLD_PCT", self.low_stock_threshold_pct)?;
        check_fraction("COST_VARIANCE_PCT", self.cost_variance_pct)?;
        if self.expiry_days_warning < 0 {
            return Err(ConfigError::invalid("EXPIRY_DAYS_WARNING cannot be negative"));
        }
        if self.rush.rush_window_days < 0 {
            return Err(ConfigError::invalid("RUSH_WINDOW_DAYS cannot be negative"));
        }
        if let Some((room, limit)) = self.capacity_limits.iter().find(|(_, l)| **l < 0) {
            return Err(ConfigError::invalid(format!(
                "CAPACITY_LIMITS[{room}] cannot be negative (got {limit})"
            )));
        }
        Ok(())
    }
}

fn check_fraction(key: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(format!(
            "{key} must be a finite non-negative fraction (got {value})"
        )));
    }
    Ok(())
}
