//! Stock, expiry and risk flags for inventory items.

use mferp_core::Flag;
use mferp_inventory::InventoryItem;

use crate::config::RulesConfig;
use crate::context::EvaluationContext;
use crate::engine::{Rule, RuleSet};
use crate::error::RuleError;

pub const LOW_STOCK: &str = "LowStock";
pub const MOQ_BREACHED: &str = "MOQBreached";
pub const EXPIRY_RISK: &str = "ExpiryRisk";
pub const ALLERGEN_RISK: &str = "AllergenRisk";
pub const QA_HOLD: &str = "QAHold";

fn stock_position(item: &InventoryItem) -> Result<i64, RuleError> {
    item.total_position()
        .ok_or_else(|| RuleError::evaluation(format!("stock position of {} overflows", item.sku)))
}

/// Stock level at or below which an item is low:
/// `max(reorder_point or 0, ceil((on_hand + allocated) * LOW_STOCK_THRESHOLD_PCT))`.
pub fn low_stock_threshold(item: &InventoryItem, config: &RulesConfig) -> Result<i64, RuleError> {
    let position = stock_position(item)?;
    let by_pct = (position as f64 * config.low_stock_threshold_pct).ceil() as i64;
    Ok(item.reorder_point.unwrap_or(0).max(by_pct))
}

pub fn is_low_stock(item: &InventoryItem, config: &RulesConfig) -> Result<bool, RuleError> {
    Ok(item.on_hand <= low_stock_threshold(item, config)?)
}

/// A zero or missing MOQ never fires.
pub fn is_below_moq(item: &InventoryItem) -> Result<bool, RuleError> {
    match item.moq {
        Some(moq) if moq != 0 => Ok(stock_position(item)? < moq),
        _ => Ok(false),
    }
}

/// Expired, expiring today, or expiring within `EXPIRY_DAYS_WARNING` days.
pub fn expiry_at_risk(item: &InventoryItem, ctx: &EvaluationContext<'_>) -> bool {
    item.expiry_date
        .is_some_and(|expiry| ctx.days_until(expiry) <= ctx.config.expiry_days_warning)
}

pub fn inventory_rules() -> RuleSet<InventoryItem> {
    RuleSet::new("inventory")
        .with_rule(Rule::flag(LOW_STOCK, Flag::LowStock, |item: &InventoryItem, ctx| {
            is_low_stock(item, ctx.config)
        }))
        .with_rule(Rule::flag(MOQ_BREACHED, Flag::MoqBreached, |item: &InventoryItem, _| {
            is_below_moq(item)
        }))
        .with_rule(Rule::flag(EXPIRY_RISK, Flag::ExpiryRisk, |item: &InventoryItem, ctx| {
            Ok(expiry_at_risk(item, ctx))
        }))
        .with_rule(Rule::flag(ALLERGEN_RISK, Flag::AllergenRisk, |item: &InventoryItem, _| {
            Ok(!item.allergens.is_empty())
        }))
        .with_rule(Rule::flag(QA_HOLD, Flag::QaHold, |item: &InventoryItem, _| {
            Ok(item.qa_hold)
        }))
}
