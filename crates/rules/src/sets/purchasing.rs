//! Cost checks and the approval-time status transition for purchase orders.

use mferp_core::{Flag, Status};
use mferp_purchasing::{PurchaseOrder, PurchaseOrderLine};

use crate::config::{RulesConfig, VarianceBaseline};
use crate::engine::{Rule, RuleSet};
use crate::error::RuleError;

pub const COST_VARIANCE: &str = "CostVariance";
pub const APPROVED_TO_ALLOCATION: &str = "ApprovedToAllocation";

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Whether any line's unit cost strays from the baseline by more than
/// `COST_VARIANCE_PCT`, measured as `|cost - baseline| / max(1, baseline)`.
///
/// Only lines with a cost take part, and fewer than two such lines never
/// fires. With the default [`VarianceBaseline::First`] the baseline is the
/// first costed line.
pub fn cost_variance_exceeded(
    lines: &[PurchaseOrderLine],
    config: &RulesConfig,
) -> Result<bool, RuleError> {
    let mut costs = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if let Some(cost) = line.cost {
            if !cost.is_finite() {
                return Err(RuleError::evaluation(format!(
                    "line {} ({}) has a non-finite cost",
                    i + 1,
                    line.sku
                )));
            }
            costs.push(cost);
        }
    }
    if costs.len() < 2 {
        return Ok(false);
    }

    let baseline = match config.variance_baseline {
        VarianceBaseline::First => costs[0],
        VarianceBaseline::Mean => costs.iter().sum::<f64>() / costs.len() as f64,
        VarianceBaseline::Median => {
            let mut sorted = costs.clone();
            sorted.sort_by(f64::total_cmp);
            median(&sorted)
        }
    };
    let denominator = baseline.max(1.0);

    Ok(costs
        .iter()
        .any(|cost| (cost - baseline).abs() / denominator > config.cost_variance_pct))
}

/// Status an approved order moves to.
///
/// Any line with a non-positive quantity backorders the whole order. This is a
/// stand-in for a real availability check against inventory.
pub fn allocation_status(order: &PurchaseOrder) -> Status {
    if order.lines.iter().any(|line| line.qty <= 0) {
        Status::Backordered
    } else {
        Status::Allocated
    }
}

pub fn purchase_order_rules() -> RuleSet<PurchaseOrder> {
    RuleSet::new("purchase_order")
        .with_rule(Rule::flag(COST_VARIANCE, Flag::CostVariance, |po: &PurchaseOrder, ctx| {
            cost_variance_exceeded(&po.lines, ctx.config)
        }))
        .with_rule(
            Rule::new(APPROVED_TO_ALLOCATION, |po: &PurchaseOrder, _| {
                Ok(po.status == Status::Approved)
            })
            .then(|po: &mut PurchaseOrder, _| {
                po.status = allocation_status(po);
                Ok(())
            }),
        )
}
