//! Capacity checks and status defaulting for production orders.

use mferp_core::{Flag, Status};
use mferp_production::ProductionOrder;

use crate::context::EvaluationContext;
use crate::engine::{Rule, RuleSet};

pub const CAPACITY_OVERLOAD: &str = "CapacityOverload";
pub const STATUS_NORMALIZATION: &str = "StatusNormalization";

/// Where the run happens: the assigned line if set, otherwise the room.
pub fn resolve_room(order: &ProductionOrder) -> Option<&str> {
    order.assigned_line.as_deref().or(order.room.as_deref())
}

/// Capacity units the run consumes; `qty` when not given explicitly.
pub fn required_capacity(order: &ProductionOrder) -> i64 {
    order.required_capacity.unwrap_or(order.qty)
}

/// Strictly over the configured limit. Rooms without a limit never overload.
pub fn is_over_capacity(order: &ProductionOrder, ctx: &EvaluationContext<'_>) -> bool {
    resolve_room(order)
        .and_then(|room| ctx.config.capacity_limit(room))
        .is_some_and(|limit| required_capacity(order) > limit)
}

pub fn production_rules() -> RuleSet<ProductionOrder> {
    RuleSet::new("production")
        .with_rule(Rule::flag(
            CAPACITY_OVERLOAD,
            Flag::CapacityOverload,
            |order: &ProductionOrder, ctx| Ok(is_over_capacity(order, ctx)),
        ))
        // Must stay last: it reads `status` as the caller supplied it.
        .with_rule(
            Rule::new(STATUS_NORMALIZATION, |order: &ProductionOrder, _| {
                Ok(order.status.is_none())
            })
            .then_replace(|order: &ProductionOrder, _| {
                Ok(ProductionOrder {
                    status: Some(Status::Scheduled),
                    ..order.clone()
                })
            }),
        )
}
