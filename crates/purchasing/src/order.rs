use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mferp_core::{DomainError, DomainResult, Entity, FlagSet, Flagged, PurchaseOrderId, Status};

/// Who the goods are bought for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseOrderType {
    /// Materials for the company's own brand.
    Brand,
    /// Materials bought on behalf of a co-packing customer.
    Copacking,
}

/// Purchase order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    pub sku: String,
    pub qty: i64,
    /// Unit cost; lines without a quoted cost are skipped by cost checks.
    #[serde(default)]
    pub cost: Option<f64>,
}

impl PurchaseOrderLine {
    pub fn new(sku: impl Into<String>, qty: i64, cost: Option<f64>) -> Self {
        Self {
            sku: sku.into(),
            qty,
            cost,
        }
    }

    /// `qty * cost`, when a cost is known.
    pub fn extended_cost(&self) -> Option<f64> {
        self.cost.map(|c| c * self.qty as f64)
    }
}

/// Purchase order as supplied by the order-entry layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    #[serde(rename = "type")]
    pub order_type: PurchaseOrderType,
    pub status: Status,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub lines: Vec<PurchaseOrderLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub flags: FlagSet,
}

impl PurchaseOrder {
    pub fn new(id: PurchaseOrderId, order_type: PurchaseOrderType, status: Status) -> Self {
        Self {
            id,
            order_type,
            status,
            supplier_id: None,
            customer_id: None,
            lines: Vec::new(),
            created_at: None,
            updated_at: None,
            flags: FlagSet::new(),
        }
    }

    pub fn with_line(mut self, line: PurchaseOrderLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Sum of extended costs over the lines that carry a cost.
    pub fn total_cost(&self) -> f64 {
        self.lines.iter().filter_map(PurchaseOrderLine::extended_cost).sum()
    }

    /// Input checks for callers that want to reject bad records up front.
    ///
    /// Line quantities are deliberately not checked: a non-positive quantity is
    /// what drives an approved order to `Backordered`.
    pub fn validate(&self) -> DomainResult<()> {
        for (i, line) in self.lines.iter().enumerate() {
            if line.sku.trim().is_empty() {
                return Err(DomainError::validation(format!("line {}: sku cannot be empty", i + 1)));
            }
            if let Some(cost) = line.cost {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(DomainError::validation(format!(
                        "line {}: cost must be a finite non-negative number",
                        i + 1
                    )));
                }
            }
        }
        if let (Some(created), Some(updated)) = (self.created_at, self.updated_at) {
            if updated < created {
                return Err(DomainError::invariant("updated_at precedes created_at"));
            }
        }
        Ok(())
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Flagged for PurchaseOrder {
    fn flags(&self) -> &FlagSet {
        &self.flags
    }

    fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order() -> PurchaseOrder {
        PurchaseOrder::new(PurchaseOrderId::new(), PurchaseOrderType::Brand, Status::Draft)
    }

    #[test]
    fn total_cost_skips_lines_without_cost() {
        let order = test_order()
            .with_line(PurchaseOrderLine::new("A", 10, Some(2.5)))
            .with_line(PurchaseOrderLine::new("B", 4, None))
            .with_line(PurchaseOrderLine::new("C", 2, Some(10.0)));
        assert_eq!(order.total_cost(), 45.0);
    }

    #[test]
    fn validate_allows_zero_quantity_lines() {
        let order = test_order().with_line(PurchaseOrderLine::new("A", 0, Some(1.0)));
        assert!(order.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_cost() {
        let order = test_order().with_line(PurchaseOrderLine::new("A", 1, Some(-3.0)));
        match order.validate().unwrap_err() {
            DomainError::Validation(msg) if msg.starts_with("line 1") => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_field_uses_wire_name() {
        let order = test_order();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["type"], "Brand");
        assert_eq!(json["status"], "Draft");
        assert!(json.get("orderType").is_none());
    }
}
