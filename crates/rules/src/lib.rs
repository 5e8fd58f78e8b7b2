//! `mferp-rules` — declarative business rules for inventory, purchasing and
//! production.
//!
//! Callers hold one entity, pick the matching rule set and evaluate it with an
//! [`EvaluationContext`]. The result is the updated entity (flags and status
//! possibly changed) plus the ids of the rules that fired; persisting or
//! displaying it is the caller's job.
//!
//! ```ignore
//! let config = RulesConfig::default();
//! let ctx = EvaluationContext::new(Utc::now(), &config);
//! let out = inventory_rules().evaluate(&item, &ctx);
//! if out.fired("LowStock") { /* reorder */ }
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod sets;

pub use config::{RulesConfig, RushPolicy, VarianceBaseline};
pub use context::{EvaluationContext, InventoryIndex, days_until};
pub use engine::{Action, Condition, Evaluation, Rule, RuleSet, evaluate, try_evaluate};
pub use error::{ConfigError, RuleError};
pub use sets::{inventory_rules, production_rules, purchase_order_rules};
