//! `mferp-rules` — evaluate one entity from a JSON file and print the result.
//!
//! ```text
//! mferp-rules <inventory|purchase-order|production> <entity.json> [--now <RFC3339>] [--config <rules.json>]
//! ```
//!
//! The rules config can also come from `MFERP_RULES_CONFIG`; defaults apply
//! when neither is given.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde::de::DeserializeOwned;

use mferp_core::Entity;
use mferp_inventory::InventoryItem;
use mferp_production::ProductionOrder;
use mferp_purchasing::PurchaseOrder;
use mferp_rules::{
    EvaluationContext, RuleSet, RulesConfig, inventory_rules, production_rules,
    purchase_order_rules,
};

const CONFIG_ENV: &str = "MFERP_RULES_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EntityKind {
    Inventory,
    #[value(alias = "po")]
    PurchaseOrder,
    Production,
}

/// Evaluate one entity against its business rules and print the outcome as JSON.
#[derive(Debug, Parser)]
#[command(name = "mferp-rules", version, about, long_about = None)]
struct Cli {
    /// Kind of entity stored in the file
    #[arg(value_enum)]
    kind: EntityKind,

    /// JSON file holding the entity
    path: PathBuf,

    /// Evaluation time as RFC3339 (defaults to the current time)
    #[arg(long, value_parser = parse_rfc3339)]
    now: Option<DateTime<Utc>>,

    /// Rules config file (defaults apply when unset)
    #[arg(long, env = CONFIG_ENV)]
    config: Option<PathBuf>,
}

fn parse_rfc3339(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("`{raw}` is not RFC3339: {e}"))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RulesConfig> {
    match path {
        Some(path) => RulesConfig::from_path(path)
            .with_context(|| format!("loading rules config from {}", path.display())),
        None => {
            tracing::warn!("{CONFIG_ENV} not set; using default rules config");
            Ok(RulesConfig::default())
        }
    }
}

fn run<T>(path: &Path, rules: RuleSet<T>, ctx: &EvaluationContext<'_>) -> anyhow::Result<String>
where
    T: Clone + Entity + Serialize + DeserializeOwned,
{
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let entity: T = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as {}", path.display(), rules.name()))?;

    let outcome = rules.evaluate(&entity, ctx);
    tracing::info!(rule_set = rules.name(), entity_id = ?entity.id(), fired = ?outcome.fired, "evaluated");
    Ok(serde_json::to_string_pretty(&outcome)?)
}

fn main() -> anyhow::Result<()> {
    mferp_observability::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let ctx = EvaluationContext::new(cli.now.unwrap_or_else(Utc::now), &config);

    let output = match cli.kind {
        EntityKind::Inventory => run::<InventoryItem>(&cli.path, inventory_rules(), &ctx)?,
        EntityKind::PurchaseOrder => {
            run::<PurchaseOrder>(&cli.path, purchase_order_rules(), &ctx)?
        }
        EntityKind::Production => run::<ProductionOrder>(&cli.path, production_rules(), &ctx)?,
    };
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use mferp_core::ProductionOrderId;
    use serde_json::{Value, json};
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("mferp-rules").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_kind_path_and_now() {
        let cli = parse(&["po", "order.json", "--now", "2024-05-01T00:00:00Z"]).unwrap();
        assert_eq!(cli.kind, EntityKind::PurchaseOrder);
        assert_eq!(cli.path, PathBuf::from("order.json"));
        assert_eq!(cli.now.unwrap().to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn accepts_equals_form_and_converts_to_utc() {
        let cli = parse(&["--now=2024-05-01T10:00:00+02:00", "production", "run.json"]).unwrap();
        assert_eq!(cli.kind, EntityKind::Production);
        assert_eq!(cli.now.unwrap().to_rfc3339(), "2024-05-01T08:00:00+00:00");
    }

    #[test]
    fn long_kind_name_and_config_flag() {
        let cli = parse(&["purchase-order", "o.json", "--config", "rules.json"]).unwrap();
        assert_eq!(cli.kind, EntityKind::PurchaseOrder);
        assert_eq!(cli.config, Some(PathBuf::from("rules.json")));
    }

    #[test]
    fn reports_specific_errors() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(
            parse(&["invoice", "x.json"]).unwrap_err().kind(),
            ErrorKind::InvalidValue
        );
        assert_eq!(
            parse(&["inventory", "a.json", "--nwo", "2024-05-01T00:00:00Z"])
                .unwrap_err()
                .kind(),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            parse(&["inventory", "a.json", "--now", "yesterday"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&["inventory"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn run_reads_evaluates_and_prints_the_outcome() {
        let id = ProductionOrderId::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"id":"{id}","productSku":"GRANOLA-BAR","qty":120,"room":"Main Room"}}"#
        )
        .unwrap();

        let config = RulesConfig::default();
        let ctx = EvaluationContext::new(Utc::now(), &config);
        let output = run::<ProductionOrder>(file.path(), production_rules(), &ctx).unwrap();

        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["fired"], json!(["StatusNormalization"]));
        assert_eq!(parsed["entity"]["status"], "Scheduled");
        assert_eq!(parsed["entity"]["productSku"], "GRANOLA-BAR");
        assert_eq!(parsed["entity"]["id"], id.to_string());
        assert_eq!(parsed["entity"]["flags"], json!([]));
    }

    #[test]
    fn run_reports_malformed_entities() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"productSku": 7}}"#).unwrap();

        let config = RulesConfig::default();
        let ctx = EvaluationContext::new(Utc::now(), &config);
        let err = run::<ProductionOrder>(file.path(), production_rules(), &ctx).unwrap_err();
        assert!(err.to_string().contains("as production"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/definitely/not/rules.json"))).unwrap_err();
        assert!(err.to_string().contains("loading rules config"));
    }
}
