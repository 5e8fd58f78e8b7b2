//! Generic rule evaluation.
//!
//! A pass walks a rule list in declaration order against a private copy of the
//! entity. Later rules see what earlier rules changed. Two entry points:
//!
//! - [`evaluate`] is fail-open: a rule whose condition or action errors is
//!   logged and treated as not fired, and the pass continues.
//! - [`try_evaluate`] is strict: the first failing rule aborts the pass.
//!
//! The engine performs no IO beyond `tracing` output and keeps no state
//! between calls.

use serde::Serialize;
use tracing::{debug, debug_span, warn};

use mferp_core::{Entity, Flag, Flagged};

use crate::context::EvaluationContext;
use crate::error::RuleError;

/// Rule condition: decides whether the rule fires for the current value.
pub type Condition<T> =
    Box<dyn Fn(&T, &EvaluationContext<'_>) -> Result<bool, RuleError> + Send + Sync>;

/// Rule action: mutates the value in place (`Ok(None)`) or returns a
/// replacement that supersedes it wholesale (`Ok(Some(next))`).
pub type Action<T> =
    Box<dyn Fn(&mut T, &EvaluationContext<'_>) -> Result<Option<T>, RuleError> + Send + Sync>;

/// One declarative condition/action pair. Holds no state of its own.
pub struct Rule<T> {
    id: String,
    when: Condition<T>,
    then: Vec<Action<T>>,
}

impl<T: 'static> Rule<T> {
    pub fn new<F>(id: impl Into<String>, when: F) -> Self
    where
        F: Fn(&T, &EvaluationContext<'_>) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            when: Box::new(when),
            then: Vec::new(),
        }
    }

    /// Append an action that mutates the working value in place.
    pub fn then<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut T, &EvaluationContext<'_>) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.then.push(Box::new(
            move |value: &mut T, ctx: &EvaluationContext<'_>| -> Result<Option<T>, RuleError> {
                action(value, ctx)?;
                Ok(None)
            },
        ));
        self
    }

    /// Append an action that builds a replacement value.
    pub fn then_replace<F>(mut self, action: F) -> Self
    where
        F: Fn(&T, &EvaluationContext<'_>) -> Result<T, RuleError> + Send + Sync + 'static,
    {
        self.then.push(Box::new(
            move |value: &mut T, ctx: &EvaluationContext<'_>| -> Result<Option<T>, RuleError> {
                action(value, ctx).map(Some)
            },
        ));
        self
    }
}

impl<T> Rule<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action_count(&self) -> usize {
        self.then.len()
    }
}

impl<T: Flagged + 'static> Rule<T> {
    /// Rule that raises `flag` whenever `when` holds.
    pub fn flag<F>(id: impl Into<String>, flag: Flag, when: F) -> Self
    where
        F: Fn(&T, &EvaluationContext<'_>) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        Rule::new(id, when).then(move |value: &mut T, _| {
            value.raise(flag);
            Ok(())
        })
    }
}

impl<T: Clone> Rule<T> {
    /// Run the rule against `current`.
    ///
    /// Returns `Ok(None)` when the condition is false and `Ok(Some(next))` when
    /// the rule fired. Actions work on a scratch copy, so an action error leaves
    /// `current` exactly as it was.
    fn run(&self, current: &T, ctx: &EvaluationContext<'_>) -> Result<Option<T>, RuleError> {
        if !(self.when)(current, ctx)? {
            return Ok(None);
        }
        let mut scratch = current.clone();
        for action in &self.then {
            if let Some(next) = action(&mut scratch, ctx)? {
                scratch = next;
            }
        }
        Ok(Some(scratch))
    }
}

impl<T> core::fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("actions", &self.then.len())
            .finish_non_exhaustive()
    }
}

/// Outcome of a pass: the updated entity and the ids of fired rules, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation<T> {
    pub entity: T,
    pub fired: Vec<String>,
}

impl<T> Evaluation<T> {
    pub fn fired(&self, rule_id: &str) -> bool {
        self.fired.iter().any(|id| id == rule_id)
    }
}

/// Ordered rules scoped to one entity type.
#[derive(Debug)]
pub struct RuleSet<T> {
    name: &'static str,
    rules: Vec<Rule<T>>,
}

impl<T> RuleSet<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule<T>) {
        self.rules.push(rule);
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::id).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<T>> {
        self.rules.iter()
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }
}

impl<T> Extend<Rule<T>> for RuleSet<T> {
    fn extend<I: IntoIterator<Item = Rule<T>>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl<T> IntoIterator for RuleSet<T> {
    type Item = Rule<T>;
    type IntoIter = std::vec::IntoIter<Rule<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<T: Clone + Entity> RuleSet<T> {
    /// Fail-open pass; see [`evaluate`].
    pub fn evaluate(&self, entity: &T, ctx: &EvaluationContext<'_>) -> Evaluation<T> {
        let span = debug_span!("rule_set", name = self.name);
        let _enter = span.enter();
        evaluate(entity, &self.rules, ctx)
    }

    /// Strict pass; see [`try_evaluate`].
    pub fn try_evaluate(
        &self,
        entity: &T,
        ctx: &EvaluationContext<'_>,
    ) -> Result<Evaluation<T>, RuleError> {
        let span = debug_span!("rule_set", name = self.name);
        let _enter = span.enter();
        try_evaluate(entity, &self.rules, ctx)
    }
}

/// Apply `rules` to a copy of `entity`, skipping (and logging) failing rules.
///
/// Skipped rules are logged with the entity's id so the operator can find the
/// record that tripped them.
///
/// The input is never touched; callers get the updated value back. `Clone`
/// copies nested collections too, so the result shares nothing with `entity`.
pub fn evaluate<T: Clone + Entity>(
    entity: &T,
    rules: &[Rule<T>],
    ctx: &EvaluationContext<'_>,
) -> Evaluation<T> {
    let mut working = entity.clone();
    let mut fired = Vec::new();

    for rule in rules {
        match rule.run(&working, ctx) {
            Ok(Some(next)) => {
                debug!(rule_id = %rule.id, "rule fired");
                working = next;
                fired.push(rule.id.clone());
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    rule_id = %rule.id,
                    entity_id = ?entity.id(),
                    error = %err,
                    "rule failed; skipping"
                );
            }
        }
    }

    debug!(evaluated = rules.len(), fired = fired.len(), "evaluation complete");
    Evaluation {
        entity: working,
        fired,
    }
}

/// Like [`evaluate`], but the first failing rule aborts the pass.
pub fn try_evaluate<T: Clone + Entity>(
    entity: &T,
    rules: &[Rule<T>],
    ctx: &EvaluationContext<'_>,
) -> Result<Evaluation<T>, RuleError> {
    let mut working = entity.clone();
    let mut fired = Vec::new();

    for rule in rules {
        match rule.run(&working, ctx) {
            Ok(Some(next)) => {
                debug!(rule_id = %rule.id, "rule fired");
                working = next;
                fired.push(rule.id.clone());
            }
            Ok(None) => {}
            Err(err) => {
                debug!(rule_id = %rule.id, entity_id = ?entity.id(), "strict pass aborted");
                return Err(RuleError::failed(rule.id.clone(), err));
            }
        }
    }

    Ok(Evaluation {
        entity: working,
        fired,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use chrono::{TimeZone, Utc};
    use mferp_core::FlagSet;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Sample {
        id: u32,
        n: i64,
        tags: Vec<&'static str>,
        flags: FlagSet,
    }

    impl Entity for Sample {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    impl Flagged for Sample {
        fn flags(&self) -> &FlagSet {
            &self.flags
        }

        fn flags_mut(&mut self) -> &mut FlagSet {
            &mut self.flags
        }
    }

    fn ctx(config: &RulesConfig) -> EvaluationContext<'_> {
        EvaluationContext::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), config)
    }

    fn always(_: &Sample, _: &EvaluationContext<'_>) -> Result<bool, RuleError> {
        Ok(true)
    }

    #[test]
    fn rules_run_in_declaration_order_and_see_earlier_changes() {
        let config = RulesConfig::default();
        let rules = vec![
            Rule::new("inc", always).then(|p: &mut Sample, _| {
                p.n += 1;
                Ok(())
            }),
            Rule::new("only-after-inc", |p: &Sample, _| Ok(p.n == 1)).then(|p: &mut Sample, _| {
                p.tags.push("saw-inc");
                Ok(())
            }),
        ];

        let out = evaluate(&Sample::default(), &rules, &ctx(&config));
        assert_eq!(out.fired, vec!["inc", "only-after-inc"]);
        assert_eq!(out.entity.tags, vec!["saw-inc"]);

        let reversed: Vec<Rule<Sample>> = rules.into_iter().rev().collect();
        let out = evaluate(&Sample::default(), &reversed, &ctx(&config));
        assert_eq!(out.fired, vec!["inc"]);
        assert!(out.entity.tags.is_empty());
    }

    #[test]
    fn replacement_supersedes_working_value() {
        let config = RulesConfig::default();
        let rules = vec![
            Rule::new("mutate", always).then(|p: &mut Sample, _| {
                p.tags.push("mutated");
                Ok(())
            }),
            Rule::new("replace", always).then_replace(|_: &Sample, _| {
                Ok(Sample {
                    n: 42,
                    ..Sample::default()
                })
            }),
        ];

        let out = evaluate(&Sample::default(), &rules, &ctx(&config));
        assert_eq!(out.entity.n, 42);
        assert!(out.entity.tags.is_empty(), "replacement is not merged");
    }

    #[test]
    fn input_is_left_untouched() {
        let config = RulesConfig::default();
        let rules = vec![Rule::flag("flag", Flag::QaHold, always)];
        let input = Sample::default();
        let out = evaluate(&input, &rules, &ctx(&config));
        assert!(input.flags.is_empty());
        assert!(out.entity.flags.contains(Flag::QaHold));
    }

    #[test]
    fn failing_condition_is_skipped_and_later_rules_still_fire() {
        let config = RulesConfig::default();
        let rules = vec![
            Rule::new("broken", |_: &Sample, _| Err(RuleError::evaluation("boom"))).then(
                |p: &mut Sample, _| {
                    p.n = -1;
                    Ok(())
                },
            ),
            Rule::flag("after", Flag::LowStock, always),
        ];

        let out = evaluate(&Sample::default(), &rules, &ctx(&config));
        assert_eq!(out.fired, vec!["after"]);
        assert_eq!(out.entity.n, 0);
        assert!(out.entity.flags.contains(Flag::LowStock));
    }

    #[test]
    fn failing_action_rolls_back_its_own_rule() {
        let config = RulesConfig::default();
        let rules = vec![
            Rule::new("half-done", always)
                .then(|p: &mut Sample, _| {
                    p.n = 99;
                    Ok(())
                })
                .then(|_: &mut Sample, _| Err(RuleError::evaluation("second action failed"))),
            Rule::new("next", always).then(|p: &mut Sample, _| {
                p.tags.push("next");
                Ok(())
            }),
        ];

        let out = evaluate(&Sample::default(), &rules, &ctx(&config));
        assert_eq!(out.fired, vec!["next"]);
        assert_eq!(out.entity.n, 0);
        assert_eq!(out.entity.tags, vec!["next"]);
    }

    #[test]
    fn strict_pass_reports_the_failing_rule() {
        let config = RulesConfig::default();
        let rules = vec![
            Rule::flag("ok", Flag::LowStock, always),
            Rule::new("broken", |_: &Sample, _| Err(RuleError::evaluation("boom"))),
            Rule::flag("never-reached", Flag::QaHold, always),
        ];

        let err = try_evaluate(&Sample::default(), &rules, &ctx(&config)).unwrap_err();
        assert_eq!(err.rule_id(), Some("broken"));
        match err {
            RuleError::Failed { source, .. } => {
                assert_eq!(*source, RuleError::evaluation("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn strict_pass_matches_fail_open_when_nothing_fails() {
        let config = RulesConfig::default();
        let set = RuleSet::new("sample")
            .with_rule(Rule::flag("a", Flag::LowStock, always))
            .with_rule(Rule::flag("b", Flag::ExpiryRisk, |p: &Sample, _| Ok(p.n > 0)));

        let input = Sample::default();
        let strict = set.try_evaluate(&input, &ctx(&config)).unwrap();
        let lenient = set.evaluate(&input, &ctx(&config));
        assert_eq!(strict, lenient);
        assert!(lenient.fired("a"));
        assert!(!lenient.fired("b"));
    }

    #[test]
    fn rule_set_exposes_ids_in_order() {
        let mut set = RuleSet::new("sample").with_rule(Rule::flag("first", Flag::LowStock, always));
        set.push(Rule::new("second", always));
        assert_eq!(set.name(), "sample");
        assert_eq!(set.ids(), vec!["first", "second"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].action_count(), 1);
        assert_eq!(set.rules()[1].action_count(), 0);
    }

    #[test]
    fn rule_without_actions_still_counts_as_fired() {
        let config = RulesConfig::default();
        let rules = vec![Rule::new("observe", always)];
        let out = evaluate(&Sample::default(), &rules, &ctx(&config));
        assert_eq!(out.fired, vec!["observe"]);
        assert_eq!(out.entity, Sample::default());
    }
}
