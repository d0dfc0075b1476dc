//! Condition evaluation.
//!
//! Operators never fail: an operand of the wrong type makes the rule
//! evaluate to `false`. An absent key in the watched-value map is
//! "undefined" and reaches the operators as `None`.

use std::collections::BTreeMap;

use forma_core::condition::{ActionBundle, ConditionRule, MultiConditionRule};
use forma_core::enums::{ConditionOp, LegacyAction, Logic};
use forma_core::field::FieldSchema;
use forma_core::value::{FieldValue, ValueMap};
use serde::Serialize;

/// UI state of one field under the current watched-value map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalState {
    pub is_hidden: bool,
    pub is_disabled: bool,
    pub is_required: bool,
    /// The `then`/`else` bundle that produced this state, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<ActionBundle>,
}

/// Evaluate a single rule against the watched field's current value.
#[must_use]
pub fn evaluate_condition_rule(rule: &ConditionRule, value: Option<&FieldValue>) -> bool {
    let expected = rule.value.as_ref();
    match rule.op {
        ConditionOp::Exists => is_present(value),
        ConditionOp::NotExists => !is_present(value),
        ConditionOp::Eq => expected.is_some() && value == expected,
        ConditionOp::Ne => value != expected,
        ConditionOp::In => contains(expected, value),
        ConditionOp::NotIn => !contains(expected, value),
        ConditionOp::Gt => compare(value, expected, |a, b| a > b),
        ConditionOp::Gte => compare(value, expected, |a, b| a >= b),
        ConditionOp::Lt => compare(value, expected, |a, b| a < b),
        ConditionOp::Lte => compare(value, expected, |a, b| a <= b),
    }
}

/// Evaluate every inner rule against the same map and fold with the rule's
/// logic.
#[must_use]
pub fn evaluate_multi_condition_rule(rule: &MultiConditionRule, values: &ValueMap) -> bool {
    let mut results = rule
        .conditions
        .iter()
        .map(|inner| evaluate_condition_rule(inner, values.get(&inner.field)));
    match rule.logic {
        Logic::And => results.all(|r| r),
        Logic::Or => results.any(|r| r),
    }
}

/// Compute the hidden/disabled/required state of `field`.
///
/// A multi-rule `conditions` block wins over a single `condition`. Within
/// the chosen rule, a `then`/`else` bundle for the evaluated branch fully
/// replaces the legacy `action` keyword. Without any rule the field is
/// visible, enabled, and required only if its static validation says so.
#[must_use]
pub fn get_conditional_actions(field: &FieldSchema, values: &ValueMap) -> ConditionalState {
    let mut state = ConditionalState {
        is_required: field.is_statically_required(),
        ..ConditionalState::default()
    };

    if let Some(multi) = &field.conditions {
        let result = evaluate_multi_condition_rule(multi, values);
        apply_branch(&mut state, result, multi.branch(result), multi.action);
    } else if let Some(rule) = &field.condition {
        let result = evaluate_condition_rule(rule, values.get(&rule.field));
        apply_branch(&mut state, result, rule.branch(result), rule.action);
    }

    state
}

/// State of every field, keyed by name.
#[must_use]
pub fn evaluate_fields(fields: &[FieldSchema], values: &ValueMap) -> BTreeMap<String, ConditionalState> {
    fields
        .iter()
        .map(|f| (f.name.clone(), get_conditional_actions(f, values)))
        .collect()
}

/// Names of the fields whose changes can alter `field`'s state.
#[must_use]
pub fn watched_fields(field: &FieldSchema) -> Vec<&str> {
    let mut names: Vec<&str> = field.condition_rules().map(|r| r.field.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names
}

fn apply_branch(
    state: &mut ConditionalState,
    result: bool,
    bundle: Option<&ActionBundle>,
    legacy: Option<LegacyAction>,
) {
    if let Some(bundle) = bundle {
        state.is_hidden = bundle.hide.unwrap_or(false);
        state.is_disabled = bundle.disable.unwrap_or(false);
        if let Some(require) = bundle.require {
            state.is_required = require;
        }
        state.actions = Some(bundle.clone());
        return;
    }

    match legacy {
        Some(LegacyAction::Show) => state.is_hidden = !result,
        Some(LegacyAction::Hide) => state.is_hidden = result,
        Some(LegacyAction::Enable) => state.is_disabled = !result,
        Some(LegacyAction::Disable) => state.is_disabled = result,
        Some(LegacyAction::Require) => state.is_required |= result,
        None => {}
    }
}

fn is_present(value: Option<&FieldValue>) -> bool {
    value.is_some_and(|v| !v.is_blank())
}

/// `in` semantics: list/list intersects, list/scalar is membership either
/// way round, scalar/scalar is equality.
fn contains(expected: Option<&FieldValue>, actual: Option<&FieldValue>) -> bool {
    let (Some(expected), Some(actual)) = (expected, actual) else {
        return false;
    };
    match (expected, actual) {
        (FieldValue::List(allowed), FieldValue::List(given)) => {
            given.iter().any(|item| allowed.contains(item))
        }
        (FieldValue::List(allowed), scalar) => allowed.contains(scalar),
        (scalar, FieldValue::List(given)) => given.contains(scalar),
        (a, b) => a == b,
    }
}

fn compare(
    actual: Option<&FieldValue>,
    expected: Option<&FieldValue>,
    cmp: impl Fn(f64, f64) -> bool,
) -> bool {
    match (actual.and_then(FieldValue::as_number), expected.and_then(FieldValue::as_number)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forma_core::enums::FieldKind;
    use forma_core::field::FieldValidation;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rule(op: ConditionOp, value: Option<FieldValue>) -> ConditionRule {
        ConditionRule::new("watched", op, value)
    }

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::List(items.iter().map(|s| FieldValue::from(*s)).collect())
    }

    #[rstest]
    #[case::empty_string(Some(FieldValue::from("")))]
    #[case::null(Some(FieldValue::Null))]
    #[case::undefined(None)]
    #[case::empty_list(Some(FieldValue::List(vec![])))]
    fn blank_values_are_absent(#[case] value: Option<FieldValue>) {
        assert!(!evaluate_condition_rule(&rule(ConditionOp::Exists, None), value.as_ref()));
        assert!(evaluate_condition_rule(&rule(ConditionOp::NotExists, None), value.as_ref()));
    }

    #[rstest]
    #[case::zero(FieldValue::from(0))]
    #[case::false_flag(FieldValue::from(false))]
    #[case::text(FieldValue::from("x"))]
    #[case::list(list(&["a"]))]
    fn other_values_are_present(#[case] value: FieldValue) {
        assert!(evaluate_condition_rule(&rule(ConditionOp::Exists, None), Some(&value)));
        assert!(!evaluate_condition_rule(&rule(ConditionOp::NotExists, None), Some(&value)));
    }

    #[rstest]
    #[case::list_intersects(list(&["b", "c"]), true)]
    #[case::list_disjoint(list(&["x", "y"]), false)]
    #[case::scalar_member(FieldValue::from("a"), true)]
    #[case::scalar_outsider(FieldValue::from("z"), false)]
    fn in_against_list_operand(#[case] actual: FieldValue, #[case] expected: bool) {
        let r = rule(ConditionOp::In, Some(list(&["a", "b"])));
        assert_eq!(evaluate_condition_rule(&r, Some(&actual)), expected);
        let not = rule(ConditionOp::NotIn, Some(list(&["a", "b"])));
        assert_eq!(evaluate_condition_rule(&not, Some(&actual)), !expected);
    }

    #[test]
    fn in_with_scalar_operand() {
        let r = rule(ConditionOp::In, Some(FieldValue::from("a")));
        assert!(evaluate_condition_rule(&r, Some(&list(&["a", "q"]))));
        assert!(evaluate_condition_rule(&r, Some(&FieldValue::from("a"))));
        assert!(!evaluate_condition_rule(&r, Some(&FieldValue::from("b"))));
    }

    #[test]
    fn in_with_undefined_field_is_false() {
        let r = rule(ConditionOp::In, Some(list(&["a"])));
        assert!(!evaluate_condition_rule(&r, None));
        let not = rule(ConditionOp::NotIn, Some(list(&["a"])));
        assert!(evaluate_condition_rule(&not, None));
    }

    #[rstest]
    #[case::gt(ConditionOp::Gt, 5.0, 3.0, true)]
    #[case::gt_equal(ConditionOp::Gt, 3.0, 3.0, false)]
    #[case::gte(ConditionOp::Gte, 3.0, 3.0, true)]
    #[case::lt(ConditionOp::Lt, 2.0, 3.0, true)]
    #[case::lte(ConditionOp::Lte, 4.0, 3.0, false)]
    fn numeric_ordering(
        #[case] op: ConditionOp,
        #[case] actual: f64,
        #[case] threshold: f64,
        #[case] expected: bool,
    ) {
        let r = rule(op, Some(FieldValue::Number(threshold)));
        assert_eq!(evaluate_condition_rule(&r, Some(&FieldValue::Number(actual))), expected);
    }

    #[rstest]
    #[case::string_actual(Some(FieldValue::from("10")))]
    #[case::bool_actual(Some(FieldValue::from(true)))]
    #[case::undefined(None)]
    fn ordering_type_mismatch_is_false(#[case] actual: Option<FieldValue>) {
        for op in [ConditionOp::Gt, ConditionOp::Gte, ConditionOp::Lt, ConditionOp::Lte] {
            let r = rule(op, Some(FieldValue::Number(1.0)));
            assert!(!evaluate_condition_rule(&r, actual.as_ref()), "{op}");
        }
    }

    #[test]
    fn eq_with_undefined_expected_never_matches() {
        let r = rule(ConditionOp::Eq, None);
        assert!(!evaluate_condition_rule(&r, None));
        assert!(!evaluate_condition_rule(&r, Some(&FieldValue::from("x"))));
    }

    #[test]
    fn eq_and_ne_are_strict() {
        let r = rule(ConditionOp::Eq, Some(FieldValue::from(1)));
        assert!(evaluate_condition_rule(&r, Some(&FieldValue::Number(1.0))));
        assert!(!evaluate_condition_rule(&r, Some(&FieldValue::from("1"))));
        let ne = rule(ConditionOp::Ne, Some(FieldValue::from(1)));
        assert!(ne_matches(&ne, &FieldValue::from("1")));
    }

    fn ne_matches(r: &ConditionRule, v: &FieldValue) -> bool {
        evaluate_condition_rule(r, Some(v))
    }

    #[test]
    fn multi_rule_folds_and_or() {
        let mut multi = MultiConditionRule {
            conditions: vec![
                ConditionRule::new("a", ConditionOp::Exists, None),
                ConditionRule::new("b", ConditionOp::Eq, Some(FieldValue::from("yes"))),
            ],
            logic: Logic::And,
            action: None,
            then: None,
            otherwise: None,
        };
        let values: ValueMap = [("a".to_string(), FieldValue::from("set"))].into();
        assert!(!evaluate_multi_condition_rule(&multi, &values));
        multi.logic = Logic::Or;
        assert!(evaluate_multi_condition_rule(&multi, &values));
    }

    fn field_with_rule(rule: ConditionRule) -> FieldSchema {
        let mut field = FieldSchema::new("vat", FieldKind::Text);
        field.condition = Some(rule);
        field
    }

    #[test]
    fn field_without_conditions_uses_static_floor() {
        let mut field = FieldSchema::new("name", FieldKind::Text);
        field.validation = Some(FieldValidation {
            required: true,
            ..Default::default()
        });
        let state = get_conditional_actions(&field, &ValueMap::new());
        assert_eq!(
            state,
            ConditionalState {
                is_hidden: false,
                is_disabled: false,
                is_required: true,
                actions: None,
            }
        );
    }

    #[test]
    fn bundle_supersedes_legacy_action() {
        let mut r = ConditionRule::new("kind", ConditionOp::Eq, Some(FieldValue::from("company")));
        r.action = Some(LegacyAction::Hide);
        r.then = Some(ActionBundle {
            require: Some(true),
            ..Default::default()
        });
        let field = field_with_rule(r);
        let values: ValueMap = [("kind".to_string(), FieldValue::from("company"))].into();

        let state = get_conditional_actions(&field, &values);
        assert!(!state.is_hidden, "legacy hide must not be merged");
        assert!(state.is_required);
        assert!(state.actions.is_some());
    }

    #[test]
    fn legacy_action_applies_when_branch_has_no_bundle() {
        let mut r = ConditionRule::new("kind", ConditionOp::Eq, Some(FieldValue::from("company")));
        r.action = Some(LegacyAction::Show);
        r.then = Some(ActionBundle {
            require: Some(true),
            ..Default::default()
        });
        let field = field_with_rule(r);
        let values: ValueMap = [("kind".to_string(), FieldValue::from("person"))].into();

        let state = get_conditional_actions(&field, &values);
        assert!(state.is_hidden);
        assert!(!state.is_required);
        assert!(state.actions.is_none());
    }

    #[rstest]
    #[case::hide_true(LegacyAction::Hide, true, (true, false, false))]
    #[case::hide_false(LegacyAction::Hide, false, (false, false, false))]
    #[case::show_false(LegacyAction::Show, false, (true, false, false))]
    #[case::disable_true(LegacyAction::Disable, true, (false, true, false))]
    #[case::enable_false(LegacyAction::Enable, false, (false, true, false))]
    #[case::require_true(LegacyAction::Require, true, (false, false, true))]
    #[case::require_false(LegacyAction::Require, false, (false, false, false))]
    fn legacy_keywords(
        #[case] action: LegacyAction,
        #[case] matches: bool,
        #[case] expected: (bool, bool, bool),
    ) {
        let mut r = ConditionRule::new("flag", ConditionOp::Eq, Some(FieldValue::from(true)));
        r.action = Some(action);
        let field = field_with_rule(r);
        let values: ValueMap = [("flag".to_string(), FieldValue::from(matches))].into();
        let state = get_conditional_actions(&field, &values);
        assert_eq!((state.is_hidden, state.is_disabled, state.is_required), expected);
    }

    #[test]
    fn multi_rule_wins_over_single_rule() {
        let mut field = FieldSchema::new("vat", FieldKind::Text);
        let mut single = ConditionRule::new("a", ConditionOp::Exists, None);
        single.action = Some(LegacyAction::Hide);
        field.condition = Some(single);
        field.conditions = Some(MultiConditionRule {
            conditions: vec![ConditionRule::new("a", ConditionOp::Exists, None)],
            logic: Logic::And,
            action: Some(LegacyAction::Disable),
            then: None,
            otherwise: None,
        });
        let values: ValueMap = [("a".to_string(), FieldValue::from("x"))].into();
        let state = get_conditional_actions(&field, &values);
        assert!(!state.is_hidden);
        assert!(state.is_disabled);
    }

    #[test]
    fn bundle_require_false_overrides_static_required() {
        let mut r = ConditionRule::new("kind", ConditionOp::Exists, None);
        r.then = Some(ActionBundle {
            require: Some(false),
            ..Default::default()
        });
        let mut field = field_with_rule(r);
        field.validation = Some(FieldValidation {
            required: true,
            ..Default::default()
        });
        let values: ValueMap = [("kind".to_string(), FieldValue::from("x"))].into();
        assert!(!get_conditional_actions(&field, &values).is_required);
    }

    #[test]
    fn watched_fields_are_deduplicated() {
        let mut field = FieldSchema::new("total", FieldKind::Number);
        field.conditions = Some(MultiConditionRule {
            conditions: vec![
                ConditionRule::new("b", ConditionOp::Exists, None),
                ConditionRule::new("a", ConditionOp::Exists, None),
                ConditionRule::new("b", ConditionOp::Gt, Some(FieldValue::from(1))),
            ],
            logic: Logic::Or,
            action: None,
            then: None,
            otherwise: None,
        });
        assert_eq!(watched_fields(&field), vec!["a", "b"]);
    }
}
