// crates/coding-scheme-core/src/runtime/ruleset.rs
// ============================================================================
// Module: RuleSet Evaluator
// Description: Array/fragment addressing, validation, and AND/OR combination.
// Purpose: Decide whether a normalized value satisfies one rule set.
// Dependencies: crate::core, crate::runtime::{logic, normalize, rule, trace}, smallvec
// ============================================================================

//! ## Overview
//! A rule set first narrows the normalized value by its list addressing
//! (`valueArrayPos`), then every rule picks the scalars it looks at:
//!
//! - a fixed list position yields that item alone (null when out of range);
//! - `SUM` replaces a list with the sum of its coerced items;
//! - a valid fragment index selects that position, otherwise any position
//!   counts;
//! - on a list of fragment groups, any item counts and the fragment index
//!   applies inside each group.
//!
//! Validation runs before any rule is matched, so one bad rule or one
//! non-numeric answer fails the whole rule set. Plain scalars and flat list
//! items are validated exactly where they are matched. A fragment group is
//! validated only at the rule's fragment index, or at its first position
//! when the index is absent or out of range; unit or optional capture groups
//! at other positions simply do not match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::core::ArrayAggregate;
use crate::core::NormalizedValue;
use crate::core::RuleSet;
use crate::core::ScalarValue;
use crate::core::ValueArrayPos;
use crate::core::ValueItem;
use crate::runtime::logic::CombineMode;
use crate::runtime::normalize::coerce_number;
use crate::runtime::rule::CompiledRule;
use crate::runtime::rule::RuleError;
use crate::runtime::trace::CodingTrace;
use crate::runtime::trace::NoopTrace;

// ============================================================================
// SECTION: Addressing
// ============================================================================

/// Scalars a rule is evaluated against; inline for typical answer sizes.
type Addressed<'v> = SmallVec<[&'v ScalarValue; 8]>;

/// Purpose a rule's scalars are collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Matching; without a valid fragment index every group position counts.
    Match,
    /// Validation; without a valid fragment index only a group's first position counts.
    Validate,
}

/// Value narrowed by a rule set's list addressing.
#[derive(Debug)]
enum Target<'v> {
    /// Single scalar (possibly computed).
    Scalar(Cow<'v, ScalarValue>),
    /// Fragment group.
    Fragments(&'v [ScalarValue]),
    /// Whole multi-answer list.
    List(&'v [ValueItem]),
}

impl<'v> Target<'v> {
    /// Narrows `value` by the rule set's list addressing.
    fn resolve(
        value: &'v NormalizedValue,
        position: Option<ValueArrayPos>,
    ) -> Result<Self, RuleError> {
        match (value, position) {
            (NormalizedValue::List(items), Some(ValueArrayPos::Index(index))) => {
                let item = usize::try_from(index).ok().and_then(|index| items.get(index));
                Ok(match item {
                    Some(ValueItem::Scalar(scalar)) => Self::Scalar(Cow::Borrowed(scalar)),
                    Some(ValueItem::Fragments(parts)) => Self::Fragments(parts),
                    None => Self::Scalar(Cow::Owned(ScalarValue::Null)),
                })
            }
            (NormalizedValue::List(items), Some(ValueArrayPos::Aggregate(ArrayAggregate::Sum))) => {
                Ok(Self::Scalar(Cow::Owned(ScalarValue::Number(sum_items(items)))))
            }
            (_, Some(ValueArrayPos::Index(position))) => Err(RuleError::PositionOnScalar {
                position,
            }),
            (value, None | Some(ValueArrayPos::Aggregate(_))) => Ok(Self::whole(value)),
        }
    }

    /// Wraps an unaddressed value.
    fn whole(value: &'v NormalizedValue) -> Self {
        match value {
            NormalizedValue::Scalar(scalar) => Self::Scalar(Cow::Borrowed(scalar)),
            NormalizedValue::Fragments(parts) => Self::Fragments(parts),
            NormalizedValue::List(items) => Self::List(items),
        }
    }

    /// Collects the scalars a rule scoped to `fragment` is matched or validated against.
    fn addressed(&self, fragment: Option<usize>, scope: Scope) -> Addressed<'_> {
        match self {
            Self::Scalar(scalar) => SmallVec::from_elem(scalar.as_ref(), 1),
            Self::Fragments(parts) => select_in_group(parts, fragment, scope),
            Self::List(items) => {
                if items.iter().all(|item| matches!(item, ValueItem::Scalar(_))) {
                    select(items.iter().filter_map(item_scalar), fragment)
                } else {
                    items
                        .iter()
                        .flat_map(|item| match item {
                            ValueItem::Scalar(scalar) => SmallVec::from_elem(scalar, 1),
                            ValueItem::Fragments(parts) => select_in_group(parts, fragment, scope),
                        })
                        .collect()
                }
            }
        }
    }
}

/// Selects the positions of one fragment group.
fn select_in_group(parts: &[ScalarValue], fragment: Option<usize>, scope: Scope) -> Addressed<'_> {
    match scope {
        Scope::Match => select(parts.iter(), fragment),
        Scope::Validate => fragment
            .and_then(|index| parts.get(index))
            .or_else(|| parts.first())
            .into_iter()
            .collect(),
    }
}

/// Selects one position when it exists, otherwise every position.
fn select<'v, I>(positions: I, fragment: Option<usize>) -> Addressed<'v>
where
    I: Iterator<Item = &'v ScalarValue> + Clone,
{
    match fragment.and_then(|index| positions.clone().nth(index)) {
        Some(scalar) => SmallVec::from_elem(scalar, 1),
        None => positions.collect(),
    }
}

/// Returns the scalar of a plain list item.
const fn item_scalar(item: &ValueItem) -> Option<&ScalarValue> {
    match item {
        ValueItem::Scalar(scalar) => Some(scalar),
        ValueItem::Fragments(_) => None,
    }
}

/// Sums list items; fragment groups sum their parts and non-numbers count 0.
fn sum_items(items: &[ValueItem]) -> f64 {
    items
        .iter()
        .map(|item| match item {
            ValueItem::Scalar(scalar) => coerce_number(scalar).unwrap_or(0.0),
            ValueItem::Fragments(parts) => {
                parts.iter().map(|part| coerce_number(part).unwrap_or(0.0)).sum()
            }
        })
        .sum()
}

// ============================================================================
// SECTION: Compiled Rule Sets
// ============================================================================

/// Rule set ready for repeated evaluation.
#[derive(Debug, Clone)]
pub struct CompiledRuleSet<'r> {
    /// Source rule set.
    rule_set: &'r RuleSet,
    /// Compiled rules in authoring order.
    rules: Vec<CompiledRule<'r>>,
}

impl<'r> CompiledRuleSet<'r> {
    /// Compiles every rule of a rule set.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleError`] raised by a rule.
    pub fn compile(rule_set: &'r RuleSet) -> Result<Self, RuleError> {
        let rules = rule_set.rules.iter().map(CompiledRule::compile).collect::<Result<_, _>>()?;
        Ok(Self {
            rule_set,
            rules,
        })
    }

    /// Checks that every rule can be applied to the scalars it validates against.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for invalid list addressing or an inapplicable rule.
    pub fn validate(&self, value: &NormalizedValue) -> Result<(), RuleError> {
        let target = Target::resolve(value, self.rule_set.array_position())?;
        self.rules.iter().try_for_each(|rule| {
            target
                .addressed(rule.fragment(), Scope::Validate)
                .iter()
                .try_for_each(|scalar| rule.check_applicable(scalar))
        })
    }

    /// Returns true when the value satisfies the rule set.
    ///
    /// Callers validate first; a value with invalid list addressing does not match.
    pub fn matches<T>(&self, value: &NormalizedValue, ignore_case: bool, trace: &mut T) -> bool
    where
        T: CodingTrace + ?Sized,
    {
        let Ok(target) = Target::resolve(value, self.rule_set.array_position()) else {
            return false;
        };
        CombineMode::from_and_flag(self.rule_set.rule_operator_and).evaluate(&self.rules, |rule| {
            let matched = target
                .addressed(rule.fragment(), Scope::Match)
                .iter()
                .any(|scalar| rule.matches(scalar, ignore_case));
            trace.on_rule_evaluated(rule.rule(), matched);
            matched
        })
    }
}

/// Compiles, validates, and evaluates a rule set against a normalized value.
///
/// # Errors
///
/// Returns [`RuleError`] when the rule set does not compile or validate.
pub fn evaluate_rule_set(
    value: &NormalizedValue,
    rule_set: &RuleSet,
    ignore_case: bool,
) -> Result<bool, RuleError> {
    let compiled = CompiledRuleSet::compile(rule_set)?;
    compiled.validate(value)?;
    Ok(compiled.matches(value, ignore_case, &mut NoopTrace))
}
