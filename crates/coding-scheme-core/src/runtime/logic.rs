// crates/coding-scheme-core/src/runtime/logic.rs
// ============================================================================
// Module: Combine Modes
// Description: Short-circuit AND/OR over rule and rule-set outcomes.
// Purpose: Share one combinator between rule sets and codes.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Rules within a rule set and rule sets within a code combine with the same
//! AND/OR semantics. Evaluation stops at the first deciding element. Unlike
//! the usual identities, an empty group never matches: a rule set without
//! rules or a code without rule sets carries no condition to satisfy.

// ============================================================================
// SECTION: Combine Mode
// ============================================================================

/// Boolean combine mode for rule groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombineMode {
    /// Every element must match.
    And,
    /// At least one element must match.
    Or,
}

impl CombineMode {
    /// Maps an `*OperatorAnd` flag to a combine mode.
    #[must_use]
    pub const fn from_and_flag(and: bool) -> Self {
        if and { Self::And } else { Self::Or }
    }

    /// Evaluates `predicate` over `items`, short-circuiting on the deciding element.
    ///
    /// Returns false for an empty group.
    pub fn evaluate<I, F>(self, items: I, predicate: F) -> bool
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> bool,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return false;
        }
        match self {
            Self::And => items.all(predicate),
            Self::Or => items.any(predicate),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::CombineMode;

    #[test]
    fn empty_groups_never_match() {
        assert!(!CombineMode::And.evaluate(Vec::<bool>::new(), |flag| flag));
        assert!(!CombineMode::Or.evaluate(Vec::<bool>::new(), |flag| flag));
    }

    #[test]
    fn and_stops_at_first_miss() {
        let mut visited = 0;
        let result = CombineMode::And.evaluate([true, false, true], |flag| {
            visited += 1;
            flag
        });
        assert!(!result);
        assert_eq!(visited, 2);
    }

    #[test]
    fn or_stops_at_first_hit() {
        let mut visited = 0;
        let result = CombineMode::Or.evaluate([false, true, false], |flag| {
            visited += 1;
            flag
        });
        assert!(result);
        assert_eq!(visited, 2);
    }
}
