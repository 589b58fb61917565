//! Rule-tree combinator.
//!
//! Walks a category tree and assembles `&`-joined predicate strings:
//! - `combined_paths`: every chain from a node down to an outcome leaf, paired
//!   with that leaf's outcome text
//! - `ancestor_chain`: the predicates that must already hold above a node,
//!   without the grouping root
//!
//! Both are pure reads over an immutable [`CategoryTree`]. The tree is acyclic
//! by construction (see [`crate::domain::TreeBuilder`]), so the recursion is
//! bounded by its depth.

use std::collections::BTreeMap;

use generational_arena::Index;
use serde::Serialize;
use tracing::debug;

use crate::domain::arena::CategoryTree;
use crate::domain::entities::{Category, RuleSet};
use crate::domain::error::{DomainError, DomainResult};

/// Join between predicates of a composed path.
pub const CONJUNCTION: &str = " & ";

/// Resolves an outcome code to the outcome's textual representation.
pub trait OutcomeLookup {
    fn outcome_text(&self, code: &str) -> Option<String>;
}

impl OutcomeLookup for BTreeMap<String, RuleSet> {
    fn outcome_text(&self, code: &str) -> Option<String> {
        self.get(code).map(|rule_set| rule_set.to_string())
    }
}

impl<O: OutcomeLookup + ?Sized> OutcomeLookup for &O {
    fn outcome_text(&self, code: &str) -> Option<String> {
        (**self).outcome_text(code)
    }
}

/// A composed predicate chain ending at an outcome leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedPath {
    pub predicate: String,
    pub outcome: String,
}

impl CombinedPath {
    pub fn new(predicate: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            outcome: outcome.into(),
        }
    }
}

/// Predicate text of a single category.
pub fn render(category: &Category) -> String {
    category.predicate()
}

/// Diagnostic label of a category's datatype.
pub fn datatype_label(category: &Category) -> &'static str {
    category.datatype.label()
}

pub struct Combinator<'a, O: ?Sized> {
    tree: &'a CategoryTree,
    outcomes: &'a O,
}

impl<'a, O: OutcomeLookup + ?Sized> Combinator<'a, O> {
    pub fn new(tree: &'a CategoryTree, outcomes: &'a O) -> Self {
        Self { tree, outcomes }
    }

    /// Predicate text of the node at `idx`; empty for an unknown index.
    pub fn render(&self, idx: Index) -> String {
        match self.tree.category(idx) {
            Some(category) => render(category),
            None => {
                debug!("render: index {:?} not in tree", idx);
                String::new()
            }
        }
    }

    /// Every predicate chain below `idx` that ends at an outcome leaf.
    ///
    /// Child-derived paths come first (children in priority order), followed
    /// by the node's own `(predicate, outcome)` pair when it carries a code.
    /// A node with neither a code nor coded descendants yields nothing.
    pub fn combined_paths(&self, idx: Index) -> DomainResult<Vec<CombinedPath>> {
        let Some(category) = self.tree.category(idx) else {
            debug!("combined_paths: index {:?} not in tree", idx);
            return Ok(Vec::new());
        };
        let own = render(category);
        let mut combination = Vec::new();

        for &child in self.tree.children(idx) {
            for path in self.combined_paths(child)? {
                combination.push(CombinedPath {
                    predicate: format!("{}{}{}", own, CONJUNCTION, path.predicate),
                    outcome: path.outcome,
                });
            }
        }

        if let Some(code) = category.outcome_code() {
            let outcome = self
                .outcomes
                .outcome_text(code)
                .ok_or_else(|| DomainError::MissingOutcome(code.to_string()))?;
            combination.push(CombinedPath::new(own, outcome));
        }

        Ok(combination)
    }

    /// Conjunction of the predicates above `idx`, top down, excluding the
    /// grouping root and the node itself.
    pub fn ancestor_chain(&self, idx: Index) -> String {
        let Some(parent) = self.tree.parent(idx) else {
            return String::new();
        };
        // Grouping roots contribute no text
        if self.tree.parent(parent).is_none() {
            return String::new();
        }
        let above = self.ancestor_chain(parent);
        if above.is_empty() {
            self.render(parent)
        } else {
            format!("{}{}{}", above, CONJUNCTION, self.render(parent))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::TreeBuilder;
    use crate::domain::entities::Id;
    use crate::domain::operation::{Datatype, Operation};
    use chrono::Utc;
    use std::collections::HashMap;

    fn cat(
        id: Id,
        parent_id: Option<Id>,
        name: &str,
        operation: Operation,
        value: &str,
        code: Option<&str>,
    ) -> Category {
        let now = Utc::now();
        Category {
            id,
            company_id: 1,
            parent_id,
            priority: 0,
            tab_name: name.to_string(),
            operation,
            datatype: Datatype::String,
            tab_value: Some(value.to_string()),
            code: code.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    struct Outcomes(HashMap<&'static str, &'static str>);

    impl OutcomeLookup for Outcomes {
        fn outcome_text(&self, code: &str) -> Option<String> {
            self.0.get(code).map(|s| s.to_string())
        }
    }

    #[test]
    fn given_leaf_with_code_when_combining_then_yields_single_pair() {
        let tree = TreeBuilder::new()
            .build(vec![cat(1, None, "age", Operation::GreaterThan, "18", Some("A"))])
            .unwrap();
        let outcomes = Outcomes(HashMap::from([("A", "adult")]));
        let combinator = Combinator::new(&tree, &outcomes);

        let paths = combinator.combined_paths(tree.find(1).unwrap()).unwrap();

        assert_eq!(paths, vec![CombinedPath::new("age > 18", "adult")]);
    }

    #[test]
    fn given_code_without_rule_set_when_combining_then_reports_missing_outcome() {
        let tree = TreeBuilder::new()
            .build(vec![cat(1, None, "age", Operation::GreaterThan, "18", Some("X"))])
            .unwrap();
        let outcomes = Outcomes(HashMap::new());
        let combinator = Combinator::new(&tree, &outcomes);

        let err = combinator.combined_paths(tree.find(1).unwrap()).unwrap_err();

        assert!(matches!(err, DomainError::MissingOutcome(code) if code == "X"));
    }

    #[test]
    fn given_blank_code_when_combining_then_node_is_not_an_outcome_leaf() {
        let tree = TreeBuilder::new()
            .build(vec![cat(1, None, "age", Operation::EqualTo, "1", Some("  "))])
            .unwrap();
        let outcomes = Outcomes(HashMap::new());
        let combinator = Combinator::new(&tree, &outcomes);

        assert!(combinator.combined_paths(tree.find(1).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn given_unknown_operation_when_rendering_then_uses_sentinel() {
        let c = cat(1, None, "age", Operation::Unknown(11), "18", None);
        assert_eq!(render(&c), "age Unknown operation 18");
    }

    #[test]
    fn given_nil_value_when_rendering_then_keeps_trailing_separator() {
        let mut c = cat(1, None, "deleted_at", Operation::EqualTo, "", None);
        c.tab_value = None;
        c.datatype = Datatype::Nil;
        assert_eq!(render(&c), "deleted_at = ");
        assert_eq!(datatype_label(&c), "NIL");
    }

    #[test]
    fn given_index_outside_tree_when_rendering_then_empty() {
        let tree = TreeBuilder::new()
            .build(vec![cat(1, None, "age", Operation::EqualTo, "1", None)])
            .unwrap();
        let outcomes = Outcomes(HashMap::new());
        let combinator = Combinator::new(&tree, &outcomes);
        let foreign = Index::from_raw_parts(99, 0);

        assert_eq!(combinator.render(foreign), "");
        assert!(combinator.combined_paths(foreign).unwrap().is_empty());
        assert_eq!(combinator.ancestor_chain(foreign), "");
    }
}
