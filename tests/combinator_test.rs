//! Tests for predicate composition over category trees

use std::collections::BTreeMap;

use chrono::Utc;
use rstest::rstest;

use ruletree::domain::{
    render, Category, CategoryTree, CombinedPath, Combinator, Datatype, Id, Operation, RuleSet,
    TreeBuilder,
};

fn category(
    id: Id,
    parent_id: Option<Id>,
    priority: i32,
    tab_name: &str,
    operation: Operation,
    tab_value: &str,
    code: Option<&str>,
) -> Category {
    let now = Utc::now();
    Category {
        id,
        company_id: 1,
        parent_id,
        priority,
        tab_name: tab_name.to_string(),
        operation,
        datatype: Datatype::String,
        tab_value: Some(tab_value.to_string()),
        code: code.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

fn rule_sets(pairs: &[(&str, &str)]) -> BTreeMap<String, RuleSet> {
    let now = Utc::now();
    pairs
        .iter()
        .map(|(code, outcome)| {
            (
                code.to_string(),
                RuleSet {
                    code: code.to_string(),
                    outcome: outcome.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            )
        })
        .collect()
}

/// Grouping root R, child A (age > 18, code A), grandchild B (status = active, code B).
fn worked_example() -> CategoryTree {
    TreeBuilder::new()
        .build(vec![
            category(1, None, 0, "segment", Operation::EqualTo, "retail", None),
            category(2, Some(1), 0, "age", Operation::GreaterThan, "18", Some("A")),
            category(3, Some(2), 0, "status", Operation::EqualTo, "active", Some("B")),
        ])
        .unwrap()
}

#[test]
fn given_worked_example_when_combining_from_child_then_descendants_precede_own_pair() {
    // Arrange
    let tree = worked_example();
    let outcomes = rule_sets(&[("A", "adult"), ("B", "active adult")]);
    let combinator = Combinator::new(&tree, &outcomes);

    // Act
    let paths = combinator.combined_paths(tree.find(2).unwrap()).unwrap();

    // Assert
    assert_eq!(
        paths,
        vec![
            CombinedPath::new("age > 18 & status = active", "active adult"),
            CombinedPath::new("age > 18", "adult"),
        ]
    );
}

#[test]
fn given_worked_example_when_combining_from_root_then_root_prefixes_every_path() {
    // Arrange
    let tree = worked_example();
    let outcomes = rule_sets(&[("A", "adult"), ("B", "active adult")]);
    let combinator = Combinator::new(&tree, &outcomes);

    // Act
    let paths = combinator.combined_paths(tree.find(1).unwrap()).unwrap();

    // Assert
    assert_eq!(
        paths,
        vec![
            CombinedPath::new(
                "segment = retail & age > 18 & status = active",
                "active adult"
            ),
            CombinedPath::new("segment = retail & age > 18", "adult"),
        ]
    );
}

#[test]
fn given_worked_example_when_chaining_ancestors_then_grouping_root_is_skipped() {
    // Arrange
    let tree = worked_example();
    let outcomes = rule_sets(&[]);
    let combinator = Combinator::new(&tree, &outcomes);

    // Act
    let root = combinator.ancestor_chain(tree.find(1).unwrap());
    let child = combinator.ancestor_chain(tree.find(2).unwrap());
    let grandchild = combinator.ancestor_chain(tree.find(3).unwrap());

    // Assert
    assert_eq!(root, "");
    assert_eq!(child, "");
    assert_eq!(grandchild, "age > 18");
}

#[test]
fn given_deep_chain_when_chaining_ancestors_then_joins_top_down() {
    // Arrange
    let tree = TreeBuilder::new()
        .build(vec![
            category(1, None, 0, "segment", Operation::EqualTo, "retail", None),
            category(2, Some(1), 0, "age", Operation::GreaterThan, "18", None),
            category(3, Some(2), 0, "status", Operation::EqualTo, "active", None),
            category(4, Some(3), 0, "score", Operation::GreaterThanOrEqual, "700", None),
        ])
        .unwrap();
    let outcomes = rule_sets(&[]);
    let combinator = Combinator::new(&tree, &outcomes);

    // Act
    let chain = combinator.ancestor_chain(tree.find(4).unwrap());

    // Assert
    assert_eq!(chain, "age > 18 & status = active");
}

#[test]
fn given_childless_root_without_code_when_combining_then_empty() {
    let tree = TreeBuilder::new()
        .build(vec![category(1, None, 0, "segment", Operation::EqualTo, "retail", None)])
        .unwrap();
    let outcomes = rule_sets(&[]);
    let combinator = Combinator::new(&tree, &outcomes);

    let idx = tree.find(1).unwrap();

    assert!(combinator.combined_paths(idx).unwrap().is_empty());
    assert_eq!(combinator.ancestor_chain(idx), "");
}

#[test]
fn given_siblings_when_priorities_swap_then_order_changes_but_membership_does_not() {
    // Arrange
    let build = |first: i32, second: i32| {
        TreeBuilder::new()
            .build(vec![
                category(1, None, 0, "segment", Operation::EqualTo, "retail", None),
                category(2, Some(1), first, "age", Operation::LessThan, "30", Some("Y")),
                category(3, Some(1), second, "age", Operation::GreaterThanOrEqual, "30", Some("O")),
            ])
            .unwrap()
    };
    let outcomes = rule_sets(&[("Y", "young"), ("O", "old")]);
    let forward = build(1, 2);
    let backward = build(2, 1);

    // Act
    let a = Combinator::new(&forward, &outcomes)
        .combined_paths(forward.find(1).unwrap())
        .unwrap();
    let b = Combinator::new(&backward, &outcomes)
        .combined_paths(backward.find(1).unwrap())
        .unwrap();

    // Assert
    assert_eq!(a[0].outcome, "young");
    assert_eq!(b[0].outcome, "old");
    let mut a_sorted = a.clone();
    let mut b_sorted = b.clone();
    a_sorted.sort_by(|x, y| x.predicate.cmp(&y.predicate));
    b_sorted.sort_by(|x, y| x.predicate.cmp(&y.predicate));
    assert_eq!(a_sorted, b_sorted);
}

#[test]
fn given_unchanged_tree_when_combining_twice_then_identical() {
    let tree = worked_example();
    let outcomes = rule_sets(&[("A", "adult"), ("B", "active adult")]);
    let combinator = Combinator::new(&tree, &outcomes);
    let idx = tree.find(1).unwrap();

    assert_eq!(
        combinator.combined_paths(idx).unwrap(),
        combinator.combined_paths(idx).unwrap()
    );
    let leaf = tree.find(3).unwrap();
    assert_eq!(combinator.ancestor_chain(leaf), combinator.ancestor_chain(leaf));
}

#[rstest]
#[case(Operation::EqualTo, "x = v")]
#[case(Operation::LessThan, "x < v")]
#[case(Operation::LessThanOrEqual, "x <= v")]
#[case(Operation::GreaterThan, "x > v")]
#[case(Operation::GreaterThanOrEqual, "x >= v")]
#[case(Operation::NotEqual, "x <> v")]
#[case(Operation::Unknown(42), "x Unknown operation v")]
fn given_operation_when_rendering_then_uses_fixed_symbol(
    #[case] operation: Operation,
    #[case] expected: &str,
) {
    let c = category(1, None, 0, "x", operation, "v", None);
    assert_eq!(render(&c), expected);
}
