//! Tests for the table flattener

mod common;

use rstest::rstest;

use budget_tree::application::export::{parse_tree, tree_to_json};
use budget_tree::domain::{flatten, FlatTable, TreeNode, DEFAULT_MIN_LEVELS};

use common::sample_tree;

#[test]
fn given_sample_tree_when_flattening_then_emits_one_record_per_leaf_in_order() {
    // Arrange
    let root = sample_tree();

    // Act
    let records = flatten(&root);

    // Assert
    let summary: Vec<(Vec<String>, &str, Option<f64>, usize)> = records
        .iter()
        .map(|r| (r.ancestors.clone(), r.value.as_str(), r.amount, r.depth()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (vec!["A".to_string(), "B".to_string()], "C", Some(100.0), 3),
            (vec!["A".to_string(), "B".to_string()], "D", Some(200.0), 3),
            (vec!["A".to_string()], "E", Some(50.0), 2),
        ]
    );
}

#[test]
fn given_any_tree_when_flattening_then_record_count_equals_leaf_count() {
    // Arrange
    let root = TreeNode::synthetic_root(vec![
        TreeNode::new("Lone"),
        TreeNode::new("Wide").with_children((0..5).map(|i| TreeNode::new(format!("w{i}"))).collect()),
        TreeNode::new("Deep").with_children(vec![TreeNode::new("d1")
            .with_children(vec![TreeNode::new("d2").with_children(vec![TreeNode::new("d3")])])]),
    ]);

    // Act
    let records = flatten(&root);

    // Assert
    assert_eq!(records.len(), root.leaf_count());
    assert_eq!(records.len(), 7);
    for record in &records {
        assert_eq!(record.depth(), record.ancestors.len() + 1);
    }
}

#[test]
fn given_interior_node_amounts_when_flattening_then_only_leaf_amounts_appear() {
    // Arrange
    let root = TreeNode::synthetic_root(vec![TreeNode::new("Total")
        .with_amount(999.0)
        .with_description("subtotal")
        .with_children(vec![TreeNode::new("Item").with_amount(1.0)])]);

    // Act
    let records = flatten(&root);

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, Some(1.0));
    assert!(records[0].description.is_none());
    assert_eq!(records[0].ancestors, vec!["Total".to_string()]);
}

#[test]
fn given_parent_with_single_leaf_when_flattening_then_parent_appears_only_as_ancestor() {
    // Arrange
    let root = TreeNode::synthetic_root(vec![
        TreeNode::new("Parent").with_children(vec![TreeNode::new("Child").with_amount(7.0)])
    ]);

    // Act
    let records = flatten(&root);

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value, "Child");
    assert_eq!(records[0].full_path(), "Parent > Child");
}

#[test]
fn given_childless_root_when_flattening_then_emits_root_itself() {
    // Arrange
    let root = TreeNode::new("Solo").with_amount(12.0);

    // Act
    let records = flatten(&root);

    // Assert
    assert_eq!(records.len(), 1);
    assert!(records[0].ancestors.is_empty());
    assert_eq!(records[0].value, "Solo");
    assert_eq!(records[0].depth(), 1);
}

#[test]
fn given_leaf_description_when_flattening_then_copies_it_through() {
    // Arrange
    let root = TreeNode::synthetic_root(vec![TreeNode::new("Item")
        .with_amount(3.5)
        .with_description("Part one. Part two.")]);

    // Act
    let records = flatten(&root);

    // Assert
    assert_eq!(records[0].description.as_deref(), Some("Part one. Part two."));
    assert_eq!(records[0].amount, Some(3.5));
}

#[test]
fn given_serialized_tree_when_reloading_then_flattens_identically() {
    // Arrange
    let root = sample_tree();
    let json = tree_to_json(&root).unwrap();

    // Act
    let reloaded = parse_tree(&json).unwrap();

    // Assert
    assert_eq!(reloaded, root);
    assert_eq!(flatten(&reloaded), flatten(&root));
}

#[rstest]
#[case(0, 2)]
#[case(1, 2)]
#[case(DEFAULT_MIN_LEVELS, DEFAULT_MIN_LEVELS)]
fn given_min_levels_when_building_table_then_width_covers_deepest_chain(
    #[case] min_levels: usize,
    #[case] expected: usize,
) {
    // Arrange
    let root = sample_tree();

    // Act
    let table = FlatTable::from_tree(&root, min_levels);

    // Assert
    assert_eq!(table.width, expected);
    assert_eq!(table.header().len(), expected + 5);
    assert_eq!(table.header()[expected], "value");
}

#[test]
fn given_table_when_summing_then_totals_leaf_amounts() {
    // Arrange
    let root = sample_tree();

    // Act
    let table = FlatTable::from_tree(&root, DEFAULT_MIN_LEVELS);

    // Assert
    assert_eq!(table.total_amount(), 350.0);
    assert_eq!(table.max_depth(), 3);
}
