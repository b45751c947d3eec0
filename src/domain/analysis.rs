//! Read-only analyses over built trees and flattened tables.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::domain::amount::parse_amount;
use crate::domain::entities::{FlatRecord, TreeNode};

/// Shape summary of a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub nodes_with_children: usize,
    pub nodes_with_amount: usize,
    pub leaves: usize,
    /// Deepest leaf, counted like [`FlatRecord::depth`]: the root is not a level
    pub max_depth: usize,
    /// Sum of leaf amounts; interior amounts are subtotals and excluded
    pub leaf_amount_total: f64,
}

impl TreeStats {
    pub fn collect(root: &TreeNode) -> Self {
        let mut stats = Self {
            max_depth: if root.is_leaf() { 1 } else { root.depth() - 1 },
            ..Self::default()
        };
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            stats.total_nodes += 1;
            if node.amount.is_some() {
                stats.nodes_with_amount += 1;
            }
            if node.is_leaf() {
                stats.leaves += 1;
                stats.leaf_amount_total += node.amount.unwrap_or(0.0);
            } else {
                stats.nodes_with_children += 1;
                stack.extend(node.children.iter());
            }
        }
        stats
    }
}

/// An interior node whose stated amount differs from the sum of its leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtotalDiscrepancy {
    /// Titles from the top-level node down to the node itself
    pub path: Vec<String>,
    pub stated: f64,
    pub computed: f64,
}

impl SubtotalDiscrepancy {
    pub fn difference(&self) -> f64 {
        self.stated - self.computed
    }
}

/// Compare every interior node's own amount with the sum of its leaf descendants.
///
/// Source subtotals are independently authored and may be rounded, so
/// differences up to `tolerance` are accepted. Results are in pre-order.
pub fn check_subtotals(root: &TreeNode, tolerance: f64) -> Vec<SubtotalDiscrepancy> {
    let mut found = Vec::new();
    let mut path = Vec::new();
    if root.is_synthetic_root() {
        for child in &root.children {
            check_node(child, &mut path, tolerance, &mut found);
        }
    } else {
        check_node(root, &mut path, tolerance, &mut found);
    }
    found
}

/// Returns the leaf sum of `node`, recording discrepancies within its subtree.
fn check_node(
    node: &TreeNode,
    path: &mut Vec<String>,
    tolerance: f64,
    found: &mut Vec<SubtotalDiscrepancy>,
) -> f64 {
    if node.is_leaf() {
        return node.amount.unwrap_or(0.0);
    }

    path.push(node.title.clone());
    // reserve the slot so parents are reported before their descendants
    let slot = found.len();
    let computed: f64 = node
        .children
        .iter()
        .map(|child| check_node(child, path, tolerance, found))
        .sum();

    if let Some(stated) = node.amount {
        if (stated - computed).abs() > tolerance {
            found.insert(
                slot,
                SubtotalDiscrepancy {
                    path: path.clone(),
                    stated,
                    computed,
                },
            );
        }
    }
    path.pop();
    computed
}

/// Distinct ancestor values per `level_i` column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSummary {
    /// Sorted distinct values, indexed by level
    pub levels: Vec<BTreeSet<String>>,
    /// Values that occur at more than one level, with those levels
    pub overlaps: BTreeMap<String, Vec<usize>>,
}

impl LevelSummary {
    pub fn from_records(records: &[FlatRecord]) -> Self {
        let mut levels: Vec<BTreeSet<String>> = Vec::new();
        for record in records {
            for (level, value) in record.ancestors.iter().enumerate() {
                if levels.len() <= level {
                    levels.resize_with(level + 1, BTreeSet::new);
                }
                levels[level].insert(value.clone());
            }
        }

        let mut seen: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (level, values) in levels.iter().enumerate() {
            for value in values {
                seen.entry(value.clone()).or_default().push(level);
            }
        }
        let overlaps = seen
            .into_iter()
            .filter(|(_, at)| at.len() > 1)
            .collect();

        Self { levels, overlaps }
    }
}

/// Value frequencies of one `level_i` column inside a section.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCounts {
    pub level: usize,
    /// Most frequent values first, ties by name; at most the requested count
    pub top: Vec<(String, usize)>,
    pub distinct: usize,
}

impl LevelCounts {
    /// More distinct values exist than `top` holds.
    pub fn counts_exceeded(&self) -> bool {
        self.distinct > self.top.len()
    }
}

/// Records sharing one top-level section (`level_0`).
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSummary {
    pub name: String,
    pub records: usize,
    pub total_amount: f64,
    /// Record count per depth
    pub depths: BTreeMap<usize, usize>,
    /// Levels below the section that hold at least one value
    pub levels: Vec<LevelCounts>,
}

impl SectionSummary {
    pub fn average_amount(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.total_amount / self.records as f64
        }
    }

    /// One summary per section, ordered by section name.
    ///
    /// A record without ancestors is a top-level leaf and forms its own
    /// section. Level values that parse as amounts are not counted.
    pub fn from_records(records: &[FlatRecord], top: usize) -> Vec<Self> {
        let mut grouped: BTreeMap<&str, Vec<&FlatRecord>> = BTreeMap::new();
        for record in records {
            let name = record.ancestors.first().unwrap_or(&record.value);
            grouped.entry(name.as_str()).or_default().push(record);
        }

        grouped
            .into_iter()
            .map(|(name, members)| Self::summarize(name, &members, top))
            .collect()
    }

    fn summarize(name: &str, members: &[&FlatRecord], top: usize) -> Self {
        let mut depths: BTreeMap<usize, usize> = BTreeMap::new();
        let mut counters: BTreeMap<usize, BTreeMap<&str, usize>> = BTreeMap::new();
        let mut total_amount = 0.0;

        for record in members {
            *depths.entry(record.depth()).or_default() += 1;
            total_amount += record.amount.unwrap_or(0.0);
            for (level, value) in record.ancestors.iter().enumerate().skip(1) {
                if parse_amount(value).is_some() {
                    continue;
                }
                *counters
                    .entry(level)
                    .or_default()
                    .entry(value.as_str())
                    .or_default() += 1;
            }
        }

        let levels = counters
            .into_iter()
            .map(|(level, counts)| LevelCounts {
                level,
                distinct: counts.len(),
                top: counts
                    .into_iter()
                    .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)))
                    .take(top)
                    .map(|(value, count)| (value.to_string(), count))
                    .collect(),
            })
            .collect();

        Self {
            name: name.to_string(),
            records: members.len(),
            total_amount,
            depths,
            levels,
        }
    }
}
