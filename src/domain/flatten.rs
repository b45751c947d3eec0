//! Table flattener: one record per leaf, carrying its full ancestor path.

use tracing::instrument;

use crate::domain::entities::{FlatRecord, TreeNode};

/// Minimum number of `level_i` columns in a flat table.
pub const DEFAULT_MIN_LEVELS: usize = 9;

/// Depth-first, pre-order walk emitting a [`FlatRecord`] at each leaf.
///
/// The root's own title never appears among the ancestors. A childless root
/// is itself a leaf and yields exactly one record.
#[instrument(level = "debug", skip(root), fields(root = %root.title))]
pub fn flatten(root: &TreeNode) -> Vec<FlatRecord> {
    let mut flattener = TableFlattener::default();
    if root.is_leaf() {
        flattener.emit(root);
    } else {
        for child in &root.children {
            flattener.visit(child);
        }
    }
    flattener.records
}

#[derive(Debug, Default)]
struct TableFlattener {
    /// Titles of the interior nodes currently being descended
    path: Vec<String>,
    records: Vec<FlatRecord>,
}

impl TableFlattener {
    fn visit(&mut self, node: &TreeNode) {
        if node.is_leaf() {
            self.emit(node);
            return;
        }
        self.path.push(node.title.clone());
        for child in &node.children {
            self.visit(child);
        }
        self.path.pop();
    }

    fn emit(&mut self, leaf: &TreeNode) {
        self.records.push(FlatRecord {
            ancestors: self.path.clone(),
            value: leaf.title.clone(),
            description: leaf.description.clone(),
            amount: leaf.amount,
        });
    }
}

/// Flattened records plus the number of `level_i` columns to render.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTable {
    pub records: Vec<FlatRecord>,
    pub width: usize,
}

impl FlatTable {
    pub fn from_tree(root: &TreeNode, min_levels: usize) -> Self {
        Self::from_records(flatten(root), min_levels)
    }

    pub fn from_records(records: Vec<FlatRecord>, min_levels: usize) -> Self {
        let width = table_width(&records, min_levels);
        Self { records, width }
    }

    /// Column names in output order.
    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = (0..self.width).map(level_column).collect();
        header.extend(
            ["value", "description", "amount", "depth", "full_path"]
                .iter()
                .map(|s| s.to_string()),
        );
        header
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.records.iter().map(FlatRecord::depth).max().unwrap_or(0)
    }

    /// Sum of the amounts of all records.
    pub fn total_amount(&self) -> f64 {
        self.records.iter().filter_map(|r| r.amount).sum()
    }
}

/// `level_0`, `level_1`, ...
pub fn level_column(level: usize) -> String {
    format!("level_{level}")
}

/// Number of level columns: at least `min_levels`, widened to the deepest ancestor chain.
pub fn table_width(records: &[FlatRecord], min_levels: usize) -> usize {
    records
        .iter()
        .map(|r| r.ancestors.len())
        .max()
        .unwrap_or(0)
        .max(min_levels)
}
