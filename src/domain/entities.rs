//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

/// Title given to the root that is synthesized to host several top-level nodes.
pub const SYNTHETIC_ROOT_TITLE: &str = ".";

/// A node of the budget hierarchy.
///
/// Serialized as `{ "value", "amount"?, "description"?, "children" }`, the shape
/// consumed by the tree viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Display text of the line item
    #[serde(rename = "value")]
    pub title: String,
    /// Allocation amount, present only on rows that carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Free text collected from the description rows following this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Child nodes in source row order
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            amount: None,
            description: None,
            children: Vec::new(),
        }
    }

    /// Root titled `"."` hosting the given top-level nodes.
    pub fn synthetic_root(children: Vec<TreeNode>) -> Self {
        Self {
            children,
            ..Self::new(SYNTHETIC_ROOT_TITLE)
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_synthetic_root(&self) -> bool {
        self.title == SYNTHETIC_ROOT_TITLE && self.amount.is_none()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }

    /// Levels in this subtree; a lone node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// One row of the flattened table: a leaf with its full ancestor chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    /// Ancestor titles from the root (exclusive) down to the parent (inclusive)
    pub ancestors: Vec<String>,
    /// The leaf's own title
    pub value: String,
    pub description: Option<String>,
    pub amount: Option<f64>,
}

impl FlatRecord {
    /// 1-based level of the leaf: root's direct children have depth 1.
    pub fn depth(&self) -> usize {
        self.ancestors.len() + 1
    }

    /// Ancestor at `level`, `None` beyond the record's own depth.
    pub fn level(&self, level: usize) -> Option<&str> {
        self.ancestors.get(level).map(String::as_str)
    }

    /// Ancestors and value joined by `" > "`.
    pub fn full_path(&self) -> String {
        self.ancestors
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.value.as_str()))
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

/// Font flags of a spreadsheet cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellFormat {
    pub bold: bool,
    pub underline: bool,
    pub italic: bool,
}

impl CellFormat {
    pub const PLAIN: CellFormat = CellFormat {
        bold: false,
        underline: false,
        italic: false,
    };

    pub const ITALIC: CellFormat = CellFormat {
        bold: false,
        underline: false,
        italic: true,
    };

    pub const SECTION_TITLE: CellFormat = CellFormat {
        bold: true,
        underline: true,
        italic: false,
    };

    /// Bold and underlined: the look of a section title row.
    pub fn is_section_title(&self) -> bool {
        self.bold && self.underline
    }
}

/// A spreadsheet cell; empty text is the "empty" sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text: String,
    pub format: CellFormat,
}

impl Cell {
    pub fn new(text: impl Into<String>, format: CellFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, CellFormat::PLAIN)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// One spreadsheet row as a fixed-width sequence of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    /// 1-based row number in the source sheet
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl SheetRow {
    pub fn new(number: usize, cells: Vec<Cell>) -> Self {
        Self { number, cells }
    }

    /// Row with a single cell at `column`, all earlier cells empty.
    pub fn with_cell_at(number: usize, column: usize, cell: Cell) -> Self {
        let mut row = Self::new(number, vec![Cell::empty(); column]);
        row.cells.push(cell);
        row
    }

    /// Place `cell` at `column`, padding with empty cells as needed.
    pub fn set(&mut self, column: usize, cell: Cell) {
        if self.cells.len() <= column {
            self.cells.resize(column + 1, Cell::empty());
        }
        self.cells[column] = cell;
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Trimmed text at `column`, empty when the cell is missing.
    pub fn text(&self, column: usize) -> &str {
        self.cell(column).map(|c| c.text.trim()).unwrap_or("")
    }

    /// Index of the first non-empty cell at or after `start`.
    pub fn first_non_empty(&self, start: usize) -> Option<usize> {
        self.cells
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, cell)| !cell.is_empty())
            .map(|(idx, _)| idx)
    }

    /// Pad with empty sentinels up to `width` cells.
    pub fn pad_to(&mut self, width: usize) {
        if self.cells.len() < width {
            self.cells.resize(width, Cell::empty());
        }
    }
}
