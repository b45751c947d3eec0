//! Hierarchy builder: infers the budget tree from spreadsheet rows.

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use crate::domain::arena::{NodeData, TreeArena};
use crate::domain::entities::{SheetRow, TreeNode};
use crate::domain::error::DomainError;
use crate::domain::row::{classify, Layout, RowKind};

/// How top-level nodes are hosted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RootMode {
    /// Always wrap top-level nodes in a synthetic `"."` root
    #[default]
    Synthetic,
    /// A single top-level node becomes the root; several are wrapped
    Auto,
}

impl fmt::Display for RootMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootMode::Synthetic => write!(f, "synthetic"),
            RootMode::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for RootMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthetic" => Ok(RootMode::Synthetic),
            "auto" => Ok(RootMode::Auto),
            other => Err(DomainError::UnknownRootMode(other.to_string())),
        }
    }
}

/// Counters describing one build, for sanity checks against the input size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub rows_seen: usize,
    pub blank_rows: usize,
    pub untitled_rows: usize,
    pub nodes_created: usize,
    pub top_level_nodes: usize,
    pub descriptions_attached: usize,
    pub orphan_descriptions: usize,
}

/// Entry on the open-ancestor stack.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    level: usize,
    index: Index,
}

/// Mutable state threaded through the row loop.
#[derive(Debug, Default)]
struct BuildState {
    arena: TreeArena,
    stack: Vec<OpenNode>,
    /// Most recently created node; target of description rows
    latest: Option<Index>,
    report: BuildReport,
}

impl BuildState {
    fn open(&mut self, level: usize, data: NodeData) {
        // Close every open node at the same or a deeper level; they are
        // already attached to their own parents.
        while self.stack.last().is_some_and(|top| top.level >= level) {
            self.stack.pop();
        }

        let parent = self.stack.last().map(|top| top.index);
        let index = self.arena.insert_node(data, parent);
        if parent.is_none() {
            self.report.top_level_nodes += 1;
        }

        self.stack.push(OpenNode { level, index });
        self.latest = Some(index);
        self.report.nodes_created += 1;
    }

    fn describe_latest(&mut self, row: usize, text: &str) {
        match self.latest.and_then(|idx| self.arena.get_node_mut(idx)) {
            Some(node) => {
                node.data.append_description(text);
                self.report.descriptions_attached += 1;
            }
            None => {
                warn!(row, "dropping description without a preceding node");
                self.report.orphan_descriptions += 1;
            }
        }
    }
}

/// Builds a single rooted tree from spreadsheet rows.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    layout: Layout,
    root_mode: RootMode,
}

impl HierarchyBuilder {
    pub fn new(layout: Layout, root_mode: RootMode) -> Self {
        Self { layout, root_mode }
    }

    /// Build the tree; malformed rows are skipped, never reported as errors.
    pub fn build<I>(&self, rows: I) -> TreeNode
    where
        I: IntoIterator<Item = SheetRow>,
    {
        self.build_with_report(rows).0
    }

    #[instrument(level = "debug", skip(self, rows), fields(root_mode = %self.root_mode))]
    pub fn build_with_report<I>(&self, rows: I) -> (TreeNode, BuildReport)
    where
        I: IntoIterator<Item = SheetRow>,
    {
        let mut state = BuildState::default();

        for row in rows {
            state.report.rows_seen += 1;
            match classify(&row, &self.layout) {
                RowKind::Blank => state.report.blank_rows += 1,
                RowKind::Untitled => {
                    trace!(row = row.number, "row has no title after bullet");
                    state.report.untitled_rows += 1;
                }
                RowKind::Description { text } => state.describe_latest(row.number, text),
                RowKind::Entry {
                    level,
                    title,
                    amount,
                    format,
                } => {
                    trace!(
                        row = row.number,
                        level,
                        section = format.is_section_title(),
                        "{}",
                        title
                    );
                    state.open(level, NodeData::new(title, amount));
                }
            }
        }

        let report = state.report;
        debug!(?report, "rows consumed");

        let root = self.assemble(state.arena.into_forest());
        (root, report)
    }

    fn assemble(&self, mut forest: Vec<TreeNode>) -> TreeNode {
        match self.root_mode {
            RootMode::Auto if forest.len() == 1 => forest.remove(0),
            _ => TreeNode::synthetic_root(forest),
        }
    }
}
