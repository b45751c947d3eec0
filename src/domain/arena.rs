use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::entities::TreeNode;

/// Data payload for nodes under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub title: String,
    pub amount: Option<f64>,
    pub description: Option<String>,
}

impl NodeData {
    pub fn new(title: impl Into<String>, amount: Option<f64>) -> Self {
        Self {
            title: title.into(),
            amount,
            description: None,
        }
    }

    /// Extend the description, joining consecutive parts with one space.
    pub fn append_description(&mut self, text: &str) {
        match &mut self.description {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(text);
            }
            None => self.description = Some(text.to_string()),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Node in the arena-based hierarchy.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for top-level nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// Arena-backed forest used while rows are being consumed.
///
/// Open nodes are referenced by index so descriptions and children can be
/// attached to any of them without juggling borrows. Once the sheet is
/// consumed, [`TreeArena::into_forest`] moves the nodes out as owned trees.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
    /// Top-level nodes in insertion order
    roots: Vec<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = ArenaNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        match parent.and_then(|idx| self.arena.get_mut(idx)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ArenaNode> {
        self.arena.get_mut(idx)
    }

    /// Move every node out of the arena as owned top-level trees.
    #[instrument(level = "debug", skip(self))]
    pub fn into_forest(mut self) -> Vec<TreeNode> {
        let roots = std::mem::take(&mut self.roots);
        roots
            .into_iter()
            .filter_map(|idx| self.take_subtree(idx))
            .collect()
    }

    fn take_subtree(&mut self, idx: Index) -> Option<TreeNode> {
        let node = self.arena.remove(idx)?;
        let children = node
            .children
            .into_iter()
            .filter_map(|child| self.take_subtree(child))
            .collect();
        Some(TreeNode {
            title: node.data.title,
            amount: node.data.amount,
            description: node.data.description,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_inserts_when_collecting_forest_then_preserves_order() {
        let mut arena = TreeArena::new();
        let a = arena.insert_node(NodeData::new("A", None), None);
        arena.insert_node(NodeData::new("A1", Some(1.0)), Some(a));
        arena.insert_node(NodeData::new("A2", Some(2.0)), Some(a));
        arena.insert_node(NodeData::new("B", None), None);

        let forest = arena.into_forest();

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].title, "A");
        let titles: Vec<_> = forest[0].children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A1", "A2"]);
        assert!(forest[1].is_leaf());
    }

    #[test]
    fn given_consecutive_parts_when_appending_description_then_joins_with_space() {
        let mut data = NodeData::new("B", None);
        data.append_description("Part one.");
        data.append_description("Part two.");
        assert_eq!(data.description.as_deref(), Some("Part one. Part two."));
    }
}
