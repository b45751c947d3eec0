//! Tree and flat-table JSON documents.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{level_column, DomainError, FlatRecord, FlatTable, TreeNode};

/// Accepted tree document shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum TreeDocument {
    Root(TreeNode),
    Forest(Vec<TreeNode>),
}

/// Pretty-printed tree document.
pub fn tree_to_json(root: &TreeNode) -> ApplicationResult<String> {
    serde_json::to_string_pretty(root).map_err(|e| ApplicationError::export("tree JSON", e))
}

/// Parse a tree document: a single root object, or an array of top-level
/// nodes which is wrapped in a synthetic root.
pub fn parse_tree(content: &str) -> ApplicationResult<TreeNode> {
    let document: TreeDocument =
        serde_json::from_str(content).map_err(|e| DomainError::InvalidTree {
            message: e.to_string(),
        })?;
    Ok(match document {
        TreeDocument::Root(root) => root,
        TreeDocument::Forest(nodes) => TreeNode::synthetic_root(nodes),
    })
}

/// One flat record rendered with a fixed number of level columns.
struct TableRow<'a> {
    record: &'a FlatRecord,
    width: usize,
}

impl Serialize for TableRow<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for level in 0..self.width {
            map.serialize_entry(&level_column(level), self.record.level(level).unwrap_or(""))?;
        }
        map.serialize_entry("value", &self.record.value)?;
        if let Some(description) = &self.record.description {
            map.serialize_entry("description", description)?;
        }
        if let Some(amount) = self.record.amount {
            map.serialize_entry("amount", &amount)?;
        }
        map.serialize_entry("depth", &self.record.depth())?;
        map.serialize_entry("full_path", &self.record.full_path())?;
        map.end()
    }
}

/// Pretty-printed array of flat records, keys in column order.
pub fn table_to_json(table: &FlatTable) -> ApplicationResult<String> {
    let rows: Vec<TableRow<'_>> = table
        .records
        .iter()
        .map(|record| TableRow {
            record,
            width: table.width,
        })
        .collect();
    serde_json::to_string_pretty(&rows).map_err(|e| ApplicationError::export("table JSON", e))
}
