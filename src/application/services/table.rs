//! Flat table service
//!
//! Loads tree documents and writes their flattened tables.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::export::{parse_tree, table_to_csv, table_to_json};
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{FlatTable, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// Service for flattening trees into one-row-per-leaf tables.
pub struct TableService {
    fs: Arc<dyn FileSystem>,
    min_levels: usize,
}

impl TableService {
    pub fn new(fs: Arc<dyn FileSystem>, min_levels: usize) -> Self {
        Self { fs, min_levels }
    }

    /// Read a tree document (root object or array of top-level nodes).
    #[instrument(level = "debug", skip(self))]
    pub fn load_tree(&self, path: &Path) -> ApplicationResult<TreeNode> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree", path)?;
        let tree = parse_tree(&content)?;
        debug!(nodes = tree.node_count(), "tree loaded");
        Ok(tree)
    }

    /// Flatten with the configured minimum number of level columns.
    pub fn flatten(&self, tree: &TreeNode) -> FlatTable {
        self.flatten_with(tree, self.min_levels)
    }

    pub fn flatten_with(&self, tree: &TreeNode, min_levels: usize) -> FlatTable {
        let table = FlatTable::from_tree(tree, min_levels);
        info!(
            records = table.len(),
            width = table.width,
            "tree flattened"
        );
        table
    }

    pub fn write_csv(&self, table: &FlatTable, path: &Path) -> ApplicationResult<()> {
        let csv = table_to_csv(table)?;
        super::write_output(self.fs.as_ref(), path, &csv)?;
        info!("table CSV written: {}", path.display());
        Ok(())
    }

    pub fn write_json(&self, table: &FlatTable, path: &Path) -> ApplicationResult<()> {
        let json = table_to_json(table)?;
        super::write_output(self.fs.as_ref(), path, &json)?;
        info!("table JSON written: {}", path.display());
        Ok(())
    }
}
