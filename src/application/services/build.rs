//! Tree building service
//!
//! Reads rows from a source, builds the hierarchy and writes the tree document.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::export::tree_to_json;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{BuildReport, HierarchyBuilder, TreeNode};
use crate::infrastructure::traits::{FileSystem, RowSource};

/// Result of building a tree from one source.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub tree: TreeNode,
    pub report: BuildReport,
}

/// Service turning spreadsheet rows into a budget tree.
pub struct BuildService {
    fs: Arc<dyn FileSystem>,
    builder: HierarchyBuilder,
}

impl BuildService {
    pub fn new(fs: Arc<dyn FileSystem>, builder: HierarchyBuilder) -> Self {
        Self { fs, builder }
    }

    /// Read every row of `source` and build the tree.
    #[instrument(level = "debug", skip_all, fields(source = %source.describe()))]
    pub fn build(&self, source: &dyn RowSource) -> ApplicationResult<BuildOutcome> {
        let rows = source
            .read_rows()
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("read rows from {}", source.describe()),
                source: Box::new(e),
            })?;

        let (tree, report) = self.builder.build_with_report(rows);
        if report.orphan_descriptions > 0 {
            warn!(
                count = report.orphan_descriptions,
                "descriptions found before any node were dropped"
            );
        }
        info!(
            nodes = report.nodes_created,
            top_level = report.top_level_nodes,
            "tree built"
        );

        Ok(BuildOutcome { tree, report })
    }

    /// Write the tree document to `path`.
    pub fn write_tree(&self, tree: &TreeNode, path: &Path) -> ApplicationResult<()> {
        let json = tree_to_json(tree)?;
        super::write_output(self.fs.as_ref(), path, &json)?;
        info!("tree written: {}", path.display());
        Ok(())
    }
}
