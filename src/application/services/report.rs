//! Markdown report service

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::application::export::{outline, sample_report, MarkdownOptions};
use crate::application::ApplicationResult;
use crate::domain::{FlatTable, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// Service writing the markdown sample report and outline.
pub struct ReportService {
    fs: Arc<dyn FileSystem>,
    options: MarkdownOptions,
}

impl ReportService {
    pub fn new(fs: Arc<dyn FileSystem>, options: MarkdownOptions) -> Self {
        Self { fs, options }
    }

    pub fn write_sample(
        &self,
        table: &FlatTable,
        sample_rows: Option<usize>,
        path: &Path,
    ) -> ApplicationResult<()> {
        let mut options = self.options.clone();
        if let Some(rows) = sample_rows {
            options.sample_rows = rows;
        }
        let markdown = sample_report(table, &options);
        super::write_output(self.fs.as_ref(), path, &markdown)?;
        info!("sample report written: {}", path.display());
        Ok(())
    }

    pub fn write_outline(&self, tree: &TreeNode, path: &Path) -> ApplicationResult<()> {
        let markdown = outline(tree, &self.options);
        super::write_output(self.fs.as_ref(), path, &markdown)?;
        info!("outline written: {}", path.display());
        Ok(())
    }
}
