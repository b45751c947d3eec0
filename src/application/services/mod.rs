//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, RowSource)
//! but are themselves concrete structs, not traits.

mod build;
mod pipeline;
mod report;
mod table;

use std::path::Path;

use crate::application::{ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

pub use build::{BuildOutcome, BuildService};
pub use pipeline::{PipelineService, PipelineSummary};
pub use report::ReportService;
pub use table::TableService;

/// Write `content` to `path`, creating parent directories first.
fn write_output(fs: &dyn FileSystem, path: &Path, content: &str) -> ApplicationResult<()> {
    fs.ensure_parent(path)
        .with_path_context("create output directory for", path)?;
    fs.write(path, content).with_path_context("write", path)
}
