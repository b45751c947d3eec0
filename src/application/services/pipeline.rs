//! Full pipeline: workbook → tree → flat table → sample report.

use tracing::instrument;

use crate::application::{ApplicationResult, OutputPaths};
use crate::domain::BuildReport;
use crate::infrastructure::traits::RowSource;

use super::{BuildService, ReportService, TableService};

/// What a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub report: BuildReport,
    pub records: usize,
    pub leaves: usize,
    pub total_amount: f64,
    pub paths: OutputPaths,
}

/// Runs every stage in order, writing each artifact as it is produced.
pub struct PipelineService<'a> {
    build: &'a BuildService,
    table: &'a TableService,
    report: &'a ReportService,
}

impl<'a> PipelineService<'a> {
    pub fn new(build: &'a BuildService, table: &'a TableService, report: &'a ReportService) -> Self {
        Self {
            build,
            table,
            report,
        }
    }

    #[instrument(level = "debug", skip_all, fields(source = %source.describe()))]
    pub fn run(&self, source: &dyn RowSource, paths: OutputPaths) -> ApplicationResult<PipelineSummary> {
        let outcome = self.build.build(source)?;
        self.build.write_tree(&outcome.tree, &paths.tree_json)?;

        let table = self.table.flatten(&outcome.tree);
        self.table.write_csv(&table, &paths.table_csv)?;
        self.table.write_json(&table, &paths.table_json)?;
        self.report.write_sample(&table, None, &paths.sample_markdown)?;

        Ok(PipelineSummary {
            report: outcome.report,
            records: table.len(),
            leaves: outcome.tree.leaf_count(),
            total_amount: table.total_amount(),
            paths,
        })
    }
}
