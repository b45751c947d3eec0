//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::export::{MarkdownOptions, PreviewOptions};
use crate::application::services::{BuildService, PipelineService, ReportService, TableService};
use crate::config::Settings;
use crate::domain::HierarchyBuilder;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub build: BuildService,
    pub table: TableService,
    pub report: ReportService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        let builder = HierarchyBuilder::new(settings.layout(), settings.tree.root_mode);
        let build = BuildService::new(Arc::clone(&fs), builder);
        let table = TableService::new(Arc::clone(&fs), settings.output.min_levels);
        let report = ReportService::new(Arc::clone(&fs), markdown_options(&settings));

        Self {
            settings,
            fs,
            build,
            table,
            report,
        }
    }

    pub fn pipeline(&self) -> PipelineService<'_> {
        PipelineService::new(&self.build, &self.table, &self.report)
    }

    /// Preview limits with the configured currency symbol.
    pub fn preview_options(&self, max_depth: Option<usize>, max_items: usize) -> PreviewOptions {
        PreviewOptions {
            max_depth,
            max_items,
            currency_symbol: self.settings.output.currency_symbol.clone(),
        }
    }
}

fn markdown_options(settings: &Settings) -> MarkdownOptions {
    MarkdownOptions {
        sample_rows: settings.output.sample_rows,
        currency_symbol: settings.output.currency_symbol.clone(),
        ..MarkdownOptions::default()
    }
}
