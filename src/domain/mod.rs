//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod amount;
pub mod analysis;
pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod flatten;
pub mod row;

pub use amount::{format_count, format_currency, format_grouped, parse_amount};
pub use analysis::{
    check_subtotals, LevelCounts, LevelSummary, SectionSummary, SubtotalDiscrepancy, TreeStats,
};
pub use arena::{NodeData, TreeArena};
pub use builder::{BuildReport, HierarchyBuilder, RootMode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use flatten::{flatten, level_column, table_width, FlatTable, DEFAULT_MIN_LEVELS};
pub use row::{classify, column_index, is_bullet, Layout, RowKind};
