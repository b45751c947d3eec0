//! Output renderings of trees and flat tables
//!
//! Writers produce strings; services own the file I/O.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod preview;

pub use self::csv::{rows_to_csv, table_to_csv};
pub use self::json::{parse_tree, table_to_json, tree_to_json};
pub use self::markdown::{outline, sample_report, MarkdownOptions};
pub use self::preview::{PreviewOptions, TreeNodeConvert};
