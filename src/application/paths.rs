//! Output file names derived from the source workbook.

use std::path::{Path, PathBuf};

/// Every artifact written by a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub tree_json: PathBuf,
    pub table_csv: PathBuf,
    pub table_json: PathBuf,
    pub sample_markdown: PathBuf,
}

impl OutputPaths {
    /// Paths named after the workbook stem, placed in `out_dir` or next to the workbook.
    pub fn for_workbook(workbook: &Path, out_dir: Option<&Path>) -> Self {
        let stem = workbook
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook".to_string());
        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| workbook.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        Self {
            tree_json: dir.join(format!("{stem}_hierarchy.json")),
            table_csv: dir.join(format!("{stem}_hierarchy_table.csv")),
            table_json: dir.join(format!("{stem}_hierarchy_table.json")),
            sample_markdown: dir.join(format!("{stem}_hierarchy_table_sample.md")),
        }
    }

    /// `<tree stem>.md` next to a tree JSON file.
    pub fn outline_for(tree_json: &Path) -> PathBuf {
        tree_json.with_extension("md")
    }

    /// `<tree stem>_table.csv` next to a tree JSON file.
    pub fn table_csv_for(tree_json: &Path) -> PathBuf {
        sibling(tree_json, "_table.csv")
    }

    /// `<tree stem>_table_sample.md` next to a tree JSON file.
    pub fn sample_for(tree_json: &Path) -> PathBuf {
        sibling(tree_json, "_table_sample.md")
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}"))
}
