//! End-to-end tests through the command dispatcher

mod common;

use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use budget_tree::application::export::tree_to_json;
use budget_tree::cli::commands::execute_command;
use budget_tree::cli::{Cli, CliError, CliResult};
use budget_tree::domain::TreeNode;
use budget_tree::exitcode;

use common::{budget_sheet, sample_tree, write_xlsx};

/// Workspace with an empty config so the caller's local config never leaks in.
struct Workspace {
    temp: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("budget-tree.toml");
        std::fs::write(&config, "").unwrap();
        Self { temp, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn write_tree(&self, name: &str, tree: &TreeNode) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, tree_to_json(tree).unwrap()).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> CliResult<()> {
        let config = self.config.to_string_lossy().to_string();
        let mut argv = vec!["budget-tree", "-C", config.as_str()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        execute_command(&cli)
    }
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn given_workbook_when_running_build_then_writes_tree_next_to_it() {
    // Arrange
    let ws = Workspace::new();
    let workbook = ws.path("dpwh.xlsx");
    write_xlsx(&workbook, &[budget_sheet()]);

    // Act
    ws.run(&["build", &arg(&workbook)]).unwrap();

    // Assert
    let tree_json = std::fs::read_to_string(ws.path("dpwh_hierarchy.json")).unwrap();
    let tree: TreeNode = serde_json::from_str(&tree_json).unwrap();
    assert_eq!(tree.title, ".");
    assert_eq!(tree.children[0].title, "Infrastructure");
}

#[test]
fn given_auto_root_flag_when_building_then_single_top_node_is_root() {
    // Arrange
    let ws = Workspace::new();
    let workbook = ws.path("dpwh.xlsx");
    write_xlsx(&workbook, &[budget_sheet()]);
    let output = ws.path("tree.json");

    // Act
    ws.run(&["build", &arg(&workbook), "-o", &arg(&output), "--root", "auto"])
        .unwrap();

    // Assert
    let tree: TreeNode =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(tree.title, "Infrastructure");
}

#[test]
fn given_tree_when_flattening_without_outputs_then_writes_default_csv() {
    // Arrange
    let ws = Workspace::new();
    let tree = ws.write_tree("budget.json", &sample_tree());

    // Act
    ws.run(&["flatten", &arg(&tree), "--levels", "2"]).unwrap();

    // Assert
    let csv = std::fs::read_to_string(ws.path("budget_table.csv")).unwrap();
    assert!(csv.starts_with("level_0,level_1,value,"));
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn given_tree_when_running_report_and_outline_then_writes_markdown() {
    // Arrange
    let ws = Workspace::new();
    let tree = ws.write_tree("budget.json", &sample_tree());

    // Act
    ws.run(&["report", &arg(&tree), "--rows", "1"]).unwrap();
    ws.run(&["outline", &arg(&tree)]).unwrap();

    // Assert
    let sample = std::fs::read_to_string(ws.path("budget_table_sample.md")).unwrap();
    assert!(sample.contains("## Sample Data (First 1 Rows)"));
    let outline = std::fs::read_to_string(ws.path("budget.md")).unwrap();
    assert!(outline.contains("- **A**"));
}

#[test]
fn given_mismatched_subtotal_when_checking_strictly_then_fails_with_status_one() {
    // Arrange
    let ws = Workspace::new();
    let tree = TreeNode::synthetic_root(vec![TreeNode::new("Total")
        .with_amount(10.0)
        .with_children(vec![TreeNode::new("Item").with_amount(3.0)])]);
    let path = ws.write_tree("bad.json", &tree);

    // Act
    let lenient = ws.run(&["check", &arg(&path)]);
    let strict = ws.run(&["check", &arg(&path), "--strict"]);

    // Assert
    assert!(lenient.is_ok());
    let err = strict.unwrap_err();
    assert!(matches!(err, CliError::Discrepancies(1)));
    assert_eq!(err.exit_code(), exitcode::FAILURE);
}

#[test]
fn given_missing_workbook_when_building_then_returns_usage_error() {
    // Arrange
    let ws = Workspace::new();

    // Act
    let err = ws
        .run(&["build", &arg(&ws.path("absent.xlsx"))])
        .unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_invalid_tree_document_when_flattening_then_returns_dataerr() {
    // Arrange
    let ws = Workspace::new();
    let path = ws.path("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    // Act
    let err = ws.run(&["flatten", &arg(&path)]).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_workbook_when_dumping_then_writes_rectangular_csv() {
    // Arrange
    let ws = Workspace::new();
    let workbook = ws.path("dpwh.xlsx");
    write_xlsx(&workbook, &[budget_sheet()]);
    let output = ws.path("dump.csv");

    // Act
    ws.run(&["dump", &arg(&workbook), "-o", &arg(&output)]).unwrap();

    // Assert
    let csv = std::fs::read_to_string(&output).unwrap();
    let widths: Vec<usize> = csv.lines().map(|l| l.split(',').count()).collect();
    assert_eq!(widths.len(), 6);
    assert!(widths.iter().all(|w| *w == 11));
    assert!(csv.lines().next().unwrap().starts_with(",Infrastructure,"));
}

#[test]
fn given_workbook_when_running_pipeline_then_writes_all_outputs_to_out_dir() {
    // Arrange
    let ws = Workspace::new();
    let workbook = ws.path("dpwh.xlsx");
    write_xlsx(&workbook, &[budget_sheet()]);
    let out_dir = ws.path("out");

    // Act
    ws.run(&["run", &arg(&workbook), "--out-dir", &arg(&out_dir)])
        .unwrap();

    // Assert
    for name in [
        "dpwh_hierarchy.json",
        "dpwh_hierarchy_table.csv",
        "dpwh_hierarchy_table.json",
        "dpwh_hierarchy_table_sample.md",
    ] {
        assert!(out_dir.join(name).is_file(), "missing {name}");
    }
}

#[test]
fn given_zero_items_when_previewing_then_rejects_arguments() {
    // Arrange
    let ws = Workspace::new();
    let tree = ws.write_tree("budget.json", &sample_tree());

    // Act
    let err = ws.run(&["tree", &arg(&tree), "--items", "0"]).unwrap_err();

    // Assert
    assert!(matches!(err, CliError::InvalidArgs(_)));
}

#[test]
fn given_tree_when_summarizing_sections_then_succeeds_and_rejects_zero_top() {
    // Arrange
    let ws = Workspace::new();
    let tree = ws.write_tree("budget.json", &sample_tree());

    // Act
    let listed = ws.run(&["sections", &arg(&tree), "--top", "2"]);
    let rejected = ws.run(&["sections", &arg(&tree), "--top", "0"]);

    // Assert
    assert!(listed.is_ok());
    assert!(matches!(rejected, Err(CliError::InvalidArgs(_))));
}
