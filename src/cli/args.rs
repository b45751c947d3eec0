//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::RootMode;

/// Turn indented budget spreadsheets into hierarchical trees, flat tables and reports
#[derive(Parser, Debug)]
#[command(name = "budget-tree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./budget-tree.toml when present)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the tree document from a workbook
    Build {
        /// Source workbook (.xlsx)
        #[arg(value_hint = ValueHint::FilePath)]
        xlsx: PathBuf,

        /// Tree JSON output (default: <stem>_hierarchy.json next to the workbook)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Worksheet name (default: configured sheet, else the first)
        #[arg(long)]
        sheet: Option<String>,

        /// Root handling: synthetic or auto
        #[arg(long)]
        root: Option<RootMode>,
    },

    /// Flatten a tree document into one row per leaf
    Flatten {
        /// Tree JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,

        /// CSV output (default when no output is given: <stem>_table.csv)
        #[arg(long, value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,

        /// JSON output
        #[arg(long, value_hint = ValueHint::FilePath)]
        json: Option<PathBuf>,

        /// Minimum number of level columns
        #[arg(long)]
        levels: Option<usize>,
    },

    /// Write the markdown sample report of the flattened table
    Report {
        /// Tree JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,

        /// Markdown output (default: <stem>_table_sample.md)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Rows in the sample table
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Write the tree as a nested markdown list
    Outline {
        /// Tree JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,

        /// Markdown output (default: <stem>.md)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the tree to the terminal
    Tree {
        /// Tree JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,

        /// Deepest level expanded
        #[arg(long, default_value_t = 3)]
        depth: usize,

        /// Children shown per node
        #[arg(long, default_value_t = 10)]
        items: usize,

        /// Expand every level
        #[arg(long, conflicts_with = "depth")]
        full: bool,
    },

    /// Compare stated subtotals with the sum of their leaves
    Check {
        /// Tree JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,

        /// Accepted absolute difference
        #[arg(long, default_value_t = 0.01)]
        tolerance: f64,

        /// Exit with status 1 when discrepancies are found
        #[arg(long)]
        strict: bool,
    },

    /// Distinct values per level column
    Levels {
        /// Tree JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,
    },

    /// Per-section totals, depth distribution and most frequent level values
    Sections {
        /// Tree JSON document
        #[arg(value_hint = ValueHint::FilePath)]
        tree: PathBuf,

        /// Values listed per level
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Dump a worksheet's cell text as CSV
    Dump {
        /// Source workbook (.xlsx)
        #[arg(value_hint = ValueHint::FilePath)]
        xlsx: PathBuf,

        /// CSV output (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Worksheet name
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Build, flatten and report in one go
    Run {
        /// Source workbook (.xlsx)
        #[arg(value_hint = ValueHint::FilePath)]
        xlsx: PathBuf,

        /// Output directory (default: configured out_dir, else next to the workbook)
        #[arg(long, value_hint = ValueHint::DirPath)]
        out_dir: Option<PathBuf>,

        /// Worksheet name
        #[arg(long)]
        sheet: Option<String>,

        /// Root handling: synthetic or auto
        #[arg(long)]
        root: Option<RootMode>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
