//! Markdown renderings: flat-table sample report and nested outline.

use std::collections::BTreeMap;

use crate::domain::{format_count, format_currency, FlatRecord, FlatTable, TreeNode};

/// Level columns shown in the sample table.
const SAMPLE_LEVEL_COLUMNS: usize = 6;
/// Cells longer than this are truncated in the sample table.
const MAX_CELL_CHARS: usize = 40;
/// Full paths listed at the end of the report.
const SAMPLE_PATHS: usize = 10;

/// Rendering knobs shared by both documents.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownOptions {
    pub title: String,
    pub sample_rows: usize,
    pub currency_symbol: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            title: "Budget Hierarchy".to_string(),
            sample_rows: 20,
            currency_symbol: "₱".to_string(),
        }
    }
}

impl MarkdownOptions {
    fn amount(&self, amount: Option<f64>) -> String {
        amount
            .map(|a| format_currency(a, &self.currency_symbol))
            .unwrap_or_default()
    }
}

/// Summary statistics, depth distribution and a sample of the flat table.
pub fn sample_report(table: &FlatTable, options: &MarkdownOptions) -> String {
    let records = &table.records;
    let total = records.len();
    let with_amount = records.iter().filter(|r| r.amount.is_some()).count();
    let with_description = records
        .iter()
        .filter(|r| r.description.as_deref().is_some_and(|d| !d.trim().is_empty()))
        .count();
    let max_depth = table.max_depth();

    let mut lines = vec![
        format!("# Flattened {}", options.title),
        String::new(),
        "## Summary Statistics".to_string(),
        String::new(),
        format!("- **Total rows:** {}", format_count(total)),
        format!(
            "- **Total amount:** {}",
            format_currency(table.total_amount(), &options.currency_symbol)
        ),
        format!(
            "- **Rows with amounts:** {} ({:.1}%)",
            format_count(with_amount),
            percent(with_amount, total)
        ),
        format!(
            "- **Rows with descriptions:** {} ({:.1}%)",
            format_count(with_description),
            percent(with_description, total)
        ),
        format!("- **Maximum depth:** {max_depth} levels"),
        String::new(),
    ];

    let mut by_depth: BTreeMap<usize, usize> = BTreeMap::new();
    for record in records {
        *by_depth.entry(record.depth()).or_default() += 1;
    }
    lines.push("### Distribution by Depth".to_string());
    lines.push(String::new());
    lines.push("| Depth | Rows | Percentage |".to_string());
    lines.push("|-------|-------|------------|".to_string());
    for (depth, count) in &by_depth {
        lines.push(format!(
            "| {depth} | {} | {:.1}% |",
            format_count(*count),
            percent(*count, total)
        ));
    }
    lines.push(String::new());

    let shown = options.sample_rows.min(total);
    lines.push(format!("## Sample Data (First {shown} Rows)"));
    lines.push(String::new());

    let level_columns = table.width.min(SAMPLE_LEVEL_COLUMNS);
    let mut headers: Vec<String> = (0..level_columns).map(|i| format!("level_{i}")).collect();
    headers.extend(["Value", "Amount", "Depth"].iter().map(|s| s.to_string()));
    lines.push(format!("| {} |", headers.join(" | ")));
    lines.push(format!("|{}|", vec!["--------"; headers.len()].join("|")));

    for record in records.iter().take(shown) {
        lines.push(sample_row(record, level_columns, options));
    }
    if total > shown {
        lines.push(format!("\n*... and {} more rows*", format_count(total - shown)));
    }
    lines.push(String::new());

    lines.push("## Sample Full Paths".to_string());
    lines.push(String::new());
    for (idx, record) in records.iter().take(SAMPLE_PATHS).enumerate() {
        let amount = options.amount(record.amount);
        let separator = if amount.is_empty() { "" } else { " " };
        lines.push(format!(
            "{}. {}{separator}{amount}",
            idx + 1,
            record.full_path()
        ));
    }
    lines.push(String::new());

    lines.join("\n")
}

fn sample_row(record: &FlatRecord, level_columns: usize, options: &MarkdownOptions) -> String {
    let mut cells: Vec<String> = (0..level_columns)
        .map(|level| table_cell(record.level(level).unwrap_or("")))
        .collect();
    cells.push(table_cell(&record.value));
    cells.push(options.amount(record.amount));
    cells.push(record.depth().to_string());
    format!("| {} |", cells.join(" | "))
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Truncate to 37 characters plus `...` when over 40, then escape pipes.
fn table_cell(text: &str) -> String {
    let truncated = if text.chars().count() > MAX_CELL_CHARS {
        let head: String = text.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    };
    escape(&truncated)
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Nested bullet list of the whole tree.
///
/// A synthetic root is not rendered; its children become the top-level items.
pub fn outline(root: &TreeNode, options: &MarkdownOptions) -> String {
    let mut lines = vec![
        format!("# {}", options.title),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    let top: Vec<&TreeNode> = if root.is_synthetic_root() {
        root.children.iter().collect()
    } else {
        vec![root]
    };
    for node in top {
        outline_node(node, 0, options, &mut lines);
        lines.push(String::new());
    }

    lines.join("\n")
}

fn outline_node(node: &TreeNode, level: usize, options: &MarkdownOptions, lines: &mut Vec<String>) {
    let indent = "  ".repeat(level);
    let amount = options.amount(node.amount);
    let separator = if amount.is_empty() { "" } else { " " };
    lines.push(format!(
        "{indent}- **{}**{separator}{amount}",
        escape(&node.title)
    ));

    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("{indent}    *{}*", escape(description)));
    }

    for child in &node.children {
        outline_node(child, level + 1, options, lines);
    }
}
