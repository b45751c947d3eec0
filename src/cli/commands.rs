//! Command dispatch: one handler per subcommand

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::export::{rows_to_csv, TreeNodeConvert};
use crate::application::OutputPaths;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    check_subtotals, format_count, format_currency, LevelSummary, RootMode, SectionSummary,
    TreeStats,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::xlsx::XlsxSource;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // completions and config inspection do not depend on a valid config
    match &cli.command {
        Commands::Completion { shell } => return cmd_completion(*shell),
        Commands::Config { command } => return cmd_config(command, cli.config.as_deref()),
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match &cli.command {
        Commands::Build {
            xlsx,
            output,
            sheet,
            root,
        } => cmd_build(settings, xlsx, output.as_deref(), sheet.clone(), *root),
        Commands::Flatten {
            tree,
            csv,
            json,
            levels,
        } => cmd_flatten(settings, tree, csv.as_deref(), json.as_deref(), *levels),
        Commands::Report { tree, output, rows } => {
            cmd_report(settings, tree, output.as_deref(), *rows)
        }
        Commands::Outline { tree, output } => cmd_outline(settings, tree, output.as_deref()),
        Commands::Tree {
            tree,
            depth,
            items,
            full,
        } => cmd_tree(settings, tree, (!*full).then_some(*depth), *items),
        Commands::Check {
            tree,
            tolerance,
            strict,
        } => cmd_check(settings, tree, *tolerance, *strict),
        Commands::Levels { tree } => cmd_levels(settings, tree),
        Commands::Sections { tree, top } => cmd_sections(settings, tree, *top),
        Commands::Dump {
            xlsx,
            output,
            sheet,
        } => cmd_dump(settings, xlsx, output.as_deref(), sheet.clone()),
        Commands::Run {
            xlsx,
            out_dir,
            sheet,
            root,
        } => cmd_run(settings, xlsx, out_dir.as_deref(), sheet.clone(), *root),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

/// Workbook source honoring `--sheet` over the configured sheet.
fn workbook_source(settings: &Settings, xlsx: &Path, sheet: Option<String>) -> XlsxSource {
    XlsxSource::new(xlsx)
        .with_sheet(sheet.or_else(|| settings.layout.sheet.clone()))
        .with_min_width(settings.layout.amount_column + 1)
}

fn with_root_override(mut settings: Settings, root: Option<RootMode>) -> Settings {
    if let Some(root) = root {
        settings.tree.root_mode = root;
    }
    settings
}

fn require_file(path: &Path) -> CliResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::InvalidArgs(format!(
            "file not found: {}",
            path.display()
        )))
    }
}

#[instrument(skip(settings))]
fn cmd_build(
    settings: Settings,
    xlsx: &Path,
    output: Option<&Path>,
    sheet: Option<String>,
    root: Option<RootMode>,
) -> CliResult<()> {
    require_file(xlsx)?;
    let source = workbook_source(&settings, xlsx, sheet);
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| OutputPaths::for_workbook(xlsx, None).tree_json);

    let container = ServiceContainer::new(with_root_override(settings, root));
    let outcome = container.build.build(&source)?;
    container.build.write_tree(&outcome.tree, &target)?;

    let report = &outcome.report;
    output::success(&format!(
        "built tree: {} nodes from {} rows",
        format_count(report.nodes_created),
        format_count(report.rows_seen)
    ));
    output::detail(&format!(
        "{} top-level, {} descriptions attached, {} skipped rows",
        report.top_level_nodes,
        report.descriptions_attached,
        report.untitled_rows
    ));
    if report.orphan_descriptions > 0 {
        output::warning(&format!(
            "{} description rows had no preceding node",
            report.orphan_descriptions
        ));
    }
    output::written(&target);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_flatten(
    settings: Settings,
    tree: &Path,
    csv: Option<&Path>,
    json: Option<&Path>,
    levels: Option<usize>,
) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let root = container.table.load_tree(tree)?;
    let table = match levels {
        Some(min_levels) => container.table.flatten_with(&root, min_levels),
        None => container.table.flatten(&root),
    };

    let csv = match (csv, json) {
        (None, None) => Some(OutputPaths::table_csv_for(tree)),
        (csv, _) => csv.map(Path::to_path_buf),
    };
    if let Some(path) = &csv {
        container.table.write_csv(&table, path)?;
        output::written(path);
    }
    if let Some(path) = json {
        container.table.write_json(&table, path)?;
        output::written(path);
    }

    output::success(&format!(
        "{} records, {} level columns, total {}",
        format_count(table.len()),
        table.width,
        format_currency(
            table.total_amount(),
            &container.settings.output.currency_symbol
        )
    ));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_report(
    settings: Settings,
    tree: &Path,
    output: Option<&Path>,
    rows: Option<usize>,
) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let root = container.table.load_tree(tree)?;
    let table = container.table.flatten(&root);

    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| OutputPaths::sample_for(tree));
    container.report.write_sample(&table, rows, &target)?;
    output::written(&target);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_outline(settings: Settings, tree: &Path, output: Option<&Path>) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let root = container.table.load_tree(tree)?;

    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| OutputPaths::outline_for(tree));
    container.report.write_outline(&root, &target)?;
    output::written(&target);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_tree(
    settings: Settings,
    tree: &Path,
    depth: Option<usize>,
    items: usize,
) -> CliResult<()> {
    if items == 0 {
        return Err(CliError::InvalidArgs("--items must be at least 1".to_string()));
    }
    let container = ServiceContainer::new(settings);
    let root = container.table.load_tree(tree)?;
    let options = container.preview_options(depth, items);
    output::info(&root.to_preview_tree(&options));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_check(settings: Settings, tree: &Path, tolerance: f64, strict: bool) -> CliResult<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(CliError::InvalidArgs(format!(
            "tolerance must be a non-negative number, got {tolerance}"
        )));
    }
    let container = ServiceContainer::new(settings);
    let symbol = container.settings.output.currency_symbol.clone();
    let root = container.table.load_tree(tree)?;

    let stats = TreeStats::collect(&root);
    output::section("Tree");
    output::detail(&format!(
        "{} nodes, {} leaves, {} with amounts, depth {}",
        format_count(stats.total_nodes),
        format_count(stats.leaves),
        format_count(stats.nodes_with_amount),
        stats.max_depth
    ));
    output::detail(&format!(
        "leaf total {}",
        format_currency(stats.leaf_amount_total, &symbol)
    ));

    let discrepancies = check_subtotals(&root, tolerance);
    output::section("Subtotals");
    if discrepancies.is_empty() {
        output::artifact(&"every stated subtotal matches its leaves");
        return Ok(());
    }
    for found in &discrepancies {
        output::mismatch(&format!(
            "{}: stated {}, leaves {} (diff {})",
            found.path.join(" > "),
            format_currency(found.stated, &symbol),
            format_currency(found.computed, &symbol),
            format_currency(found.difference(), &symbol)
        ));
    }

    if strict {
        Err(CliError::Discrepancies(discrepancies.len()))
    } else {
        output::warning(&format!(
            "{} subtotal discrepancies",
            discrepancies.len()
        ));
        Ok(())
    }
}

#[instrument(skip(settings))]
fn cmd_levels(settings: Settings, tree: &Path) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let root = container.table.load_tree(tree)?;
    let table = container.table.flatten(&root);
    let summary = LevelSummary::from_records(&table.records);

    for (level, values) in summary.levels.iter().enumerate() {
        output::section(&format!("level_{level}: {} distinct", values.len()));
        for value in values.iter().take(5) {
            output::detail(value);
        }
        if values.len() > 5 {
            output::detail(&format!("... {} more", values.len() - 5));
        }
    }

    if !summary.overlaps.is_empty() {
        output::section("Values at several levels");
        for (value, levels) in &summary.overlaps {
            output::detail(&format!(
                "{value}: levels {}",
                levels.iter().join(", ")
            ));
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_sections(settings: Settings, tree: &Path, top: usize) -> CliResult<()> {
    if top == 0 {
        return Err(CliError::InvalidArgs("--top must be at least 1".to_string()));
    }
    let container = ServiceContainer::new(settings);
    let symbol = container.settings.output.currency_symbol.clone();
    let root = container.table.load_tree(tree)?;
    let table = container.table.flatten(&root);
    let sections = SectionSummary::from_records(&table.records, top);

    for section in &sections {
        output::section(&section.name);
        output::detail(&format!(
            "{} items, total {}, average {}",
            format_count(section.records),
            format_currency(section.total_amount, &symbol),
            format_currency(section.average_amount(), &symbol)
        ));
        output::detail(&format!(
            "depths: {}",
            section
                .depths
                .iter()
                .map(|(depth, count)| format!("{depth}={}", format_count(*count)))
                .join(", ")
        ));
        for level in &section.levels {
            let shown = if level.counts_exceeded() {
                format!("top {} of {}", level.top.len(), level.distinct)
            } else {
                format!("{} distinct", level.distinct)
            };
            output::detail(&format!(
                "level_{} ({shown}): {}",
                level.level,
                level
                    .top
                    .iter()
                    .map(|(value, count)| format!("{value} ({count})"))
                    .join(", ")
            ));
        }
    }
    output::success(&format!("{} sections", sections.len()));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_dump(
    settings: Settings,
    xlsx: &Path,
    output: Option<&Path>,
    sheet: Option<String>,
) -> CliResult<()> {
    require_file(xlsx)?;
    let source = workbook_source(&settings, xlsx, sheet);
    let sheet = source
        .read_sheet()
        .map_err(|e| InfraError::workbook(xlsx, e))?;
    let csv = rows_to_csv(&sheet.rows)?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!(
                "dumped sheet {:?}: {} rows x {} columns",
                sheet.name,
                format_count(sheet.rows.len()),
                sheet.width()
            ));
            output::written(path);
        }
        None => print!("{csv}"),
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_run(
    settings: Settings,
    xlsx: &Path,
    out_dir: Option<&Path>,
    sheet: Option<String>,
    root: Option<RootMode>,
) -> CliResult<()> {
    require_file(xlsx)?;
    let source = workbook_source(&settings, xlsx, sheet);
    let out_dir: Option<PathBuf> = out_dir
        .map(Path::to_path_buf)
        .or_else(|| settings.output.out_dir.clone());
    let paths = OutputPaths::for_workbook(xlsx, out_dir.as_deref());

    let container = ServiceContainer::new(with_root_override(settings, root));
    let summary = container.pipeline().run(&source, paths)?;

    output::success(&format!(
        "{} nodes, {} leaf records, total {}",
        format_count(summary.report.nodes_created),
        format_count(summary.records),
        format_currency(
            summary.total_amount,
            &container.settings.output.currency_symbol
        )
    ));
    for path in [
        &summary.paths.tree_json,
        &summary.paths.table_csv,
        &summary.paths.table_json,
        &summary.paths.sample_markdown,
    ] {
        output::artifact(&path.display());
    }
    if summary.records != summary.leaves {
        output::warning(&format!(
            "record count {} differs from leaf count {}",
            summary.records, summary.leaves
        ));
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands, local: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(local)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local.map(Path::to_path_buf).unwrap_or_else(local_config_path)
            };
            if target.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    target.display()
                )));
            }
            if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&target, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
            output::created(&target);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info(&"global: (unavailable)"),
            }
            let local = local.map(Path::to_path_buf).unwrap_or_else(local_config_path);
            output::info(&format!("local:  {}", local.display()));
            Ok(())
        }
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
