use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sqlflow_core::{ColumnRef, Config, Report, Severity};
use sqlflow_engine::{RenderPlan, Validation};
use sqlflow_graph::{dedup_active_set, import_response, Graph, LineageDocument};

/// sqlflow - column lineage for data-flow diagrams
#[derive(Parser)]
#[command(name = "sqlflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: sqlflow.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which half of the lineage to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Direction {
    /// Columns the target was derived from
    Descendants,

    /// Columns derived from the target
    Ancestors,

    /// Both, as highlighted on hover
    Active,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the lineage of one column
    Trace {
        /// Path to the lineage document (data.json)
        graph: PathBuf,

        /// Column as `node.column`
        column: String,

        /// Which lineage to follow
        #[arg(short, long, value_enum, default_value_t = Direction::Active)]
        direction: Direction,

        /// Drop repeated columns
        #[arg(short, long)]
        unique: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check a lineage document for data-quality issues
    Check {
        /// Path to the lineage document (data.json)
        graph: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Print the render plan for a lineage document as JSON
    Plan {
        /// Path to the lineage document (data.json)
        graph: PathBuf,
    },

    /// Convert a lineage-service response into a lineage document
    Import {
        /// Path to the service response JSON
        response: PathBuf,

        /// Output file for the lineage document
        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("sqlflow.toml").exists() {
        Config::from_file(Path::new("sqlflow.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };
    tracing::debug!(layout = ?config.layout, "configuration loaded");

    match cli.command {
        Commands::Trace { graph, column, direction, unique, json } => {
            trace_command(&graph, &column, direction, unique, json, cli.verbose)
        }
        Commands::Check { graph, output, markdown } => {
            check_command(&config, &graph, &output, markdown.as_deref(), cli.verbose)
        }
        Commands::Plan { graph } => plan_command(&config, &graph, cli.verbose),
        Commands::Import { response, output } => {
            import_command(&config, &response, &output, cli.verbose)
        }
    }
}

fn load_graph_file(path: &Path, verbose: bool) -> Result<Graph> {
    if verbose {
        eprintln!("{} {}", "Loading lineage from:".cyan(), path.display());
    }

    let document = LineageDocument::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load lineage document: {}", e))?;

    Ok(document.into_graph())
}

/// Trace command - print the lineage of one column
fn trace_command(
    graph_path: &Path,
    column: &str,
    direction: Direction,
    unique: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let target = ColumnRef::parse_element_id(column).ok_or_else(|| {
        anyhow::anyhow!("Column '{}' must be written as node.column", column)
    })?;

    let graph = load_graph_file(graph_path, verbose)?;

    if !graph.contains(&target) && verbose {
        eprintln!("{} {} is not a loaded column", "⚠ Warning:".yellow(), target);
    }

    let mut lineage = match direction {
        Direction::Descendants => graph.descendants(&target.parent_name, &target.column),
        Direction::Ancestors => graph.ancestors(&target.parent_name, &target.column),
        Direction::Active => graph.active_set(&target.parent_name, &target.column),
    };
    if unique {
        lineage = dedup_active_set(lineage);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&lineage)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Column Lineage".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{} {}", "Column:".bold(), target.to_string().green());
    println!("{} {:?}", "Direction:".bold(), direction);
    println!("{} {}", "Columns:".bold(), lineage.len());
    println!();

    for (i, entry) in lineage.iter().enumerate() {
        let label = graph
            .column(entry)
            .map(|c| format!("{} ({})", entry, c.name))
            .unwrap_or_else(|| format!("{} {}", entry, "(not loaded)".dimmed()));

        if *entry == target {
            println!("  {}. {}", i + 1, label.green());
        } else {
            println!("  {}. {}", i + 1, label.yellow());
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());

    Ok(())
}

/// Check command - validate a lineage document
fn check_command(
    config: &Config,
    graph_path: &Path,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let graph = load_graph_file(graph_path, verbose)?;

    if verbose {
        eprintln!("{}", "Checking nodes and relations...".cyan());
    }

    let report = Validation::run(&graph, config).into_report();

    report.save_to_file(output)?;
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, report.to_markdown())?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    // Exit with error code if there are errors
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Plan command - dump the render plan
fn plan_command(config: &Config, graph_path: &Path, verbose: bool) -> Result<()> {
    let graph = load_graph_file(graph_path, verbose)?;
    let plan = RenderPlan::build(&graph, &config.style);

    if verbose {
        let unresolved = plan.unresolved_connections().len();
        if unresolved > 0 {
            eprintln!("{} {} connectors point at missing endpoints", "⚠ Warning:".yellow(), unresolved);
        }
    }

    println!("{}", plan.to_json()?);
    Ok(())
}

/// Import command - lay out a lineage-service response
fn import_command(config: &Config, response_path: &Path, output: &Path, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("{} {}", "Reading service response from:".cyan(), response_path.display());
    }

    let json = std::fs::read_to_string(response_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", response_path.display(), e))?;

    let document = import_response(&json, &config.layout)?;
    document.save_to_file(output)?;

    println!(
        "{} {} nodes, {} relations -> {}",
        "✓ Imported".green(),
        document.nodes.len(),
        document.relations.len(),
        output.display()
    );

    Ok(())
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Lineage Validation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!(
        "Checked: {} nodes, {} relations",
        report.summary.nodes_checked, report.summary.relations_checked
    );
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(loc) = &diag.location {
                println!("    at {}", loc);
            }

            for key in &diag.related {
                println!("      - {}", key);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}
