use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use chatstats::config::AnalysisConfig;
use chatstats::conversation::Conversation;
use chatstats::logging;
use chatstats::renderer;
use chatstats::report::Report;
use chatstats::source::{BracketLineExtractor, LexicalOrder, LineSplitter};

// Help text constants
const HELP_MAIN: &str = "\
chatstats — statistics for chat logs

Usage:
    chatstats --input <glob>... [--config <file>] [--render [formats]] [--output <dir>]
    chatstats --render [formats] --json-stats <path> [--output <dir>]

More help:
    chatstats --help render
    chatstats --help input";

const HELP_RENDER: &str = "\
Render reports (md,json)

Options:
    --render [formats]   Comma-separated formats (md,json). Empty renders all.
    --json-stats <path>  Re-render a stats.json written by an earlier run.
    --output <dir>       Output directory (default: current dir). Writes stats.md / stats.json.

Examples:
  chatstats --input 'logs/*.txt' --render md,json --output out
  chatstats --render md --json-stats out/stats.json --output out";

const HELP_INPUT: &str = "\
Input format

One message per line:
    2017-01-01T10:00:00 <alice> hello everyone

Lines starting with '--' and lines of any other shape are skipped.
Files matching --input are read in lexical order of their names.

A --config JSON file may set name_map (log name -> display name),
swears, stopwords and responses. Missing fields use built-in lists.";

#[derive(Parser)]
#[command(name = "chatstats", disable_help_flag = true)]
#[command(about = "Chat log statistics", long_about = None)]
struct Cli {
    /// Chat log files or glob patterns
    #[arg(short, long, num_args = 1..)]
    input: Vec<String>,

    /// JSON file with name_map and word lists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render formats (comma-separated: md,json). Renders all if no formats specified.
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    render: Option<String>,

    /// Path to a stats JSON report to re-render instead of analysing logs
    #[arg(long)]
    json_stats: Option<PathBuf>,

    /// Output directory (defaults to current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for random quote selection
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Show help (global or per topic). Example: chatstats --help render
    #[arg(long, value_name = "TOPIC", num_args = 0..=1, default_missing_value = "")]
    help: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(help_topic) = cli.help {
        let topic = help_topic.trim();
        if topic.is_empty() {
            println!("{}", HELP_MAIN);
        } else if topic.eq_ignore_ascii_case("render") {
            println!("{}", HELP_RENDER);
        } else if topic.eq_ignore_ascii_case("input") {
            println!("{}", HELP_INPUT);
        } else {
            println!("Unknown help topic: {}", topic);
        }
        return Ok(());
    }

    logging::init_logging(cli.log_dir.as_deref(), cli.verbose)?;

    let config = match cli.config {
        Some(ref path) => AnalysisConfig::load_from_file(path)?,
        None => AnalysisConfig::default(),
    };

    // Load or build the report
    let report = if let Some(json_path) = cli.json_stats {
        Report::load_from_file(&json_path)?
    } else if !cli.input.is_empty() {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let conversation = Conversation::load(
            &cli.input,
            &LexicalOrder,
            &LineSplitter,
            &BracketLineExtractor,
            &config,
            &mut rng,
        )?;
        Report::from_conversation(&conversation)
    } else {
        eprintln!("No input specified. Use --input to analyse chat logs.");
        eprintln!("Example: chatstats --input 'logs/*.txt' --render md");
        return Ok(());
    };

    // Determine output directory
    let output_dir = cli.output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    // Parse formats
    let render_arg = cli.render.unwrap_or_default();
    let formats: Vec<&str> = if render_arg.is_empty() {
        // Empty string means render all
        vec!["md", "json"]
    } else {
        render_arg.split(',').map(|s| s.trim()).collect()
    };

    // Render each format
    for format in formats {
        match format {
            "md" => {
                let markdown = renderer::md::render(&report, &config.words)?;
                let output_path = output_dir.join("stats.md");
                write_output(&output_path, &markdown)?;
                eprintln!("Markdown report written to: {}", output_path.display());
            }
            "json" => {
                let output_path = output_dir.join("stats.json");
                report.save(&output_path)?;
                eprintln!("JSON report written to: {}", output_path.display());
            }
            _ => {
                tracing::warn!("Unknown format '{}', skipping", format);
                eprintln!("Warning: Unknown format '{}', skipping", format);
            }
        }
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output: {}", path.display()))
}
