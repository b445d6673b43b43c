//! domcanon CLI
//!
//! CLI tool for canonicalizing and filtering domain rule lists.

mod canon;
mod logger;
mod reader;
mod settings;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use dc_compiler::LineFilter;
use dc_core::{SortKey, SuffixTable};

use canon::{cmd_canon, CanonOptions};
use reader::DEFAULT_CHUNK_LINES;
use settings::{load_settings, read_text, write_text, PresetArg};

#[derive(Parser)]
#[command(name = "dc-cli")]
#[command(about = "Domain rule list canonicalizer")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, deduplicate, reduce and sort rule lists
    Canon {
        /// Input rule list files
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Output file (defaults to rewriting the single input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Built-in filter tables
        #[arg(short, long, value_enum)]
        preset: Option<PresetArg>,

        /// JSON config file with filter tables and suffixes
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// PSL-style suffix list replacing the built-in table
        #[arg(short, long)]
        suffixes: Option<PathBuf>,

        /// Keep subdomains of listed domains (dedupe and sort only)
        #[arg(long)]
        keep_subdomains: bool,

        /// Lines per extraction chunk
        #[arg(long, default_value_t = DEFAULT_CHUNK_LINES)]
        chunk_lines: usize,

        /// Print a JSON report instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Drop denied lines from a one-domain-per-line list
    Filter {
        /// Input list
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Built-in filter tables
        #[arg(short, long, value_enum)]
        preset: Option<PresetArg>,

        /// JSON config file with filter tables
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show how domains split at their public suffix
    Split {
        /// Domains to split
        #[arg(required = true)]
        domains: Vec<String>,

        /// JSON config file with a suffix list
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// PSL-style suffix list replacing the built-in table
        #[arg(short, long)]
        suffixes: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("Warning: {}", e);
    }

    let result = match cli.command {
        Commands::Canon {
            input,
            output,
            preset,
            config,
            suffixes,
            keep_subdomains,
            chunk_lines,
            json,
        } => cmd_canon(CanonOptions {
            inputs: input,
            output,
            preset,
            config,
            suffixes,
            keep_subdomains,
            chunk_lines,
            json,
        }),
        Commands::Filter {
            input,
            output,
            preset,
            config,
        } => cmd_filter(&input, output.as_deref(), preset, config.as_deref()),
        Commands::Split {
            domains,
            config,
            suffixes,
        } => cmd_split(&domains, config.as_deref(), suffixes.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_filter(
    input: &Path,
    output: Option<&Path>,
    preset: Option<PresetArg>,
    config: Option<&Path>,
) -> Result<(), String> {
    let settings = load_settings(preset, config, None)?;
    let filter = LineFilter::new(settings.filter)
        .map_err(|e| format!("Invalid filter configuration: {}", e))?;

    let content = read_text(input)?;
    let line_count = content.lines().count();
    log::info!("Read {} ({} lines)", input.display(), line_count);

    let outcome = filter.filter_lines(content.lines());
    let mut text = outcome.lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }

    match output {
        Some(path) => {
            write_text(path, &text)?;
            println!("Filtered {} lines to '{}'", line_count, path.display());
            println!("  Kept:     {}", outcome.lines.len() - outcome.added);
            println!("  Dropped:  {}", outcome.dropped);
            println!("  Added:    {}", outcome.added);
        }
        None => print!("{}", text),
    }

    Ok(())
}

fn cmd_split(domains: &[String], config: Option<&Path>, suffixes: Option<&Path>) -> Result<(), String> {
    let settings = load_settings(None, config, suffixes)?;
    for domain in domains {
        println!("{}", describe_split(&settings.suffixes, domain));
    }
    Ok(())
}

fn describe_split(table: &SuffixTable, domain: &str) -> String {
    let domain = domain.trim().trim_matches('.').to_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();
    let split = table.split(&labels);
    let key = SortKey::new(table, &domain);
    format!(
        "{}\tprefix={}\tsuffix={}\tregistrable={}\tkey=({}|{}|{}|{}|{})",
        domain,
        split.prefix.join("."),
        split.suffix,
        table.registrable_domain(&domain).unwrap_or_default(),
        key.levels[0],
        key.levels[1],
        key.levels[2],
        key.suffix,
        key.label_count
    )
}
