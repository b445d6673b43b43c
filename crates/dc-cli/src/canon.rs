use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use dc_compiler::{CanonError, CanonStats, Canonicalizer};
use serde::Serialize;

use crate::reader::extract_files;
use crate::settings::{load_settings, write_text, PresetArg};

pub struct CanonOptions {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub preset: Option<PresetArg>,
    pub config: Option<PathBuf>,
    pub suffixes: Option<PathBuf>,
    pub keep_subdomains: bool,
    pub chunk_lines: usize,
    pub json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    inputs: Vec<String>,
    output: String,
    preset: &'static str,
    reduced: bool,
    total_ms: f64,
    stats: &'a CanonStats,
}

pub fn cmd_canon(opts: CanonOptions) -> Result<(), String> {
    if opts.inputs.is_empty() {
        return Err("No input files specified".to_string());
    }
    let output = resolve_output(&opts.inputs, opts.output.as_deref())?;

    let start = Instant::now();
    let settings = load_settings(opts.preset, opts.config.as_deref(), opts.suffixes.as_deref())?;
    let canon = Canonicalizer::new(settings.filter, settings.suffixes)
        .map_err(|e| format!("Invalid filter configuration: {}", e))?;
    let canon = Arc::new(canon);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    let extracted = runtime.block_on(extract_files(Arc::clone(&canon), &opts.inputs, opts.chunk_lines))?;

    let reduce = !opts.keep_subdomains;
    let result = match canon.finish(extracted, reduce) {
        Ok(result) => result,
        Err(CanonError::EmptyInput) => {
            println!("Nothing to do: no usable domains in input; '{}' left unchanged", output.display());
            return Ok(());
        }
        Err(e) => return Err(e.to_string()),
    };

    write_text(&output, &result.render())?;
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    log::info!("Wrote {} in {:.1}ms", output.display(), total_ms);

    if opts.json {
        let report = Report {
            inputs: opts.inputs.iter().map(|p| p.display().to_string()).collect(),
            output: output.display().to_string(),
            preset: settings.preset.name(),
            reduced: reduce,
            total_ms,
            stats: &result.stats,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", json);
    } else {
        let stats = &result.stats;
        println!("Retained {} domains", stats.retained);
        println!(
            "  Lines:    {} ({} skipped, {} accepted)",
            stats.lines,
            stats.skipped_total(),
            stats.accepted
        );
        println!(
            "  Domains:  {} unique -> {} (redundant removed {})",
            stats.unique, stats.retained, stats.removed
        );
    }

    Ok(())
}

/// Without `-o`, a single input is rewritten in place.
fn resolve_output(inputs: &[PathBuf], output: Option<&Path>) -> Result<PathBuf, String> {
    match (output, inputs) {
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, [single]) => Ok(single.clone()),
        _ => Err("--output is required with more than one input".to_string()),
    }
}
