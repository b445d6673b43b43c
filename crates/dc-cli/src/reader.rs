//! Chunked input reading with extraction on the blocking pool.
//!
//! Each chunk of lines is handed to its own blocking task as soon as it is
//! read. Tasks return independent [`ExtractedChunk`]s which are merged once
//! all of them are done, so no set is shared between threads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dc_compiler::{Canonicalizer, ExtractedChunk};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

pub const DEFAULT_CHUNK_LINES: usize = 10_000;

/// Read `path` in chunks of `chunk_lines` lines, spawning extraction for
/// each. Returns the number of lines read.
async fn spawn_file_chunks(
    canon: &Arc<Canonicalizer>,
    path: &Path,
    chunk_lines: usize,
    tasks: &mut JoinSet<ExtractedChunk>,
) -> Result<usize, String> {
    let file = File::open(path)
        .await
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let mut lines = BufReader::new(file).lines();
    let chunk_lines = chunk_lines.max(1);

    let mut total = 0usize;
    let mut current = Vec::with_capacity(chunk_lines);
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?
    {
        current.push(line);
        if current.len() == chunk_lines {
            total += current.len();
            spawn_chunk(canon, std::mem::take(&mut current), tasks);
        }
    }
    if !current.is_empty() {
        total += current.len();
        spawn_chunk(canon, current, tasks);
    }

    Ok(total)
}

fn spawn_chunk(canon: &Arc<Canonicalizer>, lines: Vec<String>, tasks: &mut JoinSet<ExtractedChunk>) {
    let canon = Arc::clone(canon);
    tasks.spawn_blocking(move || canon.extract_chunk(lines));
}

/// Extract every input file and merge the results.
pub async fn extract_files(
    canon: Arc<Canonicalizer>,
    paths: &[PathBuf],
    chunk_lines: usize,
) -> Result<ExtractedChunk, String> {
    let mut tasks = JoinSet::new();

    for path in paths {
        let lines = spawn_file_chunks(&canon, path, chunk_lines, &mut tasks).await?;
        log::info!("Read {} ({} lines)", path.display(), lines);
    }

    let mut merged = ExtractedChunk::default();
    while let Some(joined) = tasks.join_next().await {
        let chunk = joined.map_err(|e| format!("Extraction task failed: {}", e))?;
        merged.merge(chunk);
    }

    log::info!(
        "Extracted {} domains from {} lines ({} skipped)",
        merged.domains.len(),
        merged.stats.lines,
        merged.stats.skipped_total()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_compiler::Preset;
    use dc_core::SuffixTable;

    fn canonicalizer() -> Arc<Canonicalizer> {
        Arc::new(Canonicalizer::new(Preset::Ad.filter_config(), SuffixTable::builtin()).unwrap())
    }

    fn temp_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_small_chunks_match_single_chunk() {
        let text = "example.com\na.example.com\n# c\nDOMAIN,x.org\n+.y.net\nads.example.jp\n";
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "chunks.txt", text);
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let chunked = runtime
            .block_on(extract_files(canonicalizer(), &[path.clone()], 2))
            .unwrap();
        let whole = runtime
            .block_on(extract_files(canonicalizer(), &[path.clone()], DEFAULT_CHUNK_LINES))
            .unwrap();

        assert_eq!(chunked.domains, whole.domains);
        assert_eq!(chunked.stats, whole.stats);
        assert_eq!(chunked.stats.lines, 6);
        assert_eq!(chunked.domains.len(), 4);
    }

    #[test]
    fn test_multiple_files_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        let a = temp_file(&dir, "a.txt", "a.example.com\nshared.org\n");
        let b = temp_file(&dir, "b.txt", "b.example.com\nshared.org\n");
        let runtime = tokio::runtime::Runtime::new().unwrap();

        let merged = runtime
            .block_on(extract_files(canonicalizer(), &[a.clone(), b.clone()], 1))
            .unwrap();
        assert_eq!(merged.stats.lines, 4);
        assert_eq!(merged.domains.len(), 3);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.txt");
        let err = runtime
            .block_on(extract_files(canonicalizer(), &[missing], 10))
            .err()
            .unwrap();
        assert!(err.starts_with("Failed to read"), "got: {}", err);
    }
}
