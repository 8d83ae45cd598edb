use camino::{Utf8Path, Utf8PathBuf};
use glob::Pattern;

use crate::domain::Pipeline;
use crate::error::PrepError;
use crate::fs_util::{exists_and_has_files, is_nonempty_gz_file, list_files};

pub const ATROPOS_QC_DIR: &str = "atropos_qc";
pub const TRIMMED_DIR: &str = "trimmed_sequences";
pub const FILTERED_DIR: &str = "filtered_sequences";

/// Picks the most processed output directory available for a project.
pub fn search_dir(run_path: &Utf8Path, project: &str, pipeline: Pipeline) -> Utf8PathBuf {
    let base = run_path.join(project);
    let filtered = base.join(FILTERED_DIR);

    match pipeline {
        Pipeline::AtroposAndBowtie2 => {
            let qc = base.join(ATROPOS_QC_DIR);
            if !exists_and_has_files(&qc) {
                base
            } else if exists_and_has_files(&filtered) {
                filtered
            } else {
                qc
            }
        }
        Pipeline::FastpAndMinimap2 => {
            let trimmed = base.join(TRIMMED_DIR);
            match (exists_and_has_files(&trimmed), exists_and_has_files(&filtered)) {
                (_, true) => filtered,
                (true, false) => trimmed,
                (false, false) => base,
            }
        }
    }
}

/// Files in `dir` matching `<sample>_S*_L*<lane>_R*.fastq.gz`, sorted.
pub fn matching_reads(
    dir: &Utf8Path,
    sample: &str,
    lane: &str,
) -> Result<Vec<Utf8PathBuf>, PrepError> {
    if !dir.as_std_path().is_dir() {
        return Ok(Vec::new());
    }
    let pattern = Pattern::new(&format!(
        "{}_S*_L*{}_R*.fastq.gz",
        Pattern::escape(sample),
        Pattern::escape(lane)
    ))
    .map_err(|err| PrepError::Filesystem(format!("invalid file pattern: {err}")))?;

    Ok(list_files(dir)?
        .into_iter()
        .filter(|path| path.file_name().is_some_and(|name| pattern.matches(name)))
        .collect())
}

/// Character index where the shared run prefix of a read pair ends.
///
/// The first differing character is the digit of `R1`/`R2`; the prefix stops
/// two characters earlier so both `_R1_001.fastq.gz` and `_R1.trimmed...`
/// style names resolve to the same prefix. When the names differ within
/// their first two characters the offset counts back from the end instead,
/// so `"a1"`/`"b1"` keep everything but the last two characters.
pub fn run_prefix_boundary(forward: &str, reverse: &str) -> Result<usize, PrepError> {
    let f = forward.chars().collect::<Vec<_>>();
    let r = reverse.chars().collect::<Vec<_>>();
    if f.len() != r.len() {
        return Err(PrepError::MismatchedReadNames {
            forward: forward.to_string(),
            reverse: reverse.to_string(),
        });
    }

    let boundary = match f.iter().zip(&r).position(|(a, b)| a != b) {
        Some(index) if index >= 2 => index - 2,
        Some(index) => f.len().saturating_sub(2 - index),
        None => f.len().saturating_sub(1),
    };
    Ok(boundary)
}

pub fn run_prefix(forward: &str, reverse: &str) -> Result<String, PrepError> {
    let boundary = run_prefix_boundary(forward, reverse)?;
    Ok(forward.chars().take(boundary).collect())
}

/// Finds the run prefix shared by a sample's forward and reverse reads in one lane.
///
/// Returns `Ok(None)` unless exactly two matching files exist and both are
/// non-empty gzip files.
pub fn locate_prefix(
    run_path: &Utf8Path,
    project: &str,
    sample: &str,
    lane: &str,
    pipeline: Pipeline,
) -> Result<Option<String>, PrepError> {
    let dir = search_dir(run_path, project, pipeline);
    let reads = matching_reads(&dir, sample, lane)?;

    let [forward, reverse] = reads.as_slice() else {
        tracing::debug!(%dir, sample, lane, found = reads.len(), "no read pair");
        return Ok(None);
    };

    if !is_nonempty_gz_file(forward) || !is_nonempty_gz_file(reverse) {
        tracing::debug!(%dir, sample, lane, "read pair is empty");
        return Ok(None);
    }

    let (Some(f), Some(r)) = (forward.file_name(), reverse.file_name()) else {
        return Ok(None);
    };
    run_prefix(f, r).map(Some)
}
