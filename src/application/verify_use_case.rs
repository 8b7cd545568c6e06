// ============================================================
// Layer 2 — VerifyUseCase
// ============================================================
// Checks an existing split directory for data leakage: the
// same sample name showing up in more than one of train, val
// and test.
//
//   Step 1: Read the input column of each split file
//   Step 2: Map every path to its sample name
//   Step 3: Intersect the sample sets pairwise
//   Step 4: If clean, gather variation statistics
//
// Missing split files read as empty, so a directory without a
// test.txt verifies fine.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::domain::pair::sample_id_from_path;
use crate::domain::split::SplitName;
use crate::infra::report::{
    LeakageReport, Overlap, OverlapExample, SplitCounts, VariationStats, MAX_LISTED_SAMPLES,
};
use crate::infra::split_files::read_split_file;

/// Samples shown with their file lists per overlap
const MAX_DETAILED_SAMPLES: usize = 5;

/// Files listed per side for each detailed sample
const MAX_FILES_PER_SIDE: usize = 3;

pub struct VerifyUseCase {
    split_dir: PathBuf,
}

impl VerifyUseCase {
    pub fn new(split_dir: impl Into<PathBuf>) -> Self {
        Self { split_dir: split_dir.into() }
    }

    pub fn execute(&self) -> Result<LeakageReport> {
        // ── Step 1: Read each split's input paths ────────────────────────────
        let mut inputs: BTreeMap<SplitName, Vec<String>> = BTreeMap::new();
        for split in SplitName::ALL {
            let path  = self.split_dir.join(split.file_name());
            let paths = read_split_file(&path)
                .with_context(|| format!("Cannot read split file '{}'", path.display()))?;
            inputs.insert(split, paths);
        }

        // ── Step 2: Sample names per split ───────────────────────────────────
        let names: BTreeMap<SplitName, BTreeSet<String>> = inputs
            .iter()
            .map(|(split, paths)| (*split, sample_names(paths)))
            .collect();

        let files  = split_counts(|s| inputs[&s].len());
        let unique = split_counts(|s| names[&s].len());

        // ── Step 3: Pairwise overlaps ────────────────────────────────────────
        let mut overlaps = Vec::new();
        for (left, right) in [
            (SplitName::Train, SplitName::Val),
            (SplitName::Train, SplitName::Test),
            (SplitName::Val, SplitName::Test),
        ] {
            let shared: Vec<String> = names[&left].intersection(&names[&right]).cloned().collect();
            if shared.is_empty() {
                continue;
            }

            let listed: Vec<&String> = shared.iter().take(MAX_LISTED_SAMPLES).collect();
            tracing::warn!(
                "Found {} sample names in both {} and {}: {:?}",
                shared.len(),
                left,
                right,
                listed
            );

            let examples = shared
                .iter()
                .take(MAX_DETAILED_SAMPLES)
                .map(|sample| OverlapExample {
                    sample: sample.clone(),
                    left:   files_of(&inputs[&left], sample),
                    right:  files_of(&inputs[&right], sample),
                })
                .collect();

            overlaps.push(Overlap { left, right, samples: shared, examples });
        }

        // ── Step 4: Variation statistics (clean splits only) ─────────────────
        let variations = if overlaps.is_empty() {
            variation_stats(inputs.values().flatten())
        } else {
            None
        };

        if overlaps.is_empty() {
            tracing::info!("No data leakage in '{}'", self.split_dir.display());
        }

        Ok(LeakageReport { files, unique, overlaps, variations })
    }
}

fn split_counts(count: impl Fn(SplitName) -> usize) -> SplitCounts {
    SplitCounts {
        train: count(SplitName::Train),
        val:   count(SplitName::Val),
        test:  count(SplitName::Test),
    }
}

fn sample_names(paths: &[String]) -> BTreeSet<String> {
    paths.iter().map(|p| sample_id_from_path(p).to_string()).collect()
}

fn files_of(paths: &[String], sample: &str) -> Vec<String> {
    paths
        .iter()
        .filter(|p| sample_id_from_path(p) == sample)
        .take(MAX_FILES_PER_SIDE)
        .cloned()
        .collect()
}

/// Min / max / mean number of lines per sample name.
/// `None` when there are no lines at all.
fn variation_stats<'a>(paths: impl Iterator<Item = &'a String>) -> Option<VariationStats> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for path in paths {
        *counts.entry(sample_id_from_path(path)).or_default() += 1;
    }

    let min   = *counts.values().min()?;
    let max   = *counts.values().max()?;
    let total: usize = counts.values().sum();

    Some(VariationStats {
        min,
        max,
        avg: total as f64 / counts.len() as f64,
    })
}
