// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Builds the data split for an existing paired dataset:
//
//   Step 1: Check input/target directories exist  (Layer 4 - data)
//   Step 2: Validate val/test ratios              (Layer 3 - domain)
//   Step 3: Scan and match pairs by stem          (Layer 4 - data)
//   Step 4: Split by sample name with the seed    (Layer 4 - data)
//   Step 5: Write train/val/test/vis files        (Layer 6 - infra)
//
// Any failure before step 5 leaves the output directory untouched.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::scanner::{parse_extensions, DatasetScanner};
use crate::data::splitter::{seeded_rng, split_by_sample};
use crate::domain::split::SplitRatios;
use crate::domain::traits::{PairSource, SplitSink};
use crate::infra::report::SplitSummary;
use crate::infra::split_files::SplitFileWriter;

// ─── Prepare Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub dataset_root:     String,
    pub input_subdir:     String,
    pub target_subdir:    String,
    pub output_split_dir: String,
    pub val_ratio:        f64,
    pub test_ratio:       f64,
    pub seed:             u64,
    pub rgb_exts:         String,
    pub normal_exts:      String,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            dataset_root:     ".".to_string(),
            input_subdir:     "input".to_string(),
            target_subdir:    "target_npy".to_string(),
            output_split_dir: "data_split/custom_normals".to_string(),
            val_ratio:        0.1,
            test_ratio:       0.0,
            seed:             2024,
            rgb_exts:         ".png,.jpg,.jpeg,.bmp".to_string(),
            normal_exts:      ".npy".to_string(),
        }
    }
}

impl PrepareConfig {
    pub fn ratios(&self) -> Result<SplitRatios> {
        Ok(SplitRatios::new(self.val_ratio, self.test_ratio)?)
    }

    pub fn scanner(&self) -> Result<DatasetScanner> {
        Ok(DatasetScanner::new(
            absolute(Path::new(&self.dataset_root))?,
            &self.input_subdir,
            &self.target_subdir,
            parse_extensions(&self.rgb_exts),
            parse_extensions(&self.normal_exts),
        ))
    }
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitSummary> {
        let cfg = &self.config;

        let scanner = cfg.scanner()?;
        scanner.check_dirs()?;
        let ratios = cfg.ratios()?;

        let out_dir = absolute(Path::new(&cfg.output_split_dir))?;
        split_and_write(&scanner, &SplitFileWriter::new(&out_dir), ratios, cfg.seed, out_dir)
    }
}

/// Pull pairs from `source`, split them and hand the result to `sink`.
/// Shared by the prepare and normals commands.
pub fn split_and_write<S, K>(
    source:  &S,
    sink:    &K,
    ratios:  SplitRatios,
    seed:    u64,
    out_dir: PathBuf,
) -> Result<SplitSummary>
where
    S: PairSource,
    K: SplitSink,
{
    let pairs = source.matched_pairs()?;

    // The RNG lives only for this call: shuffle first, then the vis draw
    let mut rng = seeded_rng(seed);
    let splits  = split_by_sample(pairs, ratios, &mut rng)?;

    tracing::info!(
        "Split {} samples / {} pairs (val={}, test={}, seed={}): {} train, {} val, {} test",
        splits.total_samples(),
        splits.total_pairs(),
        ratios.val(),
        ratios.test(),
        seed,
        splits.train_samples.len(),
        splits.val_samples.len(),
        splits.test_samples.len(),
    );

    let written = sink
        .write_splits(&splits)
        .with_context(|| format!("Cannot write split files to '{}'", out_dir.display()))?;
    for path in &written {
        tracing::debug!("Wrote '{}'", path.display());
    }

    Ok(SplitSummary::new(&splits, out_dir))
}

/// Resolve `path` against the working directory without
/// requiring it to exist yet.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Cannot read current directory")?;
    Ok(cwd.join(path))
}
