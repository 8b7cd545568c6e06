// ============================================================
// Layer 2 — NormalsUseCase
// ============================================================
// Prepares a dataset whose targets are 8-bit normal-map images:
//
//   Step 1: Check directories and ratios
//   Step 2: Convert every target image to a unit-normal .npy
//           under <root>/<npy_subdir>, mirroring the tree
//   Step 3: Split input images against the converted arrays
//           (same flow as PrepareUseCase)
//
// A target that fails to decode or write is skipped with a
// warning; the split only sees the files that converted.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::application::prepare_use_case::{absolute, split_and_write};
use crate::data::normal_map::load_normal_map;
use crate::data::scanner::{build_stem_map, list_files, match_pairs, parse_extensions, DatasetScanner};
use crate::domain::pair::strip_extension;
use crate::domain::split::SplitRatios;
use crate::error::PrepError;
use crate::infra::npy_store::NpyStore;
use crate::infra::report::{ConversionSummary, SplitSummary};
use crate::infra::split_files::SplitFileWriter;

// ─── Normals Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalsConfig {
    pub dataset_root:     String,
    pub input_subdir:     String,
    /// Directory of 8-bit normal-map images
    pub target_subdir:    String,
    /// Where converted .npy arrays are written, under dataset_root
    pub npy_subdir:       String,
    pub output_split_dir: String,
    pub val_ratio:        f64,
    pub test_ratio:       f64,
    pub seed:             u64,
    pub rgb_exts:         String,
    pub normal_exts:      String,
}

impl Default for NormalsConfig {
    fn default() -> Self {
        Self {
            dataset_root:     ".".to_string(),
            input_subdir:     "input".to_string(),
            target_subdir:    "target".to_string(),
            npy_subdir:       "target_npy".to_string(),
            output_split_dir: "data_split/custom_normals".to_string(),
            val_ratio:        0.1,
            test_ratio:       0.0,
            seed:             2024,
            rgb_exts:         ".png,.jpg,.jpeg,.bmp".to_string(),
            normal_exts:      ".png".to_string(),
        }
    }
}

// ─── NormalsUseCase ───────────────────────────────────────────────────────────
pub struct NormalsUseCase {
    config: NormalsConfig,
}

impl NormalsUseCase {
    pub fn new(config: NormalsConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<(ConversionSummary, SplitSummary)> {
        let cfg  = &self.config;
        let root = absolute(Path::new(&cfg.dataset_root))?;

        // ── Step 1: Validate before doing any expensive work ──────────────────
        let source = DatasetScanner::new(
            &root,
            &cfg.input_subdir,
            &cfg.target_subdir,
            parse_extensions(&cfg.rgb_exts),
            parse_extensions(&cfg.normal_exts),
        );
        source.check_dirs()?;
        let ratios = SplitRatios::new(cfg.val_ratio, cfg.test_ratio)?;

        // ── Step 2: Convert normal maps ───────────────────────────────────────
        let store = NpyStore::new(root.join(&cfg.npy_subdir));
        fs::create_dir_all(store.dir())
            .with_context(|| format!("Cannot create '{}'", store.dir().display()))?;
        let (conversion, converted) =
            convert_tree(&source.target_dir(), &parse_extensions(&cfg.normal_exts), &store);
        tracing::info!("{}", conversion);

        // ── Step 3: Split against the arrays converted in this run ───────────
        // Stale .npy files from earlier runs never enter the split
        let input_files = list_files(&source.input_dir(), &parse_extensions(&cfg.rgb_exts));
        let pairs = match_pairs(
            &cfg.input_subdir,
            &build_stem_map(&input_files),
            &cfg.npy_subdir,
            &build_stem_map(&converted),
        );
        tracing::info!("Matched {} pairs against converted normals", pairs.len());

        let out_dir = absolute(Path::new(&cfg.output_split_dir))?;
        let summary = split_and_write(&pairs, &SplitFileWriter::new(&out_dir), ratios, cfg.seed, out_dir)?;

        Ok((conversion, summary))
    }
}

/// Convert every image under `src_dir` matching `exts` into `store`.
/// Per-file failures are logged and counted, never returned.
///
/// Also returns the `.npy` paths (relative to the store) written
/// by this call, sorted.
pub fn convert_tree(src_dir: &Path, exts: &[String], store: &NpyStore) -> (ConversionSummary, Vec<String>) {
    let files = list_files(src_dir, exts);

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_message("Converting normals");

    let mut summary = ConversionSummary {
        output_dir: store.dir().to_path_buf(),
        ..Default::default()
    };
    let mut converted = Vec::new();

    for rel in &files {
        match convert_one(src_dir, rel, store) {
            Ok(()) => {
                summary.converted += 1;
                converted.push(npy_rel_path(rel));
            }
            Err(e) => {
                tracing::warn!("Skipping '{}': {}", rel, e);
                summary.skipped += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    converted.sort();
    converted.dedup();
    (summary, converted)
}

fn npy_rel_path(rel: &str) -> String {
    format!("{}.npy", strip_extension(rel))
}

fn convert_one(src_dir: &Path, rel: &str, store: &NpyStore) -> Result<(), PrepError> {
    let normals = load_normal_map(&src_dir.join(rel))?;
    let path    = store.save(rel, &normals)?;
    tracing::debug!("Converted '{}' -> '{}'", rel, path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use ndarray::Array3;
    use std::fs;

    fn write_png(path: &Path, rgb: [u8; 3]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(2, 2, Rgb(rgb)).save(path).unwrap();
    }

    #[test]
    fn test_convert_tree_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("target");
        write_png(&src.join("a_1.png"), [128, 128, 255]);
        write_png(&src.join("sub/b_1.png"), [255, 128, 128]);
        fs::write(src.join("broken.png"), b"garbage").unwrap();

        let store   = NpyStore::new(dir.path().join("target_npy"));
        let (summary, converted) = convert_tree(&src, &[".png".to_string()], &store);

        assert_eq!(converted, vec!["a_1.npy", "sub/b_1.npy"]);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.skipped, 1);
        assert!(dir.path().join("target_npy/sub/b_1.npy").exists());
        assert!(!dir.path().join("target_npy/broken.npy").exists());

        let arr: Array3<f32> = ndarray_npy::read_npy(dir.path().join("target_npy/a_1.npy")).unwrap();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert!(arr[[0, 0, 2]] > 0.999);
    }

    #[test]
    fn test_normals_end_to_end() {
        let dir  = tempfile::tempdir().unwrap();
        let root = dir.path();
        for stem in ["a_1", "a_2", "b_1", "c_1"] {
            write_png(&root.join(format!("input/{stem}.png")), [10, 20, 30]);
            write_png(&root.join(format!("target/{stem}.png")), [128, 128, 255]);
        }
        // A corrupt target is skipped and its pair never appears
        write_png(&root.join("input/d_1.png"), [10, 20, 30]);
        fs::write(root.join("target/d_1.png"), b"garbage").unwrap();

        let cfg = NormalsConfig {
            dataset_root:     root.display().to_string(),
            output_split_dir: root.join("split").display().to_string(),
            val_ratio:        0.5,
            ..Default::default()
        };
        let (conversion, summary) = NormalsUseCase::new(cfg).execute().unwrap();

        assert_eq!(conversion.converted, 4);
        assert_eq!(conversion.skipped, 1);
        assert_eq!(summary.samples.total(), 3);
        assert_eq!(summary.pairs.total(), 4);

        let all = fs::read_to_string(root.join("split/train.txt")).unwrap()
            + &fs::read_to_string(root.join("split/val.txt")).unwrap();
        assert!(all.contains("input/a_1.png target_npy/a_1.npy"));
        assert!(!all.contains("d_1"));
    }

    #[test]
    fn test_nothing_converted_is_empty_input() {
        let dir  = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_png(&root.join("input/a_1.png"), [10, 20, 30]);
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("target/a_1.png"), b"garbage").unwrap();

        let cfg = NormalsConfig {
            dataset_root:     root.display().to_string(),
            output_split_dir: root.join("split").display().to_string(),
            ..Default::default()
        };
        let err = NormalsUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<PrepError>(), Some(PrepError::EmptyInput)));
        assert!(!root.join("split").exists());
    }

    #[test]
    fn test_stale_arrays_are_not_paired() {
        let dir  = tempfile::tempdir().unwrap();
        let root = dir.path();
        for stem in ["a_1", "b_1"] {
            write_png(&root.join(format!("input/{stem}.png")), [10, 20, 30]);
        }
        write_png(&root.join("target/a_1.png"), [128, 128, 255]);
        fs::write(root.join("target/b_1.png"), b"garbage").unwrap();
        // Left over from an earlier run
        fs::create_dir_all(root.join("target_npy")).unwrap();
        fs::write(root.join("target_npy/b_1.npy"), b"old").unwrap();

        let cfg = NormalsConfig {
            dataset_root:     root.display().to_string(),
            output_split_dir: root.join("split").display().to_string(),
            val_ratio:        0.0,
            ..Default::default()
        };
        let (_, summary) = NormalsUseCase::new(cfg).execute().unwrap();

        assert_eq!(summary.pairs.total(), 1);
        let train = fs::read_to_string(root.join("split/train.txt")).unwrap();
        assert_eq!(train, "input/a_1.png target_npy/a_1.npy\n");
    }

    #[test]
    fn test_missing_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("input")).unwrap();

        let cfg = NormalsConfig {
            dataset_root: dir.path().display().to_string(),
            ..Default::default()
        };
        let err = NormalsUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::MissingDirectory { role: "Target", .. })
        ));
    }
}
