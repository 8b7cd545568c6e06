// ============================================================
// Layer 4 — Dataset Scanner
// ============================================================
// Finds matching (input, target) files under a dataset root:
//
//   dataset_root/
//     input/scenes/3192_010.png        ← input_subdir
//     target_npy/scenes/3192_010.npy   ← target_subdir
//
// Both trees are walked recursively with walkdir and filtered
// by lowercase extension. Each file is keyed by its *stem*:
// the path relative to its subdirectory, forward slashes, with
// the final extension removed (`scenes/3192_010`). Pairs are
// the stems present in both trees.
//
// Every list is sorted before use so the result does not depend
// on the order the filesystem returns directory entries.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::pair::{strip_extension, PairRecord};
use crate::domain::traits::PairSource;
use crate::error::{PrepError, PrepResult};

/// Parse a comma-separated extension list such as `".png, .JPG,,"`.
/// Entries are trimmed and lowercased; empty entries are dropped.
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Recursively list files under `base` whose lowercase file name
/// ends with one of `exts`. Returns paths relative to `base`,
/// forward-slash separated and sorted.
///
/// Symlinked directories are not descended into. Symlinks that do
/// not point at a directory (including dangling ones) are listed
/// like regular files. Unreadable entries are skipped with a warning.
pub fn list_files(base: &Path, exts: &[String]) -> Vec<String> {
    let mut collected = Vec::new();

    for entry in WalkDir::new(base) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under '{}': {}", base.display(), e);
                continue;
            }
        };

        let file_type = entry.file_type();
        let listable = file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir());
        if !listable {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !exts.iter().any(|ext| name.ends_with(ext.as_str())) {
            continue;
        }

        // strip_prefix cannot fail for entries yielded under `base`
        if let Ok(rel) = entry.path().strip_prefix(base) {
            collected.push(to_slash_path(rel));
        }
    }

    collected.sort();
    tracing::debug!("Found {} files under '{}'", collected.len(), base.display());
    collected
}

/// Map each file's stem to its relative path.
/// With two files sharing a stem (`a.png`, `a.jpg`) the later one
/// in sorted order wins.
pub fn build_stem_map(rel_paths: &[String]) -> BTreeMap<String, String> {
    rel_paths
        .iter()
        .map(|rel| (strip_extension(rel).to_string(), rel.clone()))
        .collect()
}

/// Intersect two stem maps and build pair records, prefixing
/// each relative path with its subdirectory name.
pub fn match_pairs(
    input_subdir:  &str,
    input_map:     &BTreeMap<String, String>,
    target_subdir: &str,
    target_map:    &BTreeMap<String, String>,
) -> Vec<PairRecord> {
    let input_prefix  = normalize_subdir(input_subdir);
    let target_prefix = normalize_subdir(target_subdir);

    // BTreeMap iteration is already in sorted stem order
    input_map
        .iter()
        .filter_map(|(stem, input_rel)| {
            target_map.get(stem).map(|target_rel| {
                PairRecord::new(
                    stem.clone(),
                    join_rel(&input_prefix, input_rel),
                    join_rel(&target_prefix, target_rel),
                )
            })
        })
        .collect()
}

/// Walks `<root>/<input_subdir>` and `<root>/<target_subdir>`
/// and produces every pair whose stems match.
#[derive(Debug, Clone)]
pub struct DatasetScanner {
    root:          PathBuf,
    input_subdir:  String,
    target_subdir: String,
    input_exts:    Vec<String>,
    target_exts:   Vec<String>,
}

impl DatasetScanner {
    pub fn new(
        root:          impl Into<PathBuf>,
        input_subdir:  impl Into<String>,
        target_subdir: impl Into<String>,
        input_exts:    Vec<String>,
        target_exts:   Vec<String>,
    ) -> Self {
        Self {
            root:          root.into(),
            input_subdir:  input_subdir.into(),
            target_subdir: target_subdir.into(),
            input_exts,
            target_exts,
        }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join(&self.input_subdir)
    }

    pub fn target_dir(&self) -> PathBuf {
        self.root.join(&self.target_subdir)
    }

    /// Fail fast if either subdirectory is missing.
    pub fn check_dirs(&self) -> PrepResult<()> {
        for (role, path) in [("Input", self.input_dir()), ("Target", self.target_dir())] {
            if !path.is_dir() {
                return Err(PrepError::MissingDirectory { role, path });
            }
        }
        Ok(())
    }
}

impl PairSource for DatasetScanner {
    fn matched_pairs(&self) -> PrepResult<Vec<PairRecord>> {
        self.check_dirs()?;

        let input_files  = list_files(&self.input_dir(), &self.input_exts);
        let target_files = list_files(&self.target_dir(), &self.target_exts);

        let input_map  = build_stem_map(&input_files);
        let target_map = build_stem_map(&target_files);

        let pairs = match_pairs(&self.input_subdir, &input_map, &self.target_subdir, &target_map);

        tracing::info!(
            "Matched {} pairs ({} input files, {} target files)",
            pairs.len(),
            input_files.len(),
            target_files.len()
        );
        Ok(pairs)
    }
}

/// Join path components with `/` regardless of platform.
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_subdir(subdir: &str) -> String {
    subdir.replace('\\', "/").trim_end_matches('/').to_string()
}

fn join_rel(prefix: &str, rel: &str) -> String {
    if prefix.is_empty() {
        rel.to_string()
    } else {
        format!("{prefix}/{rel}")
    }
}
