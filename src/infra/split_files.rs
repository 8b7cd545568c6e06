// ============================================================
// Layer 6 — Split Files
// ============================================================
// Split directory layout:
//
//   data_split/custom_normals/
//     train.txt   ← always written
//     val.txt     ← always written (may be empty)
//     test.txt    ← only when the test split is non-empty
//     vis.txt     ← only when the vis subset is non-empty
//
// Line format, fields separated by a single space:
//
//   input/3192_010.png target_npy/3192_010.npy

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::pair::PairRecord;
use crate::domain::split::{DatasetSplits, SplitName};
use crate::domain::traits::SplitSink;
use crate::error::PrepResult;

/// File name of the visualisation subset
pub const VIS_FILE: &str = "vis.txt";

/// Write `pairs` to `path`, one per line, creating parent dirs.
pub fn write_split_file(pairs: &[PairRecord], path: &Path) -> PrepResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    for pair in pairs {
        writeln!(out, "{}", pair.to_line())?;
    }
    out.flush()?;

    tracing::debug!("Wrote {} pairs to '{}'", pairs.len(), path.display());
    Ok(())
}

/// Read the input paths (first field of each line) of a split file.
/// A missing file reads as empty; blank lines are skipped.
pub fn read_split_file(path: &Path) -> PrepResult<Vec<String>> {
    if !path.exists() {
        tracing::debug!("Split file '{}' not found — treating as empty", path.display());
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut inputs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(first) = line.split_whitespace().next() {
            inputs.push(first.to_string());
        }
    }
    Ok(inputs)
}

/// Writes a `DatasetSplits` into a split directory.
pub struct SplitFileWriter {
    dir: PathBuf,
}

impl SplitFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SplitSink for SplitFileWriter {
    fn write_splits(&self, splits: &DatasetSplits) -> PrepResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        for split in SplitName::ALL {
            let pairs = splits.pairs(split);
            // train and val are always written, test only if non-empty
            if split == SplitName::Test && pairs.is_empty() {
                continue;
            }
            let path = self.dir.join(split.file_name());
            write_split_file(pairs, &path)?;
            written.push(path);
        }

        if !splits.vis.is_empty() {
            let path = self.dir.join(VIS_FILE);
            write_split_file(&splits.vis, &path)?;
            written.push(path);
        }

        Ok(written)
    }
}
