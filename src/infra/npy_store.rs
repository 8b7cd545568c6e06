// ============================================================
// Layer 6 — NumPy Array Store
// ============================================================
// Saves converted normal fields as .npy files (little-endian
// f32, shape (H, W, 3)) under an output directory, mirroring
// the relative layout of the source images:
//
//   target/scenes/3192_010.png  →  target_npy/scenes/3192_010.npy

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use ndarray::Array3;
use ndarray_npy::WriteNpyExt;

use crate::domain::pair::strip_extension;
use crate::error::{PrepError, PrepResult};

pub struct NpyStore {
    dir: PathBuf,
}

impl NpyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output path for a source file given relative to its tree.
    pub fn path_for(&self, rel: &str) -> PathBuf {
        self.dir.join(format!("{}.npy", strip_extension(rel)))
    }

    /// Write `array` for the source file `rel`, creating parents.
    pub fn save(&self, rel: &str, array: &Array3<f32>) -> PrepResult<PathBuf> {
        let path = self.path_for(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let writer = BufWriter::new(File::create(&path)?);
        array.write_npy(writer).map_err(|e| PrepError::Conversion {
            path:    path.clone(),
            message: e.to_string(),
        })?;

        Ok(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_mirrors_source_layout() {
        let store = NpyStore::new("/data/target_npy");
        assert_eq!(
            store.path_for("scenes/3192_010.png"),
            PathBuf::from("/data/target_npy/scenes/3192_010.npy")
        );
    }

    #[test]
    fn test_save_and_read_back() {
        let dir   = tempfile::tempdir().unwrap();
        let store = NpyStore::new(dir.path().join("out"));

        let mut arr = Array3::<f32>::zeros((2, 3, 3));
        arr[[1, 2, 0]] = 0.5;

        let path = store.save("a/b_1.png", &arr).unwrap();
        assert!(path.ends_with("a/b_1.npy"));

        let back: Array3<f32> = ndarray_npy::read_npy(&path).unwrap();
        assert_eq!(back, arr);
    }
}
