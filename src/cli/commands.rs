// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `prepare`, `normals`, `verify`
// and all their configurable flags.
//
// clap's derive macros generate help text, usage errors for
// missing required flags (exit code 2), and type conversion.

use clap::{Args, Subcommand};

use crate::application::normals_use_case::NormalsConfig;
use crate::application::prepare_use_case::PrepareConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match RGB inputs with .npy normal targets and write split files
    Prepare(PrepareArgs),

    /// Convert PNG normal maps to unit-normal .npy arrays, then write split files
    Normals(NormalsArgs),

    /// Check split files for sample names shared between splits
    Verify(VerifyArgs),
}

/// Flags shared by every command that writes a split.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Directory to write train/val[/test]/vis .txt files into.
    /// Absolute, or relative to the working directory.
    #[arg(long, default_value = "data_split/custom_normals")]
    pub output_split_dir: String,

    /// Fraction of samples (not pairs) for validation, in [0, 1)
    #[arg(long, default_value_t = 0.1)]
    pub val_ratio: f64,

    /// Fraction of samples for test, in [0, 1); 0 writes no test.txt
    #[arg(long, default_value_t = 0.0)]
    pub test_ratio: f64,

    /// Seed for the sample shuffle and the visualisation draw
    #[arg(long, default_value_t = 2024)]
    pub seed: u64,

    /// Comma-separated RGB input extensions
    #[arg(long, default_value = ".png,.jpg,.jpeg,.bmp")]
    pub rgb_exts: String,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Root directory containing the input and target subdirectories
    #[arg(long)]
    pub dataset_root: String,

    #[arg(long, default_value = "input")]
    pub input_subdir: String,

    /// Subdirectory of precomputed normal arrays
    #[arg(long, default_value = "target_npy")]
    pub target_subdir: String,

    /// Comma-separated normal target extensions
    #[arg(long, default_value = ".npy")]
    pub normal_exts: String,

    #[command(flatten)]
    pub split: SplitArgs,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            dataset_root:     a.dataset_root,
            input_subdir:     a.input_subdir,
            target_subdir:    a.target_subdir,
            output_split_dir: a.split.output_split_dir,
            val_ratio:        a.split.val_ratio,
            test_ratio:       a.split.test_ratio,
            seed:             a.split.seed,
            rgb_exts:         a.split.rgb_exts,
            normal_exts:      a.normal_exts,
        }
    }
}

#[derive(Args, Debug)]
pub struct NormalsArgs {
    /// Root directory containing the input and target subdirectories
    #[arg(long)]
    pub dataset_root: String,

    #[arg(long, default_value = "input")]
    pub input_subdir: String,

    /// Subdirectory of 8-bit RGB normal-map images
    #[arg(long, default_value = "target")]
    pub target_subdir: String,

    /// Subdirectory (under dataset_root) for the converted .npy arrays
    #[arg(long, default_value = "target_npy")]
    pub npy_subdir: String,

    /// Comma-separated normal-map image extensions
    #[arg(long, default_value = ".png")]
    pub normal_exts: String,

    #[command(flatten)]
    pub split: SplitArgs,
}

impl From<NormalsArgs> for NormalsConfig {
    fn from(a: NormalsArgs) -> Self {
        NormalsConfig {
            dataset_root:     a.dataset_root,
            input_subdir:     a.input_subdir,
            target_subdir:    a.target_subdir,
            npy_subdir:       a.npy_subdir,
            output_split_dir: a.split.output_split_dir,
            val_ratio:        a.split.val_ratio,
            test_ratio:       a.split.test_ratio,
            seed:             a.split.seed,
            rgb_exts:         a.split.rgb_exts,
            normal_exts:      a.normal_exts,
        }
    }
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Directory containing train.txt, val.txt and optionally test.txt
    #[arg(long)]
    pub split_dir: String,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}
