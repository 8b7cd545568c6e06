// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case in Layer 2. This is the only layer that prints
// results to stdout.
//
//   1. `prepare` — split an already-converted dataset
//   2. `normals` — convert PNG normal maps, then split
//   3. `verify`  — check split files for leakage

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, NormalsArgs, PrepareArgs, VerifyArgs};

use crate::error::PrepError;

#[derive(Parser, Debug)]
#[command(
    name = "normals-prep",
    version,
    about = "Prepare paired RGB / surface-normal datasets with leakage-free train/val/test splits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Normals(args) => run_normals(args),
            Commands::Verify(args)  => run_verify(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    tracing::info!("Preparing splits for dataset at: {}", args.dataset_root);
    let summary = PrepareUseCase::new(args.into()).execute()?;

    println!("\nDone!");
    println!("{summary}");
    Ok(())
}

fn run_normals(args: NormalsArgs) -> Result<()> {
    use crate::application::normals_use_case::NormalsUseCase;

    tracing::info!("Converting normal maps for dataset at: {}", args.dataset_root);
    let (conversion, summary) = NormalsUseCase::new(args.into()).execute()?;

    println!("\nDone!");
    println!("{conversion}");
    println!("{summary}");
    Ok(())
}

fn run_verify(args: VerifyArgs) -> Result<()> {
    use crate::application::verify_use_case::VerifyUseCase;

    let report = VerifyUseCase::new(&args.split_dir).execute()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if report.has_leakage() {
        return Err(PrepError::Leakage { overlaps: report.overlaps.len() }.into());
    }
    Ok(())
}
