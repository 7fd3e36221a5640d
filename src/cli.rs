//! Command-line entry points.
//!
//! Two subcommands mirror the two interpolation targets: `objects` steps
//! every object transform in the scene, `lookat` steps only the camera's
//! look-at entry. Both read one scene file and write one numbered output
//! file per interpolation step.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use log::{debug, info};

use crate::job::{RunMetadata, StepJobSpec};
use crate::output;
use crate::steps::Offset;
use crate::walk::{StepSequence, Target};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate every object transform in the scene
    Objects {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Interpolate the camera's look-at target
    Lookat {
        #[command(flatten)]
        opts: RunOpts,
    },
}

#[derive(Args)]
struct RunOpts {
    /// Source scene JSON file
    #[arg(long)]
    scene: PathBuf,

    /// Maximum magnitude change per step
    #[arg(long)]
    offset: f64,

    /// Output directory for step files (defaults to the scene's directory)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Keep the source scene file after a successful run
    #[arg(long)]
    keep_original: bool,

    /// Write a metadata JSON alongside the step files
    #[arg(long)]
    metadata: bool,
}

impl RunOpts {
    fn into_spec(self, target: Target) -> StepJobSpec {
        StepJobSpec {
            scene_path: self.scene,
            offset: self.offset,
            target,
            output_dir: self.out,
            keep_original: self.keep_original,
            write_metadata: self.metadata,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Objects { opts } => run_job(opts.into_spec(Target::ObjectTransforms)),
        Commands::Lookat { opts } => run_job(opts.into_spec(Target::CameraLookat)),
    }
}

fn run_job(spec: StepJobSpec) -> Result<()> {
    spec.validate().map_err(|e| anyhow!(e))?;
    let started_at = Utc::now();

    let contents = fs::read_to_string(&spec.scene_path)
        .with_context(|| format!("Failed to read scene file {:?}", spec.scene_path))?;
    let scene: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse scene file {:?}", spec.scene_path))?;

    let offset = Offset::new(spec.offset)?;
    let sequence = StepSequence::new(scene, offset, spec.target)?;
    let total = sequence.max_steps();
    debug!(
        "{:?} needs {} steps at offset {}",
        spec.target,
        total,
        offset.value()
    );

    if total == 0 {
        println!("Nothing to do: all targeted parameters are already at zero.");
        return Ok(());
    }

    let out_dir = spec.effective_output_dir();
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    println!("Writing {} steps to {}...", total, out_dir.display());

    for produced in sequence {
        let path = output::step_path(&spec.scene_path, &out_dir, produced.step);
        output::write_scene(&path, &produced)
            .with_context(|| format!("Failed to write step file {:?}", path))?;
        println!("Generated: {}", path.display());
    }

    if spec.write_metadata {
        let metadata = RunMetadata {
            job: spec.clone(),
            started_at,
            completed_at: Utc::now(),
            step_count: total,
            scene_hash: RunMetadata::hash_file(&spec.scene_path)?,
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let path = output::metadata_path(&spec.scene_path, &out_dir);
        metadata.save(&path).map_err(|e| anyhow!(e))?;
        info!("Wrote run metadata to {:?}", path);
    }

    // The source is only disposed of once every step file is on disk.
    if !spec.keep_original {
        fs::remove_file(&spec.scene_path).with_context(|| {
            format!("Failed to remove original scene file {:?}", spec.scene_path)
        })?;
        println!("Original file {} removed.", spec.scene_path.display());
    }

    Ok(())
}
