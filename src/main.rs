use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use axialsync::config::{BoundaryRule, BracketPolicy, DuplicatePolicy, SamplingFrequency};
use axialsync::output::{DatasetOutput, OutputFormat, create_formatter};
use axialsync::{DatasetManifest, SyncPipeline};

#[derive(Parser, Debug)]
#[command(name = "axialsync")]
#[command(about = "Synchronize needle insertion recordings onto one uniform time base", long_about = None)]
struct Args {
    /// Dataset manifests (.toml or .json)
    #[arg(required = true)]
    manifests: Vec<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Override the manifest's sampling frequency (e.g., "100", "250hz", "4ms")
    #[arg(long)]
    frequency: Option<SamplingFrequency>,

    /// Policy for grid points landing on a sample: snap, strict
    #[arg(long, value_enum)]
    bracket: Option<BracketPolicy>,

    /// Velocity boundary rule: zero-neighbour, one-sided
    #[arg(long, value_enum)]
    boundary: Option<BoundaryRule>,

    /// Policy for quantities supplied twice: last-wins, reject
    #[arg(long, value_enum)]
    duplicates: Option<DuplicatePolicy>,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let formatter = create_formatter(args.format, args.verbose > 0);

    let mut rendered = Vec::new();
    let mut failures = 0;

    for path in &args.manifests {
        match process_manifest(path, &args) {
            Ok((name, hz, dataset)) => {
                let output = DatasetOutput {
                    name: &name,
                    sampling_frequency_hz: hz,
                    dataset: &dataset,
                };
                rendered.push(formatter.format(&output)?);
            }
            Err(e) => {
                failures += 1;
                log::error!("{}: {:#}", path.display(), e);
            }
        }
    }

    let text = rendered.join("\n");
    match &args.output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write output")?,
    }

    if failures > 0 {
        anyhow::bail!(
            "{} of {} datasets failed",
            failures,
            args.manifests.len()
        );
    }
    Ok(())
}

fn process_manifest(
    path: &Path,
    args: &Args,
) -> anyhow::Result<(String, f64, axialsync::SynchronizedDataset)> {
    let manifest = DatasetManifest::load(path).context("Failed to load manifest")?;

    let mut config = manifest.config();
    if let Some(frequency) = args.frequency {
        config.resample.sampling_frequency = frequency;
    }
    if let Some(policy) = args.bracket {
        config.resample.bracket_policy = policy;
    }
    if let Some(rule) = args.boundary {
        config.derivation.boundary_rule = rule;
    }
    if let Some(policy) = args.duplicates {
        config.bind.duplicate_policy = policy;
    }

    let descriptors = manifest.descriptors()?;
    let pipeline = SyncPipeline::new(&config);
    let dataset = pipeline
        .run(&descriptors, &manifest.source())
        .with_context(|| format!("Failed to synchronize {}", manifest.display_name()))?;

    Ok((
        manifest.display_name(),
        config.resample.sampling_frequency.as_hz(),
        dataset,
    ))
}
