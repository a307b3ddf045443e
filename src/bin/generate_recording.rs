use anyhow::{Context, Result};
use axialsync::Quantity;
use axialsync::simulation::{InsertionProfile, RecordingConfig, pairs_to_text, record_channel};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_recording")]
#[command(about = "Generate synthetic needle insertion recordings with a dataset manifest")]
struct Args {
    /// TOML insertion profile file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Nominal sensor rate in Hz
    #[arg(long, default_value_t = 100.0)]
    rate: f32,

    /// Recording length in seconds
    #[arg(short, long, default_value_t = 5.0)]
    duration: f32,

    /// Per-channel durations overriding --duration (e.g., "force_x=4.6,rotation_x=4.8")
    #[arg(long)]
    durations: Option<String>,

    /// Sample time jitter as a fraction of the nominal interval
    #[arg(long, default_value_t = 0.3)]
    jitter: f32,

    /// Standard deviation of measurement noise
    #[arg(long, default_value_t = 0.0)]
    noise: f32,

    /// Write rows in random order
    #[arg(long)]
    shuffle: bool,

    /// Record against displacement and declare velocity constant
    #[arg(long)]
    constant_velocity: bool,

    /// Sampling frequency written to the manifest
    #[arg(long, default_value = "100hz")]
    sampling_frequency: String,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    profile: InsertionProfile,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    quantity: Quantity,
    dependence: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    constant: Option<f32>,
}

#[derive(Debug, serde::Serialize)]
struct LoaderSection {
    has_header: bool,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    name: String,
    sampling_frequency: String,
    loader: LoaderSection,
    measurement: Vec<ManifestEntry>,
}

fn parse_durations(s: &str) -> Result<Vec<(Quantity, f32)>> {
    s.split(',')
        .map(|part| -> Result<(Quantity, f32)> {
            let (name, value) = part
                .split_once('=')
                .context("Invalid duration format. Use 'quantity=seconds'")?;
            let quantity: Quantity = name
                .trim()
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let seconds: f32 = value.trim().parse().context("Invalid duration value")?;
            Ok((quantity, seconds))
        })
        .collect()
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    let args = Args::parse();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let toml_config = match &args.config {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };
    let profile = toml_config.profile;

    let overrides = match &args.durations {
        Some(s) => parse_durations(s)?,
        None => Vec::new(),
    };
    let duration_of = |quantity: Quantity| {
        overrides
            .iter()
            .rev()
            .find(|(q, _)| *q == quantity)
            .map_or(args.duration, |(_, d)| *d)
    };

    let (independent, recorded): (Quantity, &[Quantity]) = if args.constant_velocity {
        (
            Quantity::DisplacementX,
            &[Quantity::ForceX, Quantity::RotationX][..],
        )
    } else {
        (
            Quantity::Time,
            &[Quantity::DisplacementX, Quantity::ForceX, Quantity::RotationX][..],
        )
    };

    let base_seed = args.seed.unwrap_or(0);
    let mut entries = Vec::new();

    for (i, &quantity) in recorded.iter().enumerate() {
        let config = RecordingConfig::default()
            .with_seed(base_seed + i as u64)
            .with_rate(args.rate)
            .with_duration(duration_of(quantity))
            .with_jitter(args.jitter)
            .with_noise(args.noise);
        let config = if args.shuffle {
            config.shuffled()
        } else {
            config
        };

        let mut pairs = record_channel(&profile, quantity, &config);
        if independent == Quantity::DisplacementX {
            for pair in &mut pairs {
                pair.0 = profile.displacement(pair.0);
            }
        }

        let filename = format!("{}.csv", quantity.column());
        let mut text = format!("{},{}\n", independent.column(), quantity.column());
        text.push_str(&pairs_to_text(&pairs));
        fs::write(args.output_dir.join(&filename), text)
            .with_context(|| format!("Failed to write {}", filename))?;

        eprintln!("{}: {} samples", filename, pairs.len());
        entries.push(ManifestEntry {
            quantity,
            dependence: independent,
            file: Some(filename),
            constant: None,
        });
    }

    if args.constant_velocity {
        entries.push(ManifestEntry {
            quantity: Quantity::VelocityX,
            dependence: Quantity::Time,
            file: None,
            constant: Some(profile.velocity),
        });
    }

    let manifest = Manifest {
        name: args
            .output_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "synthetic".to_string()),
        sampling_frequency: args.sampling_frequency.clone(),
        loader: LoaderSection { has_header: true },
        measurement: entries,
    };
    let manifest_path = args.output_dir.join("manifest.toml");
    let manifest_toml = toml::to_string(&manifest).context("Failed to serialize manifest")?;
    fs::write(&manifest_path, manifest_toml).context("Failed to write manifest")?;

    eprintln!("Manifest written to: {}", manifest_path.display());
    Ok(())
}
