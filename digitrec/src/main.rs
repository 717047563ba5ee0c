mod export;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::MultiProgress;
use mnist::{
    DatasetConfig, MnistDataset, Split, SplitKind, StandardizationParams, IMAGE_COLS, IMAGE_ROWS,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(clap::Parser)]
#[command(name = "digitrec", about = "MNIST handwritten digit dataset tools", long_about = None)]
struct Args {
    /// Directory holding the four gzip-compressed archives (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file naming the archive directory and file names
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
#[command(about = "MNIST dataset operations")]
enum Command {
    /// Load all four archives and summarize both splits
    Inspect,
    /// Save the first images of a split as PNG files
    Export {
        /// Split to read images from
        #[arg(long, value_enum, default_value_t = SplitArg::Train)]
        split: SplitArg,
        /// Number of images to save
        #[arg(long, default_value_t = 5)]
        count: usize,
        /// Directory the PNG files are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Compute standardization parameters over the normalized training images
    Stats {
        /// Write the parameters to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SplitArg {
    Train,
    Test,
}

impl From<SplitArg> for SplitKind {
    fn from(split: SplitArg) -> Self {
        match split {
            SplitArg::Train => SplitKind::Train,
            SplitArg::Test => SplitKind::Test,
        }
    }
}

fn dataset_config(args: &Args) -> Result<DatasetConfig> {
    let config = match &args.config {
        Some(path) => DatasetConfig::load(path).context("Failed to load dataset configuration")?,
        None => DatasetConfig::from_env(),
    };
    Ok(match &args.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}

fn describe_split(kind: SplitKind, split: &Split) -> String {
    let mut summary = format!(
        "{kind}: {} images ({} x {IMAGE_ROWS} x {IMAGE_COLS}), {} labels",
        split.len(),
        split.len(),
        split.labels().len()
    );
    if let Some(first) = split.label(0) {
        summary.push_str(&format!(", first label {first}"));
    }
    let counts: Vec<String> = split
        .label_histogram()
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect();
    summary.push_str(&format!("\n  label counts: {}", counts.join("  ")));
    summary
}

fn inspect(config: &DatasetConfig) -> Result<()> {
    println!("Loading MNIST archives from {}...", config.data_dir.display());
    let dataset = MnistDataset::load(config).context("Failed to load MNIST dataset")?;

    for kind in [SplitKind::Train, SplitKind::Test] {
        println!("{}", describe_split(kind, dataset.split(kind)));
    }
    Ok(())
}

fn export(config: &DatasetConfig, kind: SplitKind, count: usize, out_dir: &Path) -> Result<()> {
    let split = Split::load_from_config(config, kind, &MultiProgress::new())
        .with_context(|| format!("Failed to load {kind} split"))?;

    let written = export::export_images(&split, kind, count, out_dir)?;
    println!(
        "\n{} images have been saved as PNG files in {}.",
        written.len(),
        out_dir.display()
    );
    Ok(())
}

fn stats(config: &DatasetConfig, output: Option<&Path>) -> Result<()> {
    let split = Split::load_from_config(config, SplitKind::Train, &MultiProgress::new())
        .context("Failed to load training split")?;

    let features = split.features();
    let params = StandardizationParams::fit(features.view());
    println!(
        "Standardization parameters, mean: {:.4}, std_dev: {:.4}",
        params.mean, params.std_dev
    );

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&params)
            .context("Failed to serialize standardization parameters")?;
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(json.as_bytes())
            .context("Failed to write standardization parameters")?;
        println!("Parameters saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = dataset_config(&args)?;
    log::debug!("dataset configuration: {config:?}");

    match &args.command {
        Command::Inspect => inspect(&config).context("Failed to inspect dataset")?,
        Command::Export {
            split,
            count,
            out_dir,
        } => export(&config, (*split).into(), *count, out_dir)
            .context("Failed to export images")?,
        Command::Stats { output } => {
            stats(&config, output.as_deref()).context("Failed to compute statistics")?
        }
    }

    Ok(())
}
