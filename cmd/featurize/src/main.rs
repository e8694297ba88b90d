//! featurize - Batch feature extraction for labelled emotion recordings.
//!
//! Walks a dataset directory for WAV files, derives a coarse mood label from
//! each file name, extracts the averaged MFCC vector and writes the whole
//! set as a JSON dataset ready for classifier training.

mod labels;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::warn;

use moodkit_audio::load_wav;
use moodkit_classifier::{AveragedConfig, extract_averaged_features};

/// Batch feature extraction for labelled emotion recordings.
#[derive(Parser, Debug)]
#[command(name = "featurize")]
#[command(about = "Extract averaged MFCC features from labelled WAV datasets")]
struct Args {
    /// Dataset directory, scanned recursively for .wav files
    #[arg(short, long)]
    data_dir: PathBuf,

    /// Output JSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Target sample rate in Hz
    #[arg(long, default_value_t = 22050)]
    sample_rate: usize,

    /// Coefficients per feature vector
    #[arg(long, default_value_t = 40)]
    n_mfcc: usize,

    /// Custom label mapping file (JSON or YAML)
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Skip files whose name matches no labelling convention
    /// instead of labelling them neutral
    #[arg(long)]
    skip_unlabelled: bool,

    /// Quiet mode (less output)
    #[arg(short, long)]
    quiet: bool,
}

/// One featurized recording.
#[derive(Debug, Serialize)]
struct Entry {
    path: String,
    label: String,
    features: Vec<f32>,
}

/// The dataset written to the output file.
#[derive(Debug, Serialize)]
struct Dataset {
    sample_rate: usize,
    n_mfcc: usize,
    entries: Vec<Entry>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();
    let mapping = labels::load_mapping(args.mapping.as_deref())?;
    let cfg = AveragedConfig {
        sample_rate: args.sample_rate,
        n_mfcc: args.n_mfcc,
        ..AveragedConfig::default()
    };

    let mut files = wav_files(&args.data_dir)?;
    files.sort();
    if files.is_empty() {
        anyhow::bail!("no .wav files found under {}", args.data_dir.display());
    }

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for path in &files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let label = match labels::derive_label(stem, &mapping) {
            Some(label) => label,
            None if args.skip_unlabelled => {
                warn!(path = %path.display(), "no label convention matched, skipping");
                skipped += 1;
                continue;
            }
            None => "neutral".to_string(),
        };

        let features = match featurize(path, args.sample_rate, &cfg) {
            Ok(features) => features,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "featurization failed, skipping");
                skipped += 1;
                continue;
            }
        };

        *counts.entry(label.clone()).or_default() += 1;
        entries.push(Entry {
            path: path.display().to_string(),
            label,
            features,
        });
    }

    if entries.is_empty() {
        anyhow::bail!("all {} files failed to featurize", files.len());
    }

    let dataset = Dataset {
        sample_rate: args.sample_rate,
        n_mfcc: args.n_mfcc,
        entries,
    };
    let json = serde_json::to_vec_pretty(&dataset)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if !args.quiet {
        println!(
            "=== Featurized {} of {} files ({} skipped) ===",
            dataset.entries.len(),
            files.len(),
            skipped
        );
        for (label, count) in &counts {
            println!("  {:<8} {}", label, count);
        }
        println!("\nDataset saved to {}", args.output.display());
    }

    Ok(())
}

/// Extracts the averaged feature vector for a single recording.
fn featurize(path: &Path, sample_rate: usize, cfg: &AveragedConfig) -> Result<Vec<f32>> {
    let signal = load_wav(path, sample_rate)?;
    let features = extract_averaged_features(&signal, cfg)?;
    Ok(features)
}

/// Recursively collects .wav files under a directory.
fn wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    fn walk(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("reading directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                walk(&path, paths)?;
            } else if path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
            {
                paths.push(path);
            }
        }
        Ok(())
    }

    walk(dir, &mut paths)?;
    Ok(paths)
}
