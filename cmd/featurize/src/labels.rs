//! Mood label derivation from dataset file names.
//!
//! The supported corpora encode the emotion differently:
//! - TESS: last underscore token of the stem (`OAF_back_happy`)
//! - CREMA-D: third underscore field (`1001_DFA_ANG_XX`)
//! - RAVDESS: third dash field (`03-01-06-01-02-01-12`)
//! - SAVEE: letter prefix of the last token (`DC_sa01`)
//!
//! All keys map onto the coarse mood set `happy / sad / angry / fear /
//! neutral`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;

static DEFAULT_MAPPING: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // TESS word suffixes
        ("happy", "happy"),
        ("pleasant_surprise", "happy"),
        ("ps", "happy"),
        ("sad", "sad"),
        ("angry", "angry"),
        ("fear", "fear"),
        ("disgust", "neutral"),
        ("neutral", "neutral"),
        // CREMA-D codes
        ("HAP", "happy"),
        ("ANG", "angry"),
        ("SAD", "sad"),
        ("FEA", "fear"),
        ("NEU", "neutral"),
        ("DIS", "neutral"),
        // RAVDESS emotion field: calm and surprise fold into happy,
        // disgust into neutral
        ("01", "neutral"),
        ("02", "happy"),
        ("03", "happy"),
        ("04", "sad"),
        ("05", "angry"),
        ("06", "fear"),
        ("07", "neutral"),
        ("08", "happy"),
        // SAVEE prefixes
        ("a", "angry"),
        ("d", "neutral"),
        ("f", "fear"),
        ("h", "happy"),
        ("n", "neutral"),
        ("sa", "sad"),
        ("su", "happy"),
    ])
});

/// Mapping from dataset emotion keys to coarse mood labels.
pub type Mapping = HashMap<String, String>;

/// Returns the built-in mapping, or the one from `path` (JSON or YAML).
pub fn load_mapping(path: Option<&Path>) -> Result<Mapping> {
    let Some(path) = path else {
        return Ok(DEFAULT_MAPPING
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect());
    };

    let data = std::fs::read(path)
        .with_context(|| format!("reading mapping file {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let mapping: Mapping = match ext {
        "json" => serde_json::from_slice(&data)?,
        "yaml" | "yml" => serde_yaml::from_slice(&data)?,
        _ => anyhow::bail!("unsupported mapping format: {}", path.display()),
    };
    Ok(mapping)
}

/// Derives a mood label from a file stem, trying each corpus convention.
pub fn derive_label(stem: &str, mapping: &Mapping) -> Option<String> {
    let underscored: Vec<&str> = stem.split('_').collect();

    // CREMA-D: third underscore field.
    if underscored.len() >= 3 {
        if let Some(label) = mapping.get(underscored[2]) {
            return Some(label.clone());
        }
    }

    // RAVDESS: third dash field.
    let dashed: Vec<&str> = stem.split('-').collect();
    if dashed.len() >= 3 {
        if let Some(label) = mapping.get(dashed[2]) {
            return Some(label.clone());
        }
    }

    // TESS: last underscore token, lowercased.
    if let Some(last) = underscored.last() {
        if let Some(label) = mapping.get(last.to_lowercase().as_str()) {
            return Some(label.clone());
        }

        // SAVEE: letter prefix of the last token (sa01 -> sa).
        let prefix: String = last
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        if !prefix.is_empty() {
            if let Some(label) = mapping.get(prefix.as_str()) {
                return Some(label.clone());
            }
        }
    }

    None
}
