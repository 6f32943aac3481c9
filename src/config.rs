use crate::analyzer::{AnalyzerParams, SentimentAnalyzer};
use crate::lexicon::Lexicon;
use crate::normalize::{Normalizer, NormalizerConfig};
use crate::SentiError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct SentiConfig {
    #[serde(default)]
    pub normalizer: NormalizerSection,
    #[serde(default)]
    pub classifier: ClassifierSection,
}

#[derive(Debug, Deserialize)]
pub struct NormalizerSection {
    #[serde(default = "default_true")]
    pub strip_urls: bool,
    #[serde(default = "default_true")]
    pub strip_mentions: bool,
    #[serde(default = "default_true")]
    pub strip_hashtag_markers: bool,
    #[serde(default = "default_true")]
    pub strip_stopwords: bool,
    #[serde(default = "default_true")]
    pub expand_contractions: bool,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
    /// Built-in stopwords to keep (e.g. negations).
    #[serde(default)]
    pub keep_stopwords: Vec<String>,
    #[serde(default)]
    pub contractions: HashMap<String, String>,
}

impl Default for NormalizerSection {
    fn default() -> Self {
        Self {
            strip_urls: true,
            strip_mentions: true,
            strip_hashtag_markers: true,
            strip_stopwords: true,
            expand_contractions: true,
            extra_stopwords: Vec::new(),
            keep_stopwords: Vec::new(),
            contractions: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ClassifierSection {
    pub alpha: Option<f64>,
    pub min_df: Option<usize>,
    pub neutral_label: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Load config from an explicit path, the SENTI_CONFIG env var,
/// ~/.senti/config.toml, or defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<SentiConfig, SentiError> {
    if let Some(p) = explicit {
        return read_config(p);
    }
    match config_path() {
        Some(p) if p.exists() => read_config(&p),
        _ => Ok(SentiConfig::default()),
    }
}

fn read_config(path: &Path) -> Result<SentiConfig, SentiError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SentiError::Config(format!("{}: {e}", path.display())))?;
    let config: SentiConfig = toml::from_str(&content)
        .map_err(|e| SentiError::Config(format!("{}: {e}", path.display())))?;
    validate_config(&config)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("SENTI_CONFIG") {
        return Some(PathBuf::from(p));
    }
    let home = std::env::var("HOME").ok()?;
    Some(Path::new(&home).join(".senti").join("config.toml"))
}

fn validate_config(config: &SentiConfig) -> Result<(), SentiError> {
    if let Some(alpha) = config.classifier.alpha
        && !(alpha.is_finite() && alpha > 0.0)
    {
        return Err(SentiError::Config(format!(
            "classifier.alpha must be a positive number, got {alpha}"
        )));
    }
    if config.classifier.min_df == Some(0) {
        return Err(SentiError::Config("classifier.min_df must be at least 1".into()));
    }
    if config
        .classifier
        .neutral_label
        .as_deref()
        .is_some_and(|l| l.trim().is_empty())
    {
        return Err(SentiError::Config("classifier.neutral_label is empty".into()));
    }
    // Only apostrophe forms are matched; a plain-word key would also break
    // idempotent cleaning.
    for (key, value) in &config.normalizer.contractions {
        if !key.contains(['\'', '’']) {
            return Err(SentiError::Config(format!(
                "normalizer.contractions key {key:?} has no apostrophe"
            )));
        }
        if value.trim().is_empty() {
            return Err(SentiError::Config(format!(
                "normalizer.contractions[{key:?}] is empty"
            )));
        }
    }
    Ok(())
}

pub fn resolve_normalizer(config: &SentiConfig) -> Normalizer {
    let section = &config.normalizer;
    let toggles = NormalizerConfig {
        strip_urls: section.strip_urls,
        strip_mentions: section.strip_mentions,
        strip_hashtag_markers: section.strip_hashtag_markers,
        strip_stopwords: section.strip_stopwords,
        expand_contractions: section.expand_contractions,
    };
    let lexicon = Lexicon::with_extras(
        &section.extra_stopwords,
        &section.keep_stopwords,
        &section.contractions,
    );
    Normalizer::new(toggles, lexicon)
}

pub fn resolve_analyzer_params(config: &SentiConfig) -> AnalyzerParams {
    let defaults = AnalyzerParams::default();
    AnalyzerParams {
        alpha: config.classifier.alpha.unwrap_or(defaults.alpha),
        min_df: config.classifier.min_df.unwrap_or(defaults.min_df),
        neutral_label: config
            .classifier
            .neutral_label
            .clone()
            .unwrap_or(defaults.neutral_label),
    }
}

/// Normalizer plus an untrained analyzer sharing its stopword list.
pub fn build_pipeline(config: &SentiConfig) -> (Normalizer, SentimentAnalyzer) {
    let normalizer = resolve_normalizer(config);
    let analyzer = SentimentAnalyzer::new(
        resolve_analyzer_params(config),
        normalizer.lexicon().stopwords().clone(),
    );
    (normalizer, analyzer)
}
