//! Labelled corpora and raw input streams.
//!
//! A corpus is JSON Lines, one `{"text": ..., "label": ...}` object per
//! line. Blank lines are skipped.

use crate::SentiError;
use serde::Deserialize;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Record {
    text: String,
    label: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Corpus {
    pub texts: Vec<String>,
    pub labels: Vec<String>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

pub fn read_corpus<R: BufRead>(reader: R, source: &str) -> Result<Corpus, SentiError> {
    let mut corpus = Corpus::default();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line).map_err(|e| {
            SentiError::InvalidInput(format!("{source}:{}: {e}", lineno + 1))
        })?;
        corpus.texts.push(record.text);
        corpus.labels.push(record.label);
    }
    Ok(corpus)
}

pub fn load_corpus(path: &Path) -> Result<Corpus, SentiError> {
    let file = std::fs::File::open(path)?;
    let corpus = read_corpus(std::io::BufReader::new(file), &path.display().to_string())?;
    log::debug!("loaded {} records from {}", corpus.len(), path.display());
    Ok(corpus)
}

/// Command-line texts if any were given, otherwise one text per stdin line.
pub fn collect_inputs(args: &[String]) -> Result<Vec<String>, SentiError> {
    if !args.is_empty() {
        return Ok(args.to_vec());
    }
    let stdin = std::io::stdin();
    let lines = stdin.lock().lines().collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}
