//! `predict` and `evaluate` commands: train in-process on a corpus, then
//! classify. Nothing is persisted between runs.

use crate::analyzer::{Prediction, SentimentAnalyzer};
use crate::cli::{EvaluateArgs, PredictArgs};
use crate::config::{SentiConfig, build_pipeline};
use crate::corpus::{collect_inputs, load_corpus};
use crate::normalize::Normalizer;
use crate::SentiError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct PredictOutput<'a> {
    original_text: &'a str,
    cleaned_text: &'a str,
    #[serde(flatten)]
    prediction: &'a Prediction,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    results: &'a [Prediction],
}

#[derive(Debug, Serialize)]
struct EvaluateOutput {
    train_size: usize,
    test_size: usize,
    accuracy: f64,
    /// Per expected label: (correct, total).
    per_label: BTreeMap<String, LabelScore>,
}

#[derive(Debug, Default, Serialize)]
struct LabelScore {
    correct: usize,
    total: usize,
}

/// Train an analyzer on `corpus`, cleaning texts with `normalizer` first.
pub fn train_from_corpus(
    normalizer: &Normalizer,
    analyzer: &SentimentAnalyzer,
    corpus: &Path,
) -> Result<usize, SentiError> {
    let corpus = load_corpus(corpus)?;
    let cleaned = normalizer.clean_batch(&corpus.texts);
    analyzer.train(&cleaned, &corpus.labels)?;
    Ok(corpus.len())
}

pub fn handle_predict(config: &SentiConfig, args: &PredictArgs) -> Result<(), SentiError> {
    let (normalizer, analyzer) = build_pipeline(config);
    train_from_corpus(&normalizer, &analyzer, &args.corpus)?;

    let inputs = collect_inputs(&args.texts)?;
    let cleaned = normalizer.clean_batch(&inputs);
    let mut out = std::io::stdout().lock();

    if args.batch {
        let results = analyzer.predict_batch(&cleaned)?;
        serde_json::to_writer(&mut out, &BatchOutput { results: &results })?;
        writeln!(out)?;
        return Ok(());
    }

    for (original, cleaned) in inputs.iter().zip(&cleaned) {
        let prediction = analyzer.predict(cleaned)?;
        let output = PredictOutput {
            original_text: original,
            cleaned_text: cleaned,
            prediction: &prediction,
        };
        serde_json::to_writer(&mut out, &output)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Overall accuracy and per-label counts from one set of predictions.
fn score(predictions: &[Prediction], labels: &[String]) -> (f64, BTreeMap<String, LabelScore>) {
    let mut per_label: BTreeMap<String, LabelScore> = BTreeMap::new();
    let mut correct = 0;
    for (prediction, expected) in predictions.iter().zip(labels) {
        let score = per_label.entry(expected.clone()).or_default();
        score.total += 1;
        if prediction.label == *expected {
            score.correct += 1;
            correct += 1;
        }
    }
    let accuracy = if labels.is_empty() {
        0.0
    } else {
        correct as f64 / labels.len() as f64
    };
    (accuracy, per_label)
}

pub fn handle_evaluate(config: &SentiConfig, args: &EvaluateArgs) -> Result<(), SentiError> {
    let (normalizer, analyzer) = build_pipeline(config);
    let train_size = train_from_corpus(&normalizer, &analyzer, &args.corpus)?;

    let test = load_corpus(&args.test)?;
    if test.is_empty() {
        return Err(SentiError::InvalidInput(format!(
            "{}: test corpus is empty",
            args.test.display()
        )));
    }
    let cleaned = normalizer.clean_batch(&test.texts);
    let predictions = analyzer.predict_batch(&cleaned)?;
    let (accuracy, per_label) = score(&predictions, &test.labels);

    let output = EvaluateOutput {
        train_size,
        test_size: test.len(),
        accuracy: (accuracy * 1000.0).round() / 1000.0,
        per_label,
    };
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, &output)?;
    writeln!(out)?;
    Ok(())
}
