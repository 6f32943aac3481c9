//! Sentiment classifier pipeline: TF-IDF features into multinomial naive
//! Bayes, with an untrained/trained lifecycle.
//!
//! Trained state lives behind one `Arc` that `train` replaces in a single
//! write, so concurrent readers see either the old or the new model, never
//! a mix. Every method takes `&self`.

use crate::bayes::{ClassModel, argmax};
use crate::lexicon::Lexicon;
use crate::vectorize::{SparseRow, TfidfVectorizer};
use crate::SentiError;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

pub const MODEL_TYPE: &str = "Multinomial Naive Bayes + TF-IDF";

/// Label and maximum posterior probability (rounded to 3 decimals).
///
/// `no_signal` marks blank input answered without consulting the model;
/// its confidence is always `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_signal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub status: String,
    pub training_accuracy: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerParams {
    /// Additive smoothing constant.
    pub alpha: f64,
    pub min_df: usize,
    /// Label returned for blank input when it is one of the trained labels.
    pub neutral_label: String,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            min_df: 1,
            neutral_label: "neutral".into(),
        }
    }
}

/// Vocabulary, term weights, class model and training accuracy. Built
/// whole by `train`, never mutated afterwards.
#[derive(Debug)]
struct TrainedPipeline {
    vectorizer: TfidfVectorizer,
    model: ClassModel,
    training_accuracy: f64,
    /// Class index used for blank input.
    no_signal_class: usize,
}

impl TrainedPipeline {
    fn no_signal(&self) -> Prediction {
        Prediction {
            label: self.model.classes()[self.no_signal_class].clone(),
            confidence: 0.0,
            no_signal: true,
        }
    }

    fn classify(&self, text: &str, row: &SparseRow) -> Prediction {
        if text.trim().is_empty() {
            return self.no_signal();
        }
        let (class, prob) = self.model.predict(row);
        Prediction {
            label: self.model.classes()[class].clone(),
            confidence: round3(prob),
            no_signal: false,
        }
    }

    fn classify_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Prediction> {
        let rows = self.vectorizer.transform_batch(texts);
        texts
            .iter()
            .zip(&rows)
            .map(|(text, row)| self.classify(text.as_ref(), row))
            .collect()
    }
}

fn round3(p: f64) -> f64 {
    (p * 1000.0).round() / 1000.0
}

fn validate_pairs(texts: usize, labels: usize) -> Result<(), SentiError> {
    if texts == 0 || labels == 0 {
        return Err(SentiError::InvalidInput(
            "training data or labels cannot be empty".into(),
        ));
    }
    if texts != labels {
        return Err(SentiError::InvalidInput(format!(
            "{texts} texts but {labels} labels"
        )));
    }
    Ok(())
}

fn accuracy<L: AsRef<str>>(predictions: &[Prediction], labels: &[L]) -> f64 {
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|&(p, l)| {
            let l: &str = l.as_ref();
            p.label == l
        })
        .count();
    correct as f64 / labels.len() as f64
}

#[derive(Debug)]
pub struct SentimentAnalyzer {
    params: AnalyzerParams,
    stopwords: HashSet<String>,
    state: RwLock<Option<Arc<TrainedPipeline>>>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerParams::default(), Lexicon::default().stopwords().clone())
    }
}

impl SentimentAnalyzer {
    pub fn new(params: AnalyzerParams, stopwords: HashSet<String>) -> Self {
        Self {
            params,
            stopwords,
            state: RwLock::new(None),
        }
    }

    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    fn pipeline(&self) -> Result<Arc<TrainedPipeline>, SentiError> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SentiError::NotTrained)
    }

    pub fn is_trained(&self) -> bool {
        self.pipeline().is_ok()
    }

    /// Fit vocabulary, idf weights and class model on `texts`/`labels`,
    /// replacing any previous model. Fails with `InvalidInput` on empty or
    /// mismatched inputs, or when `alpha` is not a positive number; the
    /// previous model is kept in that case.
    pub fn train<S: AsRef<str>, L: AsRef<str>>(
        &self,
        texts: &[S],
        labels: &[L],
    ) -> Result<(), SentiError> {
        validate_pairs(texts.len(), labels.len())?;
        let alpha = self.params.alpha;
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(SentiError::InvalidInput(format!(
                "alpha must be a positive number, got {alpha}"
            )));
        }

        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        let vectorizer = TfidfVectorizer::fit(texts, &self.stopwords, self.params.min_df)?;
        let rows = vectorizer.transform_batch(texts);
        let model = ClassModel::fit(&rows, &labels, vectorizer.n_features(), alpha);

        let no_signal_class = match model
            .classes()
            .iter()
            .position(|c| *c == self.params.neutral_label)
        {
            Some(idx) => idx,
            None => {
                let (idx, _) = argmax(model.class_log_prior());
                warn!(
                    "label {:?} not among trained labels; blank input will map to {:?}",
                    self.params.neutral_label,
                    model.classes()[idx]
                );
                idx
            }
        };

        let mut pipeline = TrainedPipeline {
            vectorizer,
            model,
            training_accuracy: 0.0,
            no_signal_class,
        };
        let predictions: Vec<Prediction> = texts
            .iter()
            .zip(&rows)
            .map(|(text, row)| pipeline.classify(text.as_ref(), row))
            .collect();
        pipeline.training_accuracy = accuracy(&predictions, &labels);

        info!(
            "trained on {} texts: {} features, {} labels, training accuracy {:.2}",
            texts.len(),
            pipeline.vectorizer.n_features(),
            pipeline.model.classes().len(),
            pipeline.training_accuracy
        );

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(pipeline));
        Ok(())
    }

    /// Classify one (already cleaned) text. Blank text short-circuits to a
    /// no-signal prediction with confidence `0.0`.
    pub fn predict(&self, text: &str) -> Result<Prediction, SentiError> {
        let pipeline = self.pipeline()?;
        let row = pipeline.vectorizer.transform(text);
        Ok(pipeline.classify(text, &row))
    }

    /// Vectorize all texts in one pass, then classify each. Element `i`
    /// equals `predict(texts[i])`, including the blank-text rule.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Prediction>, SentiError> {
        let pipeline = self.pipeline()?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!("batch prediction over {} texts", texts.len());
        Ok(pipeline.classify_batch(texts))
    }

    /// Accuracy of the current model on labelled data.
    pub fn evaluate<S: AsRef<str>, L: AsRef<str>>(
        &self,
        texts: &[S],
        labels: &[L],
    ) -> Result<f64, SentiError> {
        let pipeline = self.pipeline()?;
        validate_pairs(texts.len(), labels.len())?;
        Ok(accuracy(&pipeline.classify_batch(texts), labels))
    }

    /// Labels seen during training, sorted.
    pub fn labels(&self) -> Result<Vec<String>, SentiError> {
        Ok(self.pipeline()?.model.classes().to_vec())
    }

    pub fn model_info(&self) -> ModelInfo {
        let (status, training_accuracy) = match self.pipeline() {
            Ok(p) => ("trained", format!("{:.2}", p.training_accuracy)),
            Err(_) => ("untrained", "N/A".to_string()),
        };
        ModelInfo {
            model_type: MODEL_TYPE.to_string(),
            status: status.to_string(),
            training_accuracy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained() -> SentimentAnalyzer {
        let analyzer = SentimentAnalyzer::default();
        analyzer
            .train(
                &["I love this", "I hate this", "it is okay"],
                &["positive", "negative", "neutral"],
            )
            .unwrap();
        analyzer
    }

    #[test]
    fn predict_before_train_is_not_trained() {
        let analyzer = SentimentAnalyzer::default();
        assert!(matches!(analyzer.predict("hello"), Err(SentiError::NotTrained)));
        assert!(matches!(
            analyzer.predict_batch(&["hello"]),
            Err(SentiError::NotTrained)
        ));
        assert!(matches!(
            analyzer.predict_batch::<&str>(&[]),
            Err(SentiError::NotTrained)
        ));
        assert!(matches!(analyzer.labels(), Err(SentiError::NotTrained)));
    }

    #[test]
    fn train_rejects_empty() {
        let analyzer = SentimentAnalyzer::default();
        let empty: [&str; 0] = [];
        let err = analyzer.train(&empty, &empty).unwrap_err();
        assert!(matches!(err, SentiError::InvalidInput(_)));
        assert!(!analyzer.is_trained());
    }

    #[test]
    fn train_rejects_mismatched_lengths() {
        let analyzer = SentimentAnalyzer::default();
        let err = analyzer
            .train(&["good", "bad"], &["positive"])
            .unwrap_err();
        assert!(matches!(err, SentiError::InvalidInput(_)));
    }

    #[test]
    fn train_rejects_non_positive_alpha() {
        for alpha in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let analyzer = SentimentAnalyzer::new(
                AnalyzerParams {
                    alpha,
                    ..AnalyzerParams::default()
                },
                Lexicon::default().stopwords().clone(),
            );
            let err = analyzer
                .train(&["good great", "bad awful"], &["pos", "neg"])
                .unwrap_err();
            assert!(matches!(err, SentiError::InvalidInput(_)), "alpha {alpha}");
            assert!(!analyzer.is_trained());
        }
    }

    #[test]
    fn tiny_alpha_keeps_confidence_in_range() {
        let analyzer = SentimentAnalyzer::new(
            AnalyzerParams {
                alpha: 1e-12,
                ..AnalyzerParams::default()
            },
            Lexicon::default().stopwords().clone(),
        );
        analyzer
            .train(&["good great", "bad awful"], &["pos", "neg"])
            .unwrap();
        for text in ["good bad", "good", "awful", "unseen"] {
            let p = analyzer.predict(text).unwrap();
            assert!(p.confidence.is_finite(), "{text:?}");
            assert!((0.0..=1.0).contains(&p.confidence), "{text:?}");
        }
        assert_eq!(analyzer.predict("good").unwrap().label, "pos");
    }

    #[test]
    fn failed_retrain_keeps_previous_model() {
        let analyzer = trained();
        let empty: [&str; 0] = [];
        assert!(analyzer.train(&empty, &empty).is_err());
        assert_eq!(analyzer.predict("love").unwrap().label, "positive");
    }

    #[test]
    fn end_to_end_majority_signal() {
        let analyzer = trained();
        let p = analyzer.predict("I love this").unwrap();
        assert_eq!(p.label, "positive");
        assert!(p.confidence > 1.0 / 3.0);
        assert_eq!(p.confidence, 0.5);
        assert!(!p.no_signal);
    }

    #[test]
    fn blank_text_has_zero_confidence() {
        let analyzer = trained();
        for text in ["", "   ", "\t\n"] {
            let p = analyzer.predict(text).unwrap();
            assert_eq!(p.confidence, 0.0);
            assert_eq!(p.label, "neutral");
            assert!(p.no_signal);
        }
    }

    #[test]
    fn blank_text_without_neutral_label_uses_trained_label() {
        let analyzer = SentimentAnalyzer::default();
        analyzer
            .train(&["great", "awful", "superb"], &["pos", "neg", "pos"])
            .unwrap();
        let p = analyzer.predict("").unwrap();
        assert_eq!(p.label, "pos");
        assert_eq!(p.confidence, 0.0);
    }

    #[test]
    fn labels_stay_within_trained_set() {
        let analyzer = trained();
        let labels = analyzer.labels().unwrap();
        for text in ["love", "hate", "okay", "unknown words", "love hate okay", ""] {
            let p = analyzer.predict(text).unwrap();
            assert!(labels.contains(&p.label), "{text:?} -> {}", p.label);
            assert!((0.0..=1.0).contains(&p.confidence));
        }
    }

    #[test]
    fn batch_matches_single_predictions() {
        let analyzer = trained();
        let texts = ["love", "", "hate it", "okay okay", "   "];
        let batch = analyzer.predict_batch(&texts).unwrap();
        assert_eq!(batch.len(), texts.len());
        for (text, p) in texts.iter().zip(&batch) {
            assert_eq!(*p, analyzer.predict(text).unwrap());
        }
    }

    #[test]
    fn empty_batch_is_empty() {
        let analyzer = trained();
        assert!(analyzer.predict_batch::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn works_with_arbitrary_labels() {
        let analyzer = SentimentAnalyzer::default();
        analyzer
            .train(
                &["rocket moon pump", "dump crash rekt", "moon pump", "crash dump"],
                &["bullish", "bearish", "bullish", "bearish"],
            )
            .unwrap();
        assert_eq!(analyzer.predict("crash").unwrap().label, "bearish");
        assert_eq!(analyzer.labels().unwrap(), vec!["bearish", "bullish"]);
    }

    #[test]
    fn retraining_is_deterministic() {
        let analyzer = trained();
        let first = analyzer.predict("love okay").unwrap();
        let info = analyzer.model_info();
        analyzer
            .train(
                &["I love this", "I hate this", "it is okay"],
                &["positive", "negative", "neutral"],
            )
            .unwrap();
        assert_eq!(analyzer.predict("love okay").unwrap(), first);
        assert_eq!(analyzer.model_info(), info);
    }

    #[test]
    fn model_info_reflects_state() {
        let analyzer = SentimentAnalyzer::default();
        let info = analyzer.model_info();
        assert_eq!(info.status, "untrained");
        assert_eq!(info.training_accuracy, "N/A");
        assert_eq!(info.model_type, MODEL_TYPE);

        analyzer
            .train(&["I love this", "I hate this"], &["positive", "negative"])
            .unwrap();
        let info = analyzer.model_info();
        assert_eq!(info.status, "trained");
        assert_eq!(info.training_accuracy, "1.00");
    }

    #[test]
    fn evaluate_on_held_out_data() {
        let analyzer = trained();
        let acc = analyzer
            .evaluate(&["love love", "hate", "okay"], &["positive", "negative", "negative"])
            .unwrap();
        assert!((acc - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn concurrent_readers_during_retrain() {
        let analyzer = Arc::new(trained());
        std::thread::scope(|s| {
            for _ in 0..4 {
                let analyzer = Arc::clone(&analyzer);
                s.spawn(move || {
                    for _ in 0..50 {
                        let p = analyzer.predict("love").unwrap();
                        assert_eq!(p.label, "positive");
                    }
                });
            }
            s.spawn(|| {
                for _ in 0..10 {
                    analyzer
                        .train(
                            &["I love this", "I hate this", "it is okay"],
                            &["positive", "negative", "neutral"],
                        )
                        .unwrap();
                }
            });
        });
    }

    #[test]
    fn prediction_serializes_without_no_signal_flag() {
        let p = Prediction {
            label: "positive".into(),
            confidence: 0.5,
            no_signal: false,
        };
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"label":"positive","confidence":0.5}"#
        );
    }
}
