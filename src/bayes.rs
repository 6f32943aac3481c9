//! Multinomial naive Bayes over TF-IDF rows.

use crate::vectorize::SparseRow;
use std::collections::BTreeSet;

/// Per-class log priors and per-term log likelihoods.
#[derive(Debug, Clone)]
pub struct ClassModel {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]`
    feature_log_prob: Vec<Vec<f64>>,
}

/// Smallest smoothing value used by [`ClassModel::fit`].
pub const MIN_ALPHA: f64 = 1e-10;

impl ClassModel {
    /// Fit on feature rows. `rows` and `labels` must be non-empty and of
    /// equal length; callers validate. `alpha` is floored at [`MIN_ALPHA`]
    /// so every log likelihood stays finite.
    pub fn fit(rows: &[SparseRow], labels: &[String], n_features: usize, alpha: f64) -> Self {
        // f64::max returns the other operand for NaN
        let alpha = alpha.max(MIN_ALPHA);
        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0_f64; n_features]; classes.len()];

        for (row, label) in rows.iter().zip(labels) {
            // classes is sorted, so binary_search always hits
            let Ok(c) = classes.binary_search(label) else {
                continue;
            };
            class_count[c] += 1;
            for &(idx, weight) in row {
                feature_count[c][idx] += weight;
            }
        }

        let n_docs = labels.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&n| (n as f64 / n_docs).ln())
            .collect();

        // log P(t|c) = ln((F_ct + alpha) / (sum_t F_ct + alpha * |V|))
        let feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + alpha * n_features as f64;
                counts.iter().map(|&f| ((f + alpha) / total).ln()).collect()
            })
            .collect();

        Self {
            classes,
            class_log_prior,
            feature_log_prob,
        }
    }

    /// Sorted class labels; index positions match every per-class vector.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    fn joint_log_likelihood(&self, row: &SparseRow) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior + row.iter().map(|&(idx, x)| x * log_probs[idx]).sum::<f64>()
            })
            .collect()
    }

    /// Posterior probability per class, in [`ClassModel::classes`] order.
    pub fn predict_proba(&self, row: &SparseRow) -> Vec<f64> {
        let jll = self.joint_log_likelihood(row);
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
        jll.iter().map(|v| (v - log_sum).exp()).collect()
    }

    /// Most probable class index and its posterior. Ties go to the first
    /// class in sorted order.
    pub fn predict(&self, row: &SparseRow) -> (usize, f64) {
        argmax(&self.predict_proba(row))
    }
}

pub(crate) fn argmax(values: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, &v) in values.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ls: &[&str]) -> Vec<String> {
        ls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn priors_follow_class_frequency() {
        let rows = vec![vec![(0, 1.0)], vec![(0, 1.0)], vec![(1, 1.0)]];
        let model = ClassModel::fit(&rows, &labels(&["pos", "pos", "neg"]), 2, 1.0);
        assert_eq!(model.classes(), &["neg", "pos"]);
        assert!((model.class_log_prior()[0] - (1.0_f64 / 3.0).ln()).abs() < 1e-12);
        assert!((model.class_log_prior()[1] - (2.0_f64 / 3.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn smoothed_likelihoods_for_one_hot_rows() {
        let rows = vec![vec![(1, 1.0)], vec![(0, 1.0)], vec![(2, 1.0)]];
        let model = ClassModel::fit(&rows, &labels(&["positive", "negative", "neutral"]), 3, 1.0);
        let pos = model.classes().iter().position(|c| c == "positive").unwrap();

        let probs = model.predict_proba(&vec![(1, 1.0)]);
        // (1 + 1) / (1 + 3) against (0 + 1) / (1 + 3) for the other two
        assert!((probs[pos] - 0.5).abs() < 1e-12);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&vec![(1, 1.0)]).0, pos);
    }

    #[test]
    fn empty_row_falls_back_to_priors() {
        let rows = vec![vec![(0, 1.0)], vec![(0, 1.0)], vec![(1, 1.0)]];
        let model = ClassModel::fit(&rows, &labels(&["a", "a", "b"]), 2, 1.0);
        let probs = model.predict_proba(&vec![]);
        assert!((probs[0] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_alpha_is_floored() {
        // awful, bad, good, great
        let rows = vec![vec![(2, 0.7), (3, 0.7)], vec![(0, 0.7), (1, 0.7)]];
        for alpha in [0.0, -2.0, f64::NAN] {
            let model = ClassModel::fit(&rows, &labels(&["pos", "neg"]), 4, alpha);
            let probs = model.predict_proba(&vec![(1, 0.7), (2, 0.7)]);
            for p in &probs {
                assert!(p.is_finite() && (0.0..=1.0).contains(p), "alpha {alpha}: {probs:?}");
            }
            assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), (0, 0.5));
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), (1, 0.7));
    }

    #[test]
    fn unseen_feature_mass_never_zero() {
        let rows = vec![vec![(0, 1.0)], vec![(1, 1.0)]];
        let model = ClassModel::fit(&rows, &labels(&["x", "y"]), 2, 1.0);
        for p in model.predict_proba(&vec![(0, 0.6), (1, 0.8)]) {
            assert!(p > 0.0 && p < 1.0);
        }
    }
}
