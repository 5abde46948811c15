//! Shuffled k-fold cross-validation scored by R²

use crate::ridge::Ridge;
use growthlab_core::stats::{mean, pstdev};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Deterministically shuffled k-fold splitter
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    pub n_splits: usize,
    pub seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, seed }
    }

    /// Test-index sets; the first `n % k` folds take one extra row
    pub fn test_folds(&self, n_rows: usize) -> Vec<Vec<usize>> {
        let k = self.n_splits.min(n_rows);
        if k == 0 {
            return Vec::new();
        }
        let mut indices: Vec<usize> = (0..n_rows).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let base = n_rows / k;
        let extra = n_rows % k;
        let mut folds = Vec::with_capacity(k);
        let mut start = 0;
        for fold in 0..k {
            let size = base + usize::from(fold < extra);
            folds.push(indices[start..start + size].to_vec());
            start += size;
        }
        folds
    }
}

/// Coefficient of determination; None when fewer than two targets
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.len() < 2 || y_true.len() != y_pred.len() {
        return None;
    }
    let y_mean = mean(y_true);
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvScore {
    pub mean: f64,
    pub std: f64,
    pub folds_scored: usize,
}

/// Refit ridge on each training split and score the held-out fold.
/// Folds too small to score are skipped; with none scored the result is zero.
pub fn cross_val_r2(x: &[Vec<f64>], y: &[f64], alpha: f64, kfold: &KFold) -> CvScore {
    let mut scores = Vec::new();
    for test in kfold.test_folds(x.len()) {
        let mut in_test = vec![false; x.len()];
        for &i in &test {
            in_test[i] = true;
        }
        let (train_x, train_y): (Vec<Vec<f64>>, Vec<f64>) = (0..x.len())
            .filter(|&i| !in_test[i])
            .map(|i| (x[i].clone(), y[i]))
            .unzip();
        if train_x.is_empty() {
            continue;
        }

        let model = Ridge::fit(&train_x, &train_y, alpha);
        let test_x: Vec<Vec<f64>> = test.iter().map(|&i| x[i].clone()).collect();
        let test_y: Vec<f64> = test.iter().map(|&i| y[i]).collect();
        if let Some(score) = r2_score(&test_y, &model.predict(&test_x)) {
            scores.push(score);
        }
    }

    CvScore {
        mean: mean(&scores),
        std: pstdev(&scores),
        folds_scored: scores.len(),
    }
}
