//! L2-regularized least squares with an unpenalized intercept

#[derive(Debug, Clone, PartialEq)]
pub struct Ridge {
    pub alpha: f64,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Ridge {
    /// Fit by centering X and y, then solving (XᵀX + αI)w = Xᵀy
    pub fn fit(x: &[Vec<f64>], y: &[f64], alpha: f64) -> Self {
        let n = x.len();
        let p = x.first().map(|r| r.len()).unwrap_or(0);
        if n == 0 || p == 0 {
            return Self {
                alpha,
                coefficients: vec![0.0; p],
                intercept: if n == 0 { 0.0 } else { y.iter().sum::<f64>() / n as f64 },
            };
        }

        let nf = n as f64;
        let mut x_mean = vec![0.0; p];
        for row in x {
            for (m, v) in x_mean.iter_mut().zip(row) {
                *m += v / nf;
            }
        }
        let y_mean = y.iter().sum::<f64>() / nf;

        let mut gram = vec![vec![0.0; p]; p];
        let mut rhs = vec![0.0; p];
        for (row, target) in x.iter().zip(y) {
            let centered: Vec<f64> = row.iter().zip(&x_mean).map(|(v, m)| v - m).collect();
            let yc = target - y_mean;
            for i in 0..p {
                rhs[i] += centered[i] * yc;
                for j in 0..p {
                    gram[i][j] += centered[i] * centered[j];
                }
            }
        }
        for (i, row) in gram.iter_mut().enumerate() {
            row[i] += alpha;
        }

        let coefficients = solve(gram, rhs).unwrap_or_else(|| vec![0.0; p]);
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Self {
            alpha,
            coefficients,
            intercept,
        }
    }

    pub fn predict_one(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Gaussian elimination with partial pivoting; None if singular
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
