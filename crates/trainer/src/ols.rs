//! Ordinary least squares with intercept
//!
//! Solves the normal equations on mean-centered features with Gaussian
//! elimination (partial pivoting). Features with zero variance receive a
//! zero coefficient; any other rank deficiency is an error.

use crate::errors::TrainerError;

/// Relative threshold below which a variance or pivot is treated as zero
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of a least-squares fit
#[derive(Clone, Debug, PartialEq)]
pub struct OlsFit {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl OlsFit {
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.intercept + self.coef.iter().zip(x).map(|(c, v)| c * v).sum::<f64>()
    }

    /// Coefficient of determination on `(x, y)`.
    ///
    /// Returns 1.0 when `y` is constant and perfectly predicted.
    pub fn r_squared(&self, x: &[Vec<f64>], y: &[f64]) -> f64 {
        let mean = y.iter().sum::<f64>() / y.len() as f64;
        let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
        let ss_res: f64 = x
            .iter()
            .zip(y)
            .map(|(row, v)| (v - self.predict(row)).powi(2))
            .sum();

        if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        }
    }
}

/// Fit `y ≈ intercept + x · coef`.
pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<OlsFit, TrainerError> {
    let n = x.len();
    if n == 0 {
        return Err(TrainerError::Training("no samples".to_string()));
    }
    if y.len() != n {
        return Err(TrainerError::Training(format!(
            "{} feature rows but {} targets",
            n,
            y.len()
        )));
    }

    let p = x[0].len();
    if let Some(idx) = x.iter().position(|row| row.len() != p) {
        return Err(TrainerError::Training(format!(
            "row {idx} has {} features, expected {p}",
            x[idx].len()
        )));
    }

    let x_mean: Vec<f64> = (0..p)
        .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n as f64)
        .collect();
    let y_mean = y.iter().sum::<f64>() / n as f64;

    // Centered Gram matrix X'X and moment vector X'y
    let mut gram = vec![vec![0.0; p]; p];
    let mut moment = vec![0.0; p];
    for (row, &target) in x.iter().zip(y) {
        let yc = target - y_mean;
        for i in 0..p {
            let xi = row[i] - x_mean[i];
            moment[i] += xi * yc;
            for j in i..p {
                gram[i][j] += xi * (row[j] - x_mean[j]);
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            gram[i][j] = gram[j][i];
        }
    }

    let scale = gram
        .iter()
        .enumerate()
        .map(|(i, r)| r[i])
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let active: Vec<usize> = (0..p)
        .filter(|&j| gram[j][j] > RANK_TOLERANCE * scale)
        .collect();

    let reduced_gram: Vec<Vec<f64>> = active
        .iter()
        .map(|&i| active.iter().map(|&j| gram[i][j]).collect())
        .collect();
    let reduced_moment: Vec<f64> = active.iter().map(|&i| moment[i]).collect();

    let solution = solve(reduced_gram, reduced_moment, scale)?;

    let mut coef = vec![0.0; p];
    for (k, &j) in active.iter().enumerate() {
        coef[j] = solution[k];
    }

    let intercept = y_mean - coef.iter().zip(&x_mean).map(|(c, m)| c * m).sum::<f64>();

    Ok(OlsFit { coef, intercept })
}

/// Solve `a · x = b` for a square system.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>, scale: f64) -> Result<Vec<f64>, TrainerError> {
    let m = b.len();

    for col in 0..m {
        let pivot_row = (col..m)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);

        if a[pivot_row][col].abs() <= RANK_TOLERANCE * scale {
            return Err(TrainerError::Training(
                "features are collinear; the least-squares solution is not unique".to_string(),
            ));
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..m {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..m {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; m];
    for row in (0..m).rev() {
        let tail: f64 = (row + 1..m).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}
