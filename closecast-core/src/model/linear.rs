//! Linear least squares with a small ridge term.
//!
//! Solves the regularised normal equations `(XᵀX + λI) β = Xᵀy` by Cholesky
//! decomposition. Lagged price features are close to collinear (today's open
//! is usually yesterday's close), so plain OLS is routinely singular; a tiny
//! λ keeps the system positive definite without visibly biasing the fit.
//! The intercept column is regularised like every other column.

use ndarray::{s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::{ModelError, Regressor, TrainedModel};

/// Solver parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearRegression {
    /// Ridge term λ added to the diagonal of XᵀX.
    pub ridge: f64,
    /// Prepend a column of ones to the design matrix.
    pub fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self {
            ridge: 1e-6,
            fit_intercept: true,
        }
    }
}

/// Fitted coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    /// `features × outputs`
    pub coefficients: Array2<f64>,
    /// One intercept per output (zeros without `fit_intercept`).
    pub intercept: Array1<f64>,
}

impl Regressor for LinearRegression {
    type Model = LinearModel;

    fn fit(&self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<LinearModel, ModelError> {
        if !self.ridge.is_finite() || self.ridge < 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "ridge must be finite and >= 0, got {}",
                self.ridge
            )));
        }
        let n = x.len();
        if n == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if y.len() != n {
            return Err(ModelError::DimensionMismatch {
                expected: n,
                got: y.len(),
            });
        }

        let features = to_array(x)?;
        let labels = to_array(y)?;
        let p = features.ncols();
        let offset = usize::from(self.fit_intercept);

        let mut design = Array2::<f64>::ones((n, p + offset));
        design.slice_mut(s![.., offset..]).assign(&features);

        let mut xtx = design.t().dot(&design);
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += self.ridge;
        }
        let xty = design.t().dot(&labels);
        let beta = cholesky_solve(&xtx, &xty)?;

        let (intercept, coefficients) = if self.fit_intercept {
            (beta.row(0).to_owned(), beta.slice(s![1.., ..]).to_owned())
        } else {
            (Array1::zeros(labels.ncols()), beta)
        };

        tracing::debug!(rows = n, features = p, ridge = self.ridge, "fitted linear model");
        Ok(LinearModel {
            coefficients,
            intercept,
        })
    }
}

impl TrainedModel for LinearModel {
    fn input_width(&self) -> usize {
        self.coefficients.nrows()
    }

    fn predict(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.input_width() {
            return Err(ModelError::DimensionMismatch {
                expected: self.input_width(),
                got: row.len(),
            });
        }
        let x = Array1::from(row.to_vec());
        let y = x.dot(&self.coefficients) + &self.intercept;
        Ok(y.to_vec())
    }
}

/// Copy a row-major nested Vec into an ndarray, rejecting ragged rows.
fn to_array(rows: &[Vec<f64>]) -> Result<Array2<f64>, ModelError> {
    let width = rows.first().map_or(0, |r| r.len());
    if let Some(bad) = rows.iter().find(|r| r.len() != width) {
        return Err(ModelError::DimensionMismatch {
            expected: width,
            got: bad.len(),
        });
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| ModelError::InvalidParameter(e.to_string()))
}

/// Solve `A X = B` for symmetric positive definite `A`.
fn cholesky_solve(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if diag <= 0.0 || !diag.is_finite() {
            return Err(ModelError::Singular {
                column: j,
                pivot: diag,
            });
        }
        let ljj = diag.sqrt();
        l[[j, j]] = ljj;

        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / ljj;
        }
    }

    let mut solution = Array2::<f64>::zeros(b.raw_dim());
    for (col, rhs) in b.axis_iter(Axis(1)).enumerate() {
        // Forward: L z = rhs
        let mut z = vec![0.0; n];
        for i in 0..n {
            let mut sum = rhs[i];
            for k in 0..i {
                sum -= l[[i, k]] * z[k];
            }
            z[i] = sum / l[[i, i]];
        }
        // Backward: Lᵀ x = z
        for i in (0..n).rev() {
            let mut sum = z[i];
            for k in (i + 1)..n {
                sum -= l[[k, i]] * solution[[k, col]];
            }
            solution[[i, col]] = sum / l[[i, i]];
        }
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn recovers_exact_line() {
        // y = 2x + 1
        let x = col(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let y = col(&[1.0, 3.0, 5.0, 7.0, 9.0]);
        let model = LinearRegression::default().fit(&x, &y).unwrap();
        assert!((model.coefficients[[0, 0]] - 2.0).abs() < 1e-4);
        assert!((model.intercept[0] - 1.0).abs() < 1e-4);
        assert!((model.predict(&[10.0]).unwrap()[0] - 21.0).abs() < 1e-3);
    }

    #[test]
    fn multiple_features() {
        // y = x0 - 3 x1 + 0.5
        let x = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 0.5],
            vec![0.5, 2.0],
        ];
        let y: Vec<Vec<f64>> = x.iter().map(|r| vec![r[0] - 3.0 * r[1] + 0.5]).collect();
        let model = LinearRegression::default().fit(&x, &y).unwrap();
        let pred = model.predict(&[3.0, 1.0]).unwrap()[0];
        assert!((pred - 0.5).abs() < 1e-4, "pred = {pred}");
    }

    #[test]
    fn collinear_columns_still_fit() {
        // Second column duplicates the first.
        let x: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, i as f64]).collect();
        let y: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64 + 1.0]).collect();
        let model = LinearRegression::default().fit(&x, &y).unwrap();
        let pred = model.predict(&[8.0, 8.0]).unwrap()[0];
        assert!((pred - 9.0).abs() < 1e-3, "pred = {pred}");
    }

    #[test]
    fn singular_without_ridge() {
        // An all-zero column leaves an exactly zero pivot.
        let x: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64, 0.0]).collect();
        let y = col(&[0.0, 1.0, 2.0, 3.0]);
        let ols = LinearRegression {
            ridge: 0.0,
            fit_intercept: true,
        };
        assert!(matches!(ols.fit(&x, &y), Err(ModelError::Singular { .. })));
    }

    #[test]
    fn without_intercept() {
        let x = col(&[1.0, 2.0, 3.0]);
        let y = col(&[2.0, 4.0, 6.0]);
        let ols = LinearRegression {
            ridge: 1e-9,
            fit_intercept: false,
        };
        let model = ols.fit(&x, &y).unwrap();
        assert_eq!(model.intercept[0], 0.0);
        assert!((model.coefficients[[0, 0]] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn single_row_predicts_its_label() {
        let model = LinearRegression::default()
            .fit(&[vec![0.5, 0.5]], &[vec![0.5]])
            .unwrap();
        let pred = model.predict(&[0.5, 0.5]).unwrap()[0];
        assert!((pred - 0.5).abs() < 1e-4);
    }

    #[test]
    fn rejects_bad_shapes() {
        let ols = LinearRegression::default();
        assert_eq!(ols.fit(&[], &[]).unwrap_err(), ModelError::EmptyTrainingSet);
        assert_eq!(
            ols.fit(&col(&[1.0, 2.0]), &col(&[1.0])).unwrap_err(),
            ModelError::DimensionMismatch {
                expected: 2,
                got: 1
            }
        );
        assert!(ols.fit(&[vec![1.0, 2.0], vec![1.0]], &col(&[1.0, 2.0])).is_err());

        let model = ols.fit(&col(&[1.0, 2.0]), &col(&[1.0, 2.0])).unwrap();
        assert_eq!(
            model.predict(&[1.0, 2.0]).unwrap_err(),
            ModelError::DimensionMismatch {
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn rejects_negative_ridge() {
        let ols = LinearRegression {
            ridge: -1.0,
            fit_intercept: true,
        };
        assert!(matches!(
            ols.fit(&col(&[1.0]), &col(&[1.0])),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
