use nalgebra::{DMatrix, DVector};

use super::TOLERANCE;

/// Maximum coordinate-descent sweeps before declaring non-convergence.
const MAX_SWEEPS: usize = 10_000;

/// Largest per-sweep coefficient change at which iteration stops.
const CONVERGENCE_TOL: f64 = 1e-10;

/// Result of a bounded least-squares solve.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// Fitted coefficients, one per design-matrix column.
    pub coefficients: DVector<f64>,
    /// Whether the iteration reached the convergence tolerance.
    pub converged: bool,
}

/// Solves `min ‖Xb − y‖²` without constraints via singular value
/// decomposition.
///
/// Returns `None` when the decomposition cannot produce a solution.
#[must_use]
pub fn solve_unconstrained(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    x.clone().svd(true, true).solve(y, TOLERANCE).ok()
}

/// Solves `min ‖Xb − y‖²` subject to `bᵢ ≥ lower` for every coefficient.
///
/// Cyclic coordinate descent projected onto the bound, starting from `seed`.
/// Each step minimizes the objective exactly in one coordinate; the
/// objective is convex, so the sweep sequence is monotone. Columns with zero
/// norm keep their seeded value.
#[must_use]
pub fn solve_lower_bounded(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    lower: f64,
    seed: &DVector<f64>,
) -> FitOutcome {
    let n = x.ncols();
    let mut b = seed.map(|v| v.max(lower));
    let mut residual = y - x * &b;
    let col_norms: Vec<f64> = (0..n).map(|j| x.column(j).norm_squared()).collect();

    for _ in 0..MAX_SWEEPS {
        let mut max_step = 0.0_f64;
        for j in 0..n {
            if col_norms[j] <= TOLERANCE {
                continue;
            }
            let gradient_step = x.column(j).dot(&residual) / col_norms[j];
            let updated = (b[j] + gradient_step).max(lower);
            let step = updated - b[j];
            if step != 0.0 {
                residual -= x.column(j) * step;
                b[j] = updated;
                max_step = max_step.max(step.abs());
            }
        }
        if max_step < CONVERGENCE_TOL {
            return FitOutcome {
                coefficients: b,
                converged: true,
            };
        }
    }

    FitOutcome {
        coefficients: b,
        converged: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn design(rows: &[[f64; 3]]) -> DMatrix<f64> {
        DMatrix::from_row_slice(rows.len(), 3, rows.as_flattened())
    }

    fn predict(x: &DMatrix<f64>, b: &[f64]) -> DVector<f64> {
        x * DVector::from_row_slice(b)
    }

    #[test]
    fn unconstrained_recovers_exact_solution() {
        let x = design(&[
            [1.0, 2.0, 1.0],
            [1.0, 4.0, 3.0],
            [1.0, 6.0, 2.0],
            [1.0, 8.0, 5.0],
        ]);
        let y = predict(&x, &[3.0, 1.5, 0.25]);
        let b = solve_unconstrained(&x, &y).unwrap();
        assert_relative_eq!(b[0], 3.0, epsilon = 1e-8);
        assert_relative_eq!(b[1], 1.5, epsilon = 1e-8);
        assert_relative_eq!(b[2], 0.25, epsilon = 1e-8);
    }

    #[test]
    fn bounded_recovers_positive_coefficients() {
        let x = design(&[
            [1.0, 1.0, 2.0],
            [1.0, 2.0, 1.0],
            [1.0, 3.0, 4.0],
            [1.0, 5.0, 3.0],
            [1.0, 8.0, 6.0],
        ]);
        let y = predict(&x, &[0.5, 2.0, 0.75]);
        let seed = DVector::from_row_slice(&[1.0, 1.0, 1.0]);
        let fit = solve_lower_bounded(&x, &y, 0.001, &seed);
        assert!(fit.converged);
        assert_relative_eq!(fit.coefficients[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-6);
        assert_relative_eq!(fit.coefficients[2], 0.75, epsilon = 1e-6);
    }

    #[test]
    fn bounded_clamps_negative_coefficient_to_floor() {
        // True slope for the second feature is negative; the bound must win.
        let x = design(&[
            [1.0, 1.0, 1.0],
            [1.0, 2.0, 4.0],
            [1.0, 3.0, 9.0],
            [1.0, 4.0, 2.0],
            [1.0, 5.0, 7.0],
        ]);
        let y = predict(&x, &[2.0, 1.0, -0.5]);
        let seed = DVector::from_row_slice(&[1.0, 1.0, 1.0]);
        let fit = solve_lower_bounded(&x, &y, 0.001, &seed);
        assert!(fit.converged);
        assert!((fit.coefficients[2] - 0.001).abs() < 1e-9);
        // Remaining coefficients stay at or above the bound.
        assert!(fit.coefficients[0] >= 0.001);
        assert!(fit.coefficients[1] >= 0.001);
    }
}
