//! Dense, non-symmetric eigendecomposition backed by nalgebra.
//!
//! Eigenvalues come from the real Schur form `A = Q T Qᵀ`: 1×1 diagonal blocks of
//! `T` are real eigenvalues, 2×2 blocks hold complex-conjugate pairs. Eigenvectors
//! are recovered per eigenvalue as the null direction of `A − λI` (right singular
//! vector of the smallest singular value).

use nalgebra::linalg::Schur;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64 as C64;
use serde::Deserialize;

use crate::core::error::EigError;
use crate::core::matrix_reader::ensure_square;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    pub epsilon: f64,
    /// 0 = iterate until converged.
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { epsilon: f64::EPSILON, max_iterations: 0 }
    }
}

#[derive(Clone, Debug)]
pub struct Eigen {
    pub values: Vec<C64>,
    /// Column `j` is the unit-norm eigenvector of `values[j]`.
    pub vectors: DMatrix<C64>,
}

pub fn eigenvalues(matrix: &DMatrix<f64>, opts: &SolverOptions) -> Result<Vec<C64>, EigError> {
    let (scale, scaled) = scaled_input(matrix)?;
    let values = schur_eigenvalues(&scaled, opts)?;
    unscale(&values, scale)
}

pub fn eigen(matrix: &DMatrix<f64>, opts: &SolverOptions) -> Result<Eigen, EigError> {
    let (scale, scaled) = scaled_input(matrix)?;
    let scaled_values = schur_eigenvalues(&scaled, opts)?;
    let n = scaled.nrows();
    let complex = scaled.map(|x| C64::new(x, 0.0));

    // A/s and A share eigenvectors; λ/s belongs to A/s
    let mut vectors = DMatrix::<C64>::zeros(n, n);
    for (j, &lambda) in scaled_values.iter().enumerate() {
        let v = null_vector(&complex, lambda, opts)?;
        vectors.set_column(j, &v);
    }
    let values = unscale(&scaled_values, scale)?;
    Ok(Eigen { values, vectors })
}

/// Validates the input and divides it by a power of two when its largest entry is
/// far from 1, so the Schur iteration cannot overflow. Power-of-two scaling is exact.
fn scaled_input(matrix: &DMatrix<f64>) -> Result<(f64, DMatrix<f64>), EigError> {
    ensure_square(matrix)?;
    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(EigError::convergence("matrix contains non-finite entries"));
    }

    let scale = power_of_two_scale(matrix.amax());
    if scale == 1.0 {
        Ok((1.0, matrix.clone()))
    } else {
        Ok((scale, matrix / scale))
    }
}

fn power_of_two_scale(max_abs: f64) -> f64 {
    if max_abs == 0.0 {
        return 1.0;
    }
    let exp = max_abs.log2().floor() as i32;
    if exp.abs() < 512 {
        1.0
    } else {
        2f64.powi(exp.clamp(-1000, 1000))
    }
}

fn schur_eigenvalues(matrix: &DMatrix<f64>, opts: &SolverOptions) -> Result<Vec<C64>, EigError> {
    if matrix.is_empty() {
        return Ok(Vec::new());
    }
    let n = matrix.nrows();
    let schur = Schur::try_new(matrix.clone(), opts.epsilon, opts.max_iterations).ok_or_else(|| {
        EigError::convergence(format!(
            "Schur decomposition of {n}x{n} matrix did not converge within {} iterations",
            opts.max_iterations
        ))
    })?;
    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

fn unscale(values: &[C64], scale: f64) -> Result<Vec<C64>, EigError> {
    let values: Vec<C64> = values.iter().map(|z| *z * scale).collect();
    if values.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(EigError::convergence("eigenvalue computation produced non-finite values"));
    }
    Ok(values)
}

fn null_vector(a: &DMatrix<C64>, lambda: C64, opts: &SolverOptions) -> Result<DVector<C64>, EigError> {
    let mut shifted = a.clone();
    for i in 0..shifted.nrows() {
        shifted[(i, i)] -= lambda;
    }

    let svd = shifted
        .try_svd(false, true, opts.epsilon, opts.max_iterations)
        .ok_or_else(|| EigError::convergence(format!("SVD of A - ({lambda})I did not converge")))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| EigError::convergence("SVD returned no right singular vectors"))?;

    let k = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);

    // rows of Vᴴ are conjugated columns of V
    Ok(v_t.row(k).adjoint().normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn sorted_re(values: &[C64]) -> Vec<f64> {
        let mut re: Vec<f64> = values.iter().map(|z| z.re).collect();
        re.sort_by(f64::total_cmp);
        re
    }

    #[test]
    fn diagonal_eigenvalues() {
        let m = DMatrix::from_row_slice(2, 2, &[5.0, 0.0, 0.0, 3.0]);
        let vals = eigenvalues(&m, &SolverOptions::default()).expect("eig ok");
        assert_eq!(vals.len(), 2);
        assert_eq!(sorted_re(&vals), vec![3.0, 5.0]);
        assert!(vals.iter().all(|z| z.im == 0.0));
    }

    #[test]
    fn rotation_has_conjugate_pair() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, -1.0, 1.0, 0.0]);
        let vals = eigenvalues(&m, &SolverOptions::default()).expect("eig ok");
        assert_eq!(vals.len(), 2);
        for z in &vals {
            assert!(approx_eq(z.re, 0.0, 1e-12));
            assert!(approx_eq(z.im.abs(), 1.0, 1e-12));
        }
        assert!(approx_eq(vals[0].im + vals[1].im, 0.0, 1e-12));
    }

    #[test]
    fn non_symmetric_real_spectrum() {
        // upper triangular: eigenvalues are the diagonal
        let m = DMatrix::from_row_slice(3, 3, &[1.0, 7.0, -2.0, 0.0, 4.0, 3.0, 0.0, 0.0, -6.0]);
        let vals = eigenvalues(&m, &SolverOptions::default()).expect("eig ok");
        let re = sorted_re(&vals);
        for (got, want) in re.iter().zip([-6.0, 1.0, 4.0]) {
            assert!(approx_eq(*got, want, 1e-9), "{re:?}");
        }
    }

    #[test]
    fn iteration_budget_exhausted() {
        // companion matrix of (x-1)(x-2)(x-3)(x-4)(x-5)
        let m = DMatrix::from_row_slice(
            5,
            5,
            &[
                15.0, -85.0, 225.0, -274.0, 120.0,
                1.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0, 0.0,
            ],
        );
        let tight = SolverOptions { max_iterations: 1, ..SolverOptions::default() };
        let err = eigenvalues(&m, &tight).unwrap_err();
        assert!(matches!(err, EigError::Convergence(_)), "{err}");

        let vals = eigenvalues(&m, &SolverOptions::default()).expect("eig ok");
        let re = sorted_re(&vals);
        for (got, want) in re.iter().zip([1.0, 2.0, 3.0, 4.0, 5.0]) {
            assert!(approx_eq(*got, want, 1e-6), "{re:?}");
        }
    }

    #[test]
    fn non_finite_entries_rejected() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, 0.0, 1.0]);
        assert!(matches!(eigenvalues(&m, &SolverOptions::default()), Err(EigError::Convergence(_))));
    }

    #[test]
    fn non_square_rejected_before_solver() {
        let m = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        assert!(matches!(eigenvalues(&m, &SolverOptions::default()), Err(EigError::Shape { .. })));
    }

    #[test]
    fn eigenvectors_satisfy_definition() {
        let m = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 0.0, -1.0, 2.0, 0.5, 0.0, 0.3, 1.0]);
        let e = eigen(&m, &SolverOptions::default()).expect("eigen ok");
        assert_eigenpairs(&m, &e, 1e-8);
    }

    fn assert_eigenpairs(m: &DMatrix<f64>, e: &Eigen, tol: f64) {
        let a = m.map(|x| C64::new(x, 0.0));
        for (j, &lambda) in e.values.iter().enumerate() {
            let v = e.vectors.column(j).into_owned();
            assert!(approx_eq(v.norm(), 1.0, 1e-12), "‖v‖={}", v.norm());
            let residual = (&a * &v - v.map(|x| x * lambda)).norm();
            assert!(residual < tol, "λ={lambda} residual={residual:e}");
        }
    }

    #[test]
    fn repeated_eigenvalue_vectors() {
        let m = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]);
        let e = eigen(&m, &SolverOptions::default()).expect("eigen ok");
        assert_eq!(sorted_re(&e.values), vec![2.0, 2.0]);
        assert_eq!((e.vectors.nrows(), e.vectors.ncols()), (2, 2));
        assert_eigenpairs(&m, &e, 1e-12);
    }

    #[test]
    fn huge_entries_are_scaled() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 1e308, 1e308, 1.0]);
        let vals = eigenvalues(&m, &SolverOptions::default()).expect("eig ok");
        let re = sorted_re(&vals);
        assert!(re.iter().all(|x| x.is_finite()), "{re:?}");
        assert!(approx_eq(re[0] / -1e308, 1.0, 1e-12), "{re:?}");
        assert!(approx_eq(re[1] / 1e308, 1.0, 1e-12), "{re:?}");
    }

    #[test]
    fn tiny_entries_are_scaled() {
        let m = DMatrix::from_row_slice(2, 2, &[3e-300, 0.0, 0.0, 5e-300]);
        let vals = eigenvalues(&m, &SolverOptions::default()).expect("eig ok");
        let re = sorted_re(&vals);
        assert!(approx_eq(re[0] / 3e-300, 1.0, 1e-12), "{re:?}");
        assert!(approx_eq(re[1] / 5e-300, 1.0, 1e-12), "{re:?}");
    }

    #[test]
    fn scale_is_identity_for_ordinary_magnitudes() {
        assert_eq!(power_of_two_scale(0.0), 1.0);
        assert_eq!(power_of_two_scale(5.0), 1.0);
        assert_eq!(power_of_two_scale(1e150), 1.0);
        assert_eq!(power_of_two_scale(1e308), 2f64.powi(1000));
        assert_eq!(power_of_two_scale(1e-300), 2f64.powi(-997));
    }

    #[test]
    fn overflowing_eigenvalues_are_rejected() {
        let err = unscale(&[C64::new(2.0, 0.0), C64::new(f64::NAN, 0.0)], 1.0).unwrap_err();
        assert!(matches!(err, EigError::Convergence(_)), "{err}");
        let err = unscale(&[C64::new(1e300, 0.0)], 2f64.powi(100)).unwrap_err();
        assert!(matches!(err, EigError::Convergence(_)), "{err}");
    }
}
