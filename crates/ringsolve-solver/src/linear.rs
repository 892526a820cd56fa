//! Dense complex linear solves.

use nalgebra::{DMatrix, DVector};
use ringsolve_core::C64;

use crate::error::{Error, Result};

/// Solve `Ax = b` by LU decomposition with partial pivoting.
///
/// A factorization that succeeds but yields NaN or infinite entries (a
/// numerically singular matrix) is reported as [`Error::NonFinite`].
pub fn solve_complex(a: &DMatrix<C64>, b: &DVector<C64>) -> Result<DVector<C64>> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    let x = a.clone().lu().solve(b).ok_or(Error::SingularMatrix)?;
    if x.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
        return Err(Error::NonFinite);
    }
    Ok(x)
}
