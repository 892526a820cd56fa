//! Polynomial roots by simultaneous (Aberth-Ehrlich) iteration.

use ringsolve_core::C64;
use std::f64::consts::PI;

const MAX_ITERATIONS: usize = 2000;
const TOLERANCE: f64 = 1e-14;

/// Horner evaluation of `p(x)` and `p'(x)`, coefficients highest degree first.
fn horner(coefficients: &[C64], x: C64) -> (C64, C64) {
    let mut p = C64::new(0.0, 0.0);
    let mut dp = C64::new(0.0, 0.0);
    for &c in coefficients {
        dp = dp * x + p;
        p = p * x + c;
    }
    (p, dp)
}

/// Roots of `Σ coefficients[k]·x^(n-k)`, coefficients highest degree first.
///
/// Leading coefficients that vanish relative to the largest one lower the
/// degree; trailing ones give roots at the origin. The result is sorted by
/// argument then magnitude so repeated calls agree.
pub fn roots(coefficients: &[C64]) -> Vec<C64> {
    let scale = coefficients.iter().map(|c| c.norm()).fold(0.0, f64::max);
    if scale == 0.0 {
        return Vec::new();
    }
    let negligible = |c: &C64| c.norm() <= f64::EPSILON * scale;

    let start = coefficients
        .iter()
        .position(|c| !negligible(c))
        .unwrap_or(coefficients.len());
    let mut poly = &coefficients[start..];
    let mut found = Vec::new();
    while poly.len() > 1 && negligible(&poly[poly.len() - 1]) {
        found.push(C64::new(0.0, 0.0));
        poly = &poly[..poly.len() - 1];
    }

    let degree = poly.len().saturating_sub(1);
    match degree {
        0 => {}
        1 => found.push(-poly[1] / poly[0]),
        _ => found.extend(aberth(poly)),
    }

    found.sort_by(|a, b| {
        a.arg()
            .total_cmp(&b.arg())
            .then_with(|| a.norm().total_cmp(&b.norm()))
    });
    found
}

fn aberth(poly: &[C64]) -> Vec<C64> {
    let lead = poly[0];
    let monic: Vec<C64> = poly.iter().map(|c| c / lead).collect();
    let n = monic.len() - 1;

    // Start on a circle of the geometric-mean root radius.
    let radius = monic[n].norm().powf(1.0 / n as f64).max(1e-3);
    let mut z: Vec<C64> = (0..n)
        .map(|k| C64::from_polar(radius, 2.0 * PI * k as f64 / n as f64 + 0.4))
        .collect();

    for iteration in 0..MAX_ITERATIONS {
        let mut converged = true;
        for i in 0..n {
            let (p, dp) = horner(&monic, z[i]);
            if p == C64::new(0.0, 0.0) {
                continue;
            }
            let ratio = p / dp;
            let repulsion: C64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| (z[i] - z[j]).inv())
                .sum();
            let step = ratio / (C64::new(1.0, 0.0) - ratio * repulsion);
            if !step.is_finite() {
                continue;
            }
            z[i] -= step;
            if step.norm() > TOLERANCE * (1.0 + z[i].norm()) {
                converged = false;
            }
        }
        if converged {
            log::trace!("aberth converged after {} iterations (degree {n})", iteration + 1);
            return z;
        }
    }
    log::debug!("aberth reached {MAX_ITERATIONS} iterations (degree {n})");
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    fn contains(roots: &[C64], x: C64, tol: f64) -> bool {
        roots.iter().any(|r| (r - x).norm() < tol)
    }

    #[test]
    fn test_quadratic() {
        // (x - 2)(x + 3) = x² + x - 6
        let r = roots(&[c(1.0, 0.0), c(1.0, 0.0), c(-6.0, 0.0)]);
        assert_eq!(r.len(), 2);
        assert!(contains(&r, c(2.0, 0.0), 1e-12));
        assert!(contains(&r, c(-3.0, 0.0), 1e-12));
    }

    #[test]
    fn test_roots_of_unity() {
        // x⁵ - 0.9⁵: roots on a circle of radius 0.9
        let mut coeffs = vec![c(0.0, 0.0); 6];
        coeffs[0] = c(1.0, 0.0);
        coeffs[5] = c(-0.9f64.powi(5), 0.0);
        let r = roots(&coeffs);
        assert_eq!(r.len(), 5);
        for k in 0..5 {
            let expected = C64::from_polar(0.9, 2.0 * PI * k as f64 / 5.0);
            assert!(contains(&r, expected, 1e-10), "missing {expected}");
        }
    }

    #[test]
    fn test_zero_and_degenerate_coefficients() {
        // 0·x³ + x² - x = x(x - 1)
        let r = roots(&[c(0.0, 0.0), c(1.0, 0.0), c(-1.0, 0.0), c(0.0, 0.0)]);
        assert_eq!(r.len(), 2);
        assert!(contains(&r, c(0.0, 0.0), 1e-15));
        assert!(contains(&r, c(1.0, 0.0), 1e-12));

        assert!(roots(&[c(3.0, 0.0)]).is_empty());
        assert!(roots(&[]).is_empty());
    }

    #[test]
    fn test_complex_coefficients() {
        // (x - i)(x - 1 - i) = x² - (1 + 2i)x + (i - 1)
        let r = roots(&[c(1.0, 0.0), c(-1.0, -2.0), c(-1.0, 1.0)]);
        assert!(contains(&r, c(0.0, 1.0), 1e-12));
        assert!(contains(&r, c(1.0, 1.0), 1e-12));
    }
}
