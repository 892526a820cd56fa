//! One-shot symbolic solve of a topology by Cramer's rule.

use std::collections::HashMap;

use ringsolve_core::C64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::linear::LinearSystem;
use crate::poly::{Atom, Poly};

/// Largest system the column-subset expansion handles.
pub const MAX_SYMBOLIC_PINS: usize = 32;

/// Every pin amplitude as `numerators[i] / denominator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicSolution {
    numerators: Vec<Poly>,
    denominator: Poly,
}

impl SymbolicSolution {
    /// Number of pins solved for.
    pub fn num_pins(&self) -> usize {
        self.numerators.len()
    }

    /// Numerator of pin `pin`.
    pub fn numerator(&self, pin: usize) -> Option<&Poly> {
        self.numerators.get(pin)
    }

    /// Common denominator, the determinant of the system.
    pub fn denominator(&self) -> &Poly {
        &self.denominator
    }

    /// Evaluate pin `pin` for given atom values.
    pub fn evaluate(&self, pin: usize, mut value: impl FnMut(&Atom) -> C64) -> Option<C64> {
        let num = self.numerators.get(pin)?.evaluate(&mut value);
        Some(num / self.denominator.evaluate(&mut value))
    }
}

/// Determinant of an `n×n` matrix given by `entry(row, col)`.
///
/// Rows are expanded in order over the set of columns already used. Choosing
/// column `c` after the columns in `used` adds one inversion per used column
/// greater than `c`.
fn determinant<'a>(n: usize, entry: impl Fn(usize, usize) -> Option<&'a Poly>) -> Poly {
    let mut layer: HashMap<u32, Poly> = HashMap::from([(0, Poly::one())]);
    for row in 0..n {
        let mut next: HashMap<u32, Poly> = HashMap::with_capacity(layer.len());
        for (&used, partial) in &layer {
            for col in 0..n {
                let bit = 1u32 << col;
                if used & bit != 0 {
                    continue;
                }
                let Some(coefficient) = entry(row, col) else {
                    continue;
                };
                let mut term = partial * coefficient;
                if (used >> col).count_ones() % 2 == 1 {
                    term = -&term;
                }
                *next.entry(used | bit).or_default() += &term;
            }
        }
        next.retain(|_, p| !p.is_zero());
        if next.is_empty() {
            return Poly::zero();
        }
        layer = next;
    }
    layer.into_values().next().unwrap_or_default()
}

/// Solve `M·A = b` for every pin.
pub fn solve(system: &LinearSystem) -> Result<SymbolicSolution> {
    let n = system.num_pins();
    if n > MAX_SYMBOLIC_PINS {
        return Err(Error::TooManyPins {
            num_pins: n,
            max: MAX_SYMBOLIC_PINS,
        });
    }

    let denominator = determinant(n, |r, c| system.entry(r, c));
    if denominator.is_zero() {
        return Err(Error::Singular);
    }
    log::debug!("determinant has {} terms", denominator.num_terms());

    let numerators = (0..n)
        .map(|pin| {
            determinant(n, |r, c| {
                if c == pin {
                    Some(system.rhs(r)).filter(|p| !p.is_zero())
                } else {
                    system.entry(r, c)
                }
            })
        })
        .collect();

    Ok(SymbolicSolution {
        numerators,
        denominator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Equation, Expr};
    use crate::params::ParameterSymbol;

    fn param(name: &str) -> Poly {
        Poly::atom(Atom::Param(name.into()))
    }

    #[test]
    fn test_two_by_two() {
        // a·A_0 + b·A_1 = 1, c·A_0 + d·A_1 = 0
        let params = ["a", "b", "c", "d"].map(ParameterSymbol::coefficient);
        let eqs = [
            Equation::new(
                Expr::param("a") * Expr::pin(0) + Expr::param("b") * Expr::pin(1),
                Expr::real(1.0),
            ),
            Equation::new(
                Expr::param("c") * Expr::pin(0) + Expr::param("d") * Expr::pin(1),
                Expr::real(0.0),
            ),
        ];
        let system = LinearSystem::from_equations(2, &eqs, &params).unwrap();
        let solution = solve(&system).unwrap();

        let det = &(&param("a") * &param("d")) - &(&param("b") * &param("c"));
        assert_eq!(solution.denominator(), &det);
        assert_eq!(solution.numerator(0), Some(&param("d")));
        assert_eq!(solution.numerator(1), Some(&-&param("c")));

        let values = |atom: &Atom| match atom {
            Atom::Param(p) if p == "a" => C64::new(2.0, 0.0),
            Atom::Param(p) if p == "b" => C64::new(1.0, 0.0),
            Atom::Param(p) if p == "c" => C64::new(1.0, 0.0),
            _ => C64::new(3.0, 0.0),
        };
        let a0 = solution.evaluate(0, values).unwrap();
        assert!((a0 - C64::new(0.6, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_permutation_sign() {
        // Anti-diagonal 3×3: det = -x·y·w
        let params = ["x", "y", "w"].map(ParameterSymbol::coefficient);
        let eqs = [
            Equation::new(Expr::param("x") * Expr::pin(2), Expr::real(1.0)),
            Equation::new(Expr::param("y") * Expr::pin(1), Expr::real(0.0)),
            Equation::new(Expr::param("w") * Expr::pin(0), Expr::real(0.0)),
        ];
        let system = LinearSystem::from_equations(3, &eqs, &params).unwrap();
        let solution = solve(&system).unwrap();
        let expected = -&(&(&param("x") * &param("y")) * &param("w"));
        assert_eq!(solution.denominator(), &expected);
    }

    #[test]
    fn test_singular() {
        let eqs = [
            Equation::new(Expr::pin(0) + Expr::pin(1), Expr::real(1.0)),
            Equation::new(Expr::pin(0) + Expr::pin(1), Expr::real(0.0)),
        ];
        let system = LinearSystem::from_equations(2, &eqs, &[]).unwrap();
        assert!(matches!(solve(&system), Err(Error::Singular)));
    }

    #[test]
    fn test_serde_round_trip() {
        let eqs = [Equation::new(Expr::real(2.0) * Expr::pin(0), Expr::real(1.0))];
        let system = LinearSystem::from_equations(1, &eqs, &[]).unwrap();
        let solution = solve(&system).unwrap();
        let json = serde_json::to_string(&solution).unwrap();
        let back: SymbolicSolution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, solution);
    }
}
