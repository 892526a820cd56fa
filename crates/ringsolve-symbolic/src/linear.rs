//! Linear forms: symbolic equations as rows of `M·A = b`.

use std::collections::BTreeMap;

use ringsolve_core::C64;

use crate::error::{Error, Result};
use crate::expr::{BinaryOp, Equation, Expr, UnaryOp};
use crate::params::{ParameterKind, ParameterSymbol};
use crate::poly::{Atom, Poly};

/// `Σ c_i·A_i + k`, with polynomial coefficients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearForm {
    /// Coefficient of each pin amplitude.
    pub coefficients: BTreeMap<usize, Poly>,
    /// Pin-free part.
    pub constant: Poly,
}

impl LinearForm {
    fn constant(p: Poly) -> Self {
        Self {
            coefficients: BTreeMap::new(),
            constant: p,
        }
    }

    fn pin(index: usize) -> Self {
        Self {
            coefficients: BTreeMap::from([(index, Poly::one())]),
            constant: Poly::zero(),
        }
    }

    fn is_constant(&self) -> bool {
        self.coefficients.is_empty()
    }

    fn combine(mut self, other: LinearForm, sign: f64) -> Self {
        let s = C64::new(sign, 0.0);
        for (pin, c) in other.coefficients {
            let entry = self.coefficients.entry(pin).or_default();
            *entry += &c.scale(s);
        }
        self.coefficients.retain(|_, c| !c.is_zero());
        self.constant += &other.constant.scale(s);
        self
    }

    fn scale(self, factor: &Poly) -> Self {
        let mut coefficients: BTreeMap<usize, Poly> = self
            .coefficients
            .into_iter()
            .map(|(pin, c)| (pin, &c * factor))
            .collect();
        coefficients.retain(|_, c| !c.is_zero());
        Self {
            coefficients,
            constant: &self.constant * factor,
        }
    }
}

/// Expand an expression into a linear form, or `None` if it multiplies two
/// pin amplitudes together.
pub fn linearize(expr: &Expr) -> Option<LinearForm> {
    Some(match expr {
        Expr::Constant(c) => LinearForm::constant(Poly::constant(*c)),
        Expr::Pin(i) => LinearForm::pin(*i),
        Expr::Param(name) => LinearForm::constant(Poly::atom(Atom::Param(name.clone()))),
        Expr::Propagation { loss, length } => LinearForm::constant(Poly::atom(Atom::Propagation {
            loss: loss.clone(),
            length: length.clone(),
        })),
        Expr::BinaryOp { op, left, right } => {
            let (l, r) = (linearize(left)?, linearize(right)?);
            match op {
                BinaryOp::Add => l.combine(r, 1.0),
                BinaryOp::Sub => l.combine(r, -1.0),
                BinaryOp::Mul if r.is_constant() => l.scale(&r.constant),
                BinaryOp::Mul if l.is_constant() => r.scale(&l.constant),
                BinaryOp::Mul => return None,
            }
        }
        Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand,
        } => linearize(operand)?.scale(&Poly::constant(C64::new(-1.0, 0.0))),
    })
}

/// A square symbolic system `M·A = b` over the pins of a topology.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    num_pins: usize,
    /// Row `r`: pin coefficients of equation `r`.
    rows: Vec<BTreeMap<usize, Poly>>,
    rhs: Vec<Poly>,
}

impl LinearSystem {
    /// Build the system from `num_pins` equations, checking that every pin
    /// index is in range and every atom is a declared parameter.
    pub fn from_equations(
        num_pins: usize,
        equations: &[Equation],
        parameters: &[ParameterSymbol],
    ) -> Result<Self> {
        if equations.len() != num_pins {
            return Err(Error::EquationCount {
                pins: num_pins,
                equations: equations.len(),
            });
        }

        let declared = |name: &str, kind: Option<ParameterKind>| {
            parameters
                .iter()
                .any(|p| p.name == name && kind.map_or(true, |k| p.kind == k))
        };

        let mut rows = Vec::with_capacity(num_pins);
        let mut rhs = Vec::with_capacity(num_pins);
        for (index, equation) in equations.iter().enumerate() {
            let form = linearize(&(equation.lhs.clone() - equation.rhs.clone())).ok_or_else(
                || Error::Nonlinear {
                    index,
                    equation: equation.to_string(),
                },
            )?;

            if let Some(&pin) = form.coefficients.keys().find(|&&p| p >= num_pins) {
                return Err(Error::PinOutOfRange { pin, num_pins });
            }
            let polys = form.coefficients.values().chain(std::iter::once(&form.constant));
            for atom in polys.flat_map(|p| p.atoms()) {
                let ok = match atom {
                    Atom::Param(name) => declared(name, None),
                    Atom::Propagation { loss, length } => {
                        declared(loss, Some(ParameterKind::Coefficient))
                            && declared(length, Some(ParameterKind::Length))
                    }
                };
                if !ok {
                    return Err(Error::UndeclaredParameter(atom.to_string()));
                }
            }

            rhs.push(-&form.constant);
            rows.push(form.coefficients);
        }

        Ok(Self {
            num_pins,
            rows,
            rhs,
        })
    }

    /// Number of unknowns.
    pub fn num_pins(&self) -> usize {
        self.num_pins
    }

    /// Coefficient of pin `col` in row `row`, if nonzero.
    pub fn entry(&self, row: usize, col: usize) -> Option<&Poly> {
        self.rows[row].get(&col)
    }

    /// Nonzero entries of a row.
    pub fn row(&self, row: usize) -> &BTreeMap<usize, Poly> {
        &self.rows[row]
    }

    /// Right-hand side of a row.
    pub fn rhs(&self, row: usize) -> &Poly {
        &self.rhs[row]
    }

    /// Dense numeric matrix and right-hand side for given atom values.
    pub fn evaluate(&self, mut value: impl FnMut(&Atom) -> C64) -> (Vec<Vec<C64>>, Vec<C64>) {
        let zero = C64::new(0.0, 0.0);
        let mut matrix = vec![vec![zero; self.num_pins]; self.num_pins];
        for (r, row) in self.rows.iter().enumerate() {
            for (&c, poly) in row {
                matrix[r][c] = poly.evaluate(&mut value);
            }
        }
        let rhs = self.rhs.iter().map(|p| p.evaluate(&mut value)).collect();
        (matrix, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linearize_coupler_row() {
        // A_2 = σ·A_0 + i·κ·A_1
        let eq = Expr::pin(2)
            - (Expr::param("s") * Expr::pin(0) + Expr::i() * Expr::param("k") * Expr::pin(1));
        let form = linearize(&eq).unwrap();

        assert_eq!(form.coefficients.len(), 3);
        assert_eq!(form.coefficients[&2], Poly::one());
        assert_eq!(
            form.coefficients[&0],
            Poly::atom(Atom::Param("s".into())).scale(C64::new(-1.0, 0.0))
        );
        assert_eq!(
            form.coefficients[&1],
            Poly::atom(Atom::Param("k".into())).scale(C64::new(0.0, -1.0))
        );
        assert!(form.constant.is_zero());
    }

    #[test]
    fn test_nonlinear_rejected() {
        assert!(linearize(&(Expr::pin(0) * Expr::pin(1))).is_none());
        let eqs = [
            Equation::new(Expr::pin(0), Expr::real(1.0)),
            Equation::new(Expr::pin(1), Expr::pin(0) * Expr::pin(0)),
        ];
        assert!(matches!(
            LinearSystem::from_equations(2, &eqs, &[]),
            Err(Error::Nonlinear { index: 1, .. })
        ));
    }

    #[test]
    fn test_system_checks() {
        let params = [ParameterSymbol::coefficient("g")];
        let eqs = [
            Equation::new(Expr::pin(0), Expr::real(1.0)),
            Equation::new(Expr::pin(1), Expr::param("g") * Expr::pin(0)),
        ];
        let sys = LinearSystem::from_equations(2, &eqs, &params).unwrap();
        assert_eq!(sys.rhs(0), &Poly::one());
        assert!(sys.rhs(1).is_zero());
        assert!(sys.entry(0, 1).is_none());

        assert!(matches!(
            LinearSystem::from_equations(3, &eqs, &params),
            Err(Error::EquationCount { .. })
        ));
        assert!(matches!(
            LinearSystem::from_equations(2, &eqs, &[]),
            Err(Error::UndeclaredParameter(_))
        ));
        let stray = [
            Equation::new(Expr::pin(0), Expr::real(1.0)),
            Equation::new(Expr::pin(5), Expr::pin(0)),
        ];
        assert!(matches!(
            LinearSystem::from_equations(2, &stray, &params),
            Err(Error::PinOutOfRange { pin: 5, .. })
        ));
    }
}
