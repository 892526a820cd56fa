//! Symbolic field equations in the z-domain.
//!
//! Expressions are built from pin amplitudes `A_i`, named parameters,
//! complex constants and propagation factors `(γ·z⁻¹)^L`, where both the
//! loss `γ` and the path length `L` are parameters. The path length is left
//! symbolic so that a topology is solved once for every choice of lengths.

use std::fmt;
use std::ops;

use ringsolve_core::C64;

/// Expression AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Complex constant.
    Constant(C64),
    /// Field amplitude `A_i` of pin `i`.
    Pin(usize),
    /// Named scalar parameter.
    Param(String),
    /// Propagation factor `(loss · z⁻¹)^length`.
    Propagation { loss: String, length: String },
    /// Binary operation.
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unary operation.
    UnaryOp { op: UnaryOp, operand: Box<Expr> },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

impl Expr {
    /// Pin amplitude `A_i`.
    pub fn pin(index: usize) -> Self {
        Expr::Pin(index)
    }

    /// Named parameter.
    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param(name.into())
    }

    /// Real constant.
    pub fn real(value: f64) -> Self {
        Expr::Constant(C64::new(value, 0.0))
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Expr::Constant(C64::new(0.0, 1.0))
    }

    /// Propagation factor `(loss · z⁻¹)^length`.
    pub fn propagation(loss: impl Into<String>, length: impl Into<String>) -> Self {
        Expr::Propagation {
            loss: loss.into(),
            length: length.into(),
        }
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs)
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Sub, self, rhs)
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Mul, self, rhs)
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(self),
        }
    }
}

fn write_constant(f: &mut fmt::Formatter<'_>, c: C64) -> fmt::Result {
    match (c.re, c.im) {
        (re, im) if im == 0.0 => write!(f, "{re}"),
        (re, im) if re == 0.0 && im == 1.0 => write!(f, "I"),
        (re, im) if re == 0.0 => write!(f, "{im}*I"),
        (re, im) => write!(f, "({re} + {im}*I)"),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write_constant(f, *c),
            Expr::Pin(i) => write!(f, "A_{i}"),
            Expr::Param(name) => write!(f, "{name}"),
            Expr::Propagation { loss, length } => write!(f, "({loss}*z^-1)^{length}"),
            Expr::BinaryOp { op, left, right } => {
                let symbol = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                };
                write!(f, "({left} {symbol} {right})")
            }
            Expr::UnaryOp {
                op: UnaryOp::Neg,
                operand,
            } => write!(f, "-{operand}"),
        }
    }
}

/// A symbolic equality `lhs = rhs`, linear in the pin amplitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Expr::param("sigma_1") * Expr::pin(0)
            + Expr::i() * Expr::param("kappa_1") * Expr::pin(1);
        assert_eq!(e.to_string(), "((sigma_1 * A_0) + ((I * kappa_1) * A_1))");

        let eq = Equation::new(Expr::pin(1), Expr::pin(3) * Expr::propagation("gamma", "l"));
        assert_eq!(eq.to_string(), "A_1 = (A_3 * (gamma*z^-1)^l)");
        assert_eq!((-Expr::real(2.0)).to_string(), "-2");
    }
}
