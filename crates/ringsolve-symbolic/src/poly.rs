//! Exact multivariate polynomials over parameter atoms.
//!
//! Coefficients are complex and arise only from sums and products of the
//! small constants appearing in field equations (±1, ±i), so arithmetic on
//! them is exact and zero terms can be pruned by comparison with zero.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::ops;

use ringsolve_core::C64;
use serde::{Deserialize, Serialize};

/// An indeterminate of a polynomial.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Atom {
    /// Named scalar parameter.
    Param(String),
    /// Propagation factor `(loss · z⁻¹)^length`.
    Propagation { loss: String, length: String },
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Param(name) => write!(f, "{name}"),
            Atom::Propagation { loss, length } => write!(f, "({loss}*z^-1)^{length}"),
        }
    }
}

/// A product of atoms with positive exponents.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<Atom, u32>);

impl Monomial {
    /// The empty product.
    pub fn one() -> Self {
        Self::default()
    }

    /// A single atom.
    pub fn atom(atom: Atom) -> Self {
        Self(BTreeMap::from([(atom, 1)]))
    }

    /// Atoms and exponents.
    pub fn factors(&self) -> impl Iterator<Item = (&Atom, u32)> {
        self.0.iter().map(|(a, &e)| (a, e))
    }

    fn mul(&self, other: &Monomial) -> Monomial {
        let mut out = self.0.clone();
        for (atom, exp) in &other.0 {
            *out.entry(atom.clone()).or_insert(0) += exp;
        }
        Monomial(out)
    }
}

/// A polynomial `Σ c_k · m_k` in the atoms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Term>", into = "Vec<Term>")]
pub struct Poly {
    terms: BTreeMap<Monomial, C64>,
}

/// Serialized form of one polynomial term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    re: f64,
    im: f64,
    factors: Vec<(Atom, u32)>,
}

impl From<Vec<Term>> for Poly {
    fn from(terms: Vec<Term>) -> Self {
        let mut p = Poly::zero();
        for t in terms {
            p.add_term(
                Monomial(t.factors.into_iter().collect()),
                C64::new(t.re, t.im),
            );
        }
        p
    }
}

impl From<Poly> for Vec<Term> {
    fn from(p: Poly) -> Self {
        p.terms
            .into_iter()
            .map(|(m, c)| Term {
                re: c.re,
                im: c.im,
                factors: m.0.into_iter().collect(),
            })
            .collect()
    }
}

impl Poly {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A constant.
    pub fn constant(c: C64) -> Self {
        let mut p = Self::zero();
        p.add_term(Monomial::one(), c);
        p
    }

    /// The constant one.
    pub fn one() -> Self {
        Self::constant(C64::new(1.0, 0.0))
    }

    /// A single atom with coefficient one.
    pub fn atom(atom: Atom) -> Self {
        let mut p = Self::zero();
        p.add_term(Monomial::atom(atom), C64::new(1.0, 0.0));
        p
    }

    /// True if every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of nonzero terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Terms in monomial order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, C64)> {
        self.terms.iter().map(|(m, &c)| (m, c))
    }

    fn add_term(&mut self, monomial: Monomial, c: C64) {
        if c == C64::new(0.0, 0.0) {
            return;
        }
        match self.terms.entry(monomial) {
            Entry::Occupied(mut e) => {
                *e.get_mut() += c;
                if *e.get() == C64::new(0.0, 0.0) {
                    e.remove();
                }
            }
            Entry::Vacant(e) => {
                e.insert(c);
            }
        }
    }

    /// Multiply every coefficient by `c`.
    pub fn scale(&self, c: C64) -> Poly {
        let mut out = Poly::zero();
        for (m, v) in &self.terms {
            out.add_term(m.clone(), v * c);
        }
        out
    }

    /// Evaluate with a value for every atom.
    pub fn evaluate(&self, mut value: impl FnMut(&Atom) -> C64) -> C64 {
        self.terms
            .iter()
            .map(|(m, &c)| {
                m.factors()
                    .fold(c, |acc, (atom, exp)| acc * value(atom).powu(exp))
            })
            .sum()
    }

    /// Atoms appearing in any term.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.terms.keys().flat_map(|m| m.0.keys())
    }
}

impl ops::Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, &c) in &rhs.terms {
            out.add_term(m.clone(), c);
        }
        out
    }
}

impl ops::Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, &c) in &rhs.terms {
            out.add_term(m.clone(), -c);
        }
        out
    }
}

impl ops::Mul for &Poly {
    type Output = Poly;

    fn mul(self, rhs: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (ma, &ca) in &self.terms {
            for (mb, &cb) in &rhs.terms {
                out.add_term(ma.mul(mb), ca * cb);
            }
        }
        out
    }
}

impl ops::Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        self.scale(C64::new(-1.0, 0.0))
    }
}

impl ops::AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, rhs: &Poly) {
        for (m, &c) in &rhs.terms {
            self.add_term(m.clone(), c);
        }
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (k, (m, c)) in self.terms.iter().enumerate() {
            if k > 0 {
                write!(f, " + ")?;
            }
            write!(f, "({} + {}*I)", c.re, c.im)?;
            for (atom, exp) in m.factors() {
                match exp {
                    1 => write!(f, "*{atom}")?,
                    _ => write!(f, "*{atom}^{exp}")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Poly {
        Poly::atom(Atom::Param("x".into()))
    }

    fn y() -> Poly {
        Poly::atom(Atom::Param("y".into()))
    }

    #[test]
    fn test_cancellation() {
        // (x + y)(x − y) − x² + y² = 0
        let p = &(&(&x() + &y()) * &(&x() - &y())) - &(&x() * &x());
        let p = &p + &(&y() * &y());
        assert!(p.is_zero(), "p = {p}");
    }

    #[test]
    fn test_evaluate() {
        let i = Poly::constant(C64::new(0.0, 1.0));
        // i·x·y + 2
        let p = &(&(&i * &x()) * &y()) + &Poly::constant(C64::new(2.0, 0.0));
        let v = p.evaluate(|a| match a {
            Atom::Param(n) if n == "x" => C64::new(3.0, 0.0),
            _ => C64::new(0.5, 0.0),
        });
        assert_eq!(v, C64::new(2.0, 1.5));
        assert_eq!(p.num_terms(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let p = &(&x() * &x()) + &Poly::atom(Atom::Propagation {
            loss: "gamma".into(),
            length: "l".into(),
        });
        let json = serde_json::to_string(&p).unwrap();
        let back: Poly = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
