//! Circuit topologies as symbolic equation sets.
//!
//! Pins are numbered per topology. A coupler block relates inputs `(a, b)` to
//! outputs `(c, d)` by `c = σ·a + iκ·b`, `d = iκ·a + σ·b`; a waveguide of
//! integer length `L` delays by `(γ·z⁻¹)^L`. Pin 0 is driven with unit
//! amplitude.

use std::fmt::Write;

use crate::error::Result;
use crate::expr::{Equation, Expr};
use crate::linear::LinearSystem;
use crate::params::{ParameterKind, ParameterSymbol};

/// Name of the per-unit-length amplitude loss parameter.
pub const LOSS: &str = "unitary_loss_coefficient";

/// A circuit described by linear equations over its pin amplitudes.
pub trait Topology: Send + Sync {
    /// Stable display name.
    fn name(&self) -> &'static str;

    fn num_pins(&self) -> usize;

    /// Every parameter the equations may reference.
    fn parameter_symbols(&self) -> &'static [ParameterSymbol];

    /// One equation per pin.
    fn equations(&self) -> Vec<Equation>;

    /// Path-length parameters summing to the main cavity round trip.
    fn main_cavity_lengths(&self) -> &'static [&'static str];

    /// Loss parameter shared by all waveguides.
    fn loss_parameter(&self) -> &'static str {
        LOSS
    }

    /// Canonical text of the definition; two topologies with the same text
    /// have the same solution.
    fn definition(&self) -> String {
        let mut text = format!("{} pins={}\n", self.name(), self.num_pins());
        for symbol in self.parameter_symbols() {
            let kind = match symbol.kind {
                ParameterKind::Length => "length",
                ParameterKind::Coefficient => "coefficient",
            };
            let _ = writeln!(text, "param {} {kind}", symbol.name);
        }
        for equation in self.equations() {
            let _ = writeln!(text, "{equation}");
        }
        text
    }

    /// Linearized equations, checked against the declared parameters.
    fn linear_system(&self) -> Result<LinearSystem> {
        LinearSystem::from_equations(
            self.num_pins(),
            &self.equations(),
            self.parameter_symbols(),
        )
    }
}

impl<T: Topology + ?Sized> Topology for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn num_pins(&self) -> usize {
        (**self).num_pins()
    }

    fn parameter_symbols(&self) -> &'static [ParameterSymbol] {
        (**self).parameter_symbols()
    }

    fn equations(&self) -> Vec<Equation> {
        (**self).equations()
    }

    fn main_cavity_lengths(&self) -> &'static [&'static str] {
        (**self).main_cavity_lengths()
    }

    fn loss_parameter(&self) -> &'static str {
        (**self).loss_parameter()
    }

    fn definition(&self) -> String {
        (**self).definition()
    }
}

fn drive(pin: usize) -> Equation {
    Equation::new(Expr::pin(pin), Expr::real(1.0))
}

/// Coupler with inputs `(a, b)` and outputs `(c, d)`, coupling suffix `k`.
fn coupler(a: usize, b: usize, c: usize, d: usize, k: &str) -> [Equation; 2] {
    let sigma = || Expr::param(format!("self_coupling_{k}"));
    let kappa = || Expr::param(format!("cross_coupling_{k}"));
    [
        Equation::new(
            Expr::pin(c),
            sigma() * Expr::pin(a) + Expr::i() * kappa() * Expr::pin(b),
        ),
        Equation::new(
            Expr::pin(d),
            Expr::i() * kappa() * Expr::pin(a) + sigma() * Expr::pin(b),
        ),
    ]
}

/// `A_to = A_from·(γ z⁻¹)^length`.
fn waveguide(to: usize, from: usize, length: &str) -> Equation {
    Equation::new(
        Expr::pin(to),
        Expr::pin(from) * Expr::propagation(LOSS, length),
    )
}

/// Single all-pass ring: bus `0 → 2`, ring `3 → 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ring;

impl Topology for Ring {
    fn name(&self) -> &'static str {
        "RingResonator"
    }

    fn num_pins(&self) -> usize {
        4
    }

    fn parameter_symbols(&self) -> &'static [ParameterSymbol] {
        const SYMBOLS: &[ParameterSymbol] = &[
            ParameterSymbol::length("l"),
            ParameterSymbol::coefficient("cross_coupling_1"),
            ParameterSymbol::coefficient("self_coupling_1"),
            ParameterSymbol::coefficient(LOSS),
        ];
        SYMBOLS
    }

    fn equations(&self) -> Vec<Equation> {
        let mut eqs = vec![drive(0)];
        eqs.extend(coupler(0, 1, 2, 3, "1"));
        eqs.push(waveguide(1, 3, "l"));
        eqs
    }

    fn main_cavity_lengths(&self) -> &'static [&'static str] {
        &["l"]
    }
}

/// Two couplers closed into a loop: arm `p` feeds coupler 2 from the
/// through port of coupler 1; arms `n` and `m` close the cavity.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterferometricCoupler;

impl Topology for InterferometricCoupler {
    fn name(&self) -> &'static str {
        "InterferometricCoupler"
    }

    fn num_pins(&self) -> usize {
        8
    }

    fn parameter_symbols(&self) -> &'static [ParameterSymbol] {
        const SYMBOLS: &[ParameterSymbol] = &[
            ParameterSymbol::length("m"),
            ParameterSymbol::length("n"),
            ParameterSymbol::length("p"),
            ParameterSymbol::coefficient("cross_coupling_1"),
            ParameterSymbol::coefficient("cross_coupling_2"),
            ParameterSymbol::coefficient("self_coupling_1"),
            ParameterSymbol::coefficient("self_coupling_2"),
            ParameterSymbol::coefficient(LOSS),
        ];
        SYMBOLS
    }

    fn equations(&self) -> Vec<Equation> {
        let mut eqs = vec![drive(0)];
        eqs.extend(coupler(0, 1, 2, 3, "1"));
        eqs.extend(coupler(4, 5, 6, 7, "2"));
        eqs.push(waveguide(5, 3, "n"));
        eqs.push(waveguide(1, 7, "m"));
        eqs.push(waveguide(4, 2, "p"));
        eqs
    }

    fn main_cavity_lengths(&self) -> &'static [&'static str] {
        &["m", "n"]
    }
}

/// Main ring (`m_1`, `m_2`) coupled to a second ring of length `p`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotonicMolecule;

impl Topology for PhotonicMolecule {
    fn name(&self) -> &'static str {
        "PhotonicMolecule"
    }

    fn num_pins(&self) -> usize {
        8
    }

    fn parameter_symbols(&self) -> &'static [ParameterSymbol] {
        const SYMBOLS: &[ParameterSymbol] = &[
            ParameterSymbol::length("m_1"),
            ParameterSymbol::length("m_2"),
            ParameterSymbol::length("p"),
            ParameterSymbol::coefficient("cross_coupling_1"),
            ParameterSymbol::coefficient("cross_coupling_2"),
            ParameterSymbol::coefficient("self_coupling_1"),
            ParameterSymbol::coefficient("self_coupling_2"),
            ParameterSymbol::coefficient(LOSS),
        ];
        SYMBOLS
    }

    fn equations(&self) -> Vec<Equation> {
        let mut eqs = vec![drive(0)];
        eqs.extend(coupler(0, 1, 2, 3, "1"));
        eqs.extend(coupler(4, 5, 6, 7, "2"));
        eqs.push(waveguide(5, 3, "m_2"));
        eqs.push(waveguide(1, 7, "m_1"));
        eqs.push(waveguide(4, 6, "p"));
        eqs
    }

    fn main_cavity_lengths(&self) -> &'static [&'static str] {
        &["m_1", "m_2"]
    }
}

/// Main ring whose inner arm (`n_1`, `n_2`) passes an auxiliary ring of
/// length `p`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResonantInterferometricCoupler;

impl Topology for ResonantInterferometricCoupler {
    fn name(&self) -> &'static str {
        "ResonantInterferometricCoupler"
    }

    fn num_pins(&self) -> usize {
        12
    }

    fn parameter_symbols(&self) -> &'static [ParameterSymbol] {
        const SYMBOLS: &[ParameterSymbol] = &[
            ParameterSymbol::length("m_1"),
            ParameterSymbol::length("m_2"),
            ParameterSymbol::length("n_1"),
            ParameterSymbol::length("n_2"),
            ParameterSymbol::length("p"),
            ParameterSymbol::coefficient("cross_coupling_1"),
            ParameterSymbol::coefficient("cross_coupling_2"),
            ParameterSymbol::coefficient("cross_coupling_a"),
            ParameterSymbol::coefficient("self_coupling_1"),
            ParameterSymbol::coefficient("self_coupling_2"),
            ParameterSymbol::coefficient("self_coupling_a"),
            ParameterSymbol::coefficient(LOSS),
        ];
        SYMBOLS
    }

    fn equations(&self) -> Vec<Equation> {
        let mut eqs = vec![drive(0)];
        eqs.extend(coupler(0, 1, 2, 3, "1"));
        eqs.extend(coupler(4, 5, 6, 7, "2"));
        eqs.extend(coupler(8, 9, 10, 11, "a"));
        eqs.push(waveguide(5, 3, "m_2"));
        eqs.push(waveguide(1, 7, "m_1"));
        eqs.push(waveguide(4, 10, "n_2"));
        eqs.push(waveguide(8, 2, "n_1"));
        eqs.push(waveguide(9, 11, "p"));
        eqs
    }

    fn main_cavity_lengths(&self) -> &'static [&'static str] {
        &["m_1", "m_2"]
    }
}

/// Interferometric arm passing two auxiliary rings in cascade: `n_1` into
/// ring `a` (length `p_1`), `n_2` into ring `b` (length `p_2`), `n_3` back
/// to the second main coupler.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoHeadedRic;

impl Topology for TwoHeadedRic {
    fn name(&self) -> &'static str {
        "TwoHeadedResonantInterferometricCoupler"
    }

    fn num_pins(&self) -> usize {
        16
    }

    fn parameter_symbols(&self) -> &'static [ParameterSymbol] {
        const SYMBOLS: &[ParameterSymbol] = &[
            ParameterSymbol::length("m_1"),
            ParameterSymbol::length("m_2"),
            ParameterSymbol::length("n_1"),
            ParameterSymbol::length("n_2"),
            ParameterSymbol::length("n_3"),
            ParameterSymbol::length("p_1"),
            ParameterSymbol::length("p_2"),
            ParameterSymbol::coefficient("cross_coupling_1"),
            ParameterSymbol::coefficient("cross_coupling_2"),
            ParameterSymbol::coefficient("cross_coupling_a"),
            ParameterSymbol::coefficient("cross_coupling_b"),
            ParameterSymbol::coefficient("self_coupling_1"),
            ParameterSymbol::coefficient("self_coupling_2"),
            ParameterSymbol::coefficient("self_coupling_a"),
            ParameterSymbol::coefficient("self_coupling_b"),
            ParameterSymbol::coefficient(LOSS),
        ];
        SYMBOLS
    }

    fn equations(&self) -> Vec<Equation> {
        let mut eqs = vec![drive(0)];
        eqs.extend(coupler(0, 1, 2, 3, "1"));
        eqs.extend(coupler(4, 5, 6, 7, "2"));
        eqs.extend(coupler(8, 9, 10, 11, "a"));
        eqs.extend(coupler(12, 13, 14, 15, "b"));
        eqs.push(waveguide(5, 3, "m_2"));
        eqs.push(waveguide(1, 7, "m_1"));
        eqs.push(waveguide(8, 2, "n_1"));
        eqs.push(waveguide(12, 10, "n_2"));
        eqs.push(waveguide(4, 14, "n_3"));
        eqs.push(waveguide(9, 11, "p_1"));
        eqs.push(waveguide(13, 15, "p_2"));
        eqs
    }

    fn main_cavity_lengths(&self) -> &'static [&'static str] {
        &["m_1", "m_2"]
    }
}

/// All built-in topologies.
pub fn catalog() -> Vec<Box<dyn Topology>> {
    vec![
        Box::new(Ring),
        Box::new(InterferometricCoupler),
        Box::new(PhotonicMolecule),
        Box::new(ResonantInterferometricCoupler),
        Box::new(TwoHeadedRic),
    ]
}

/// Look up a built-in topology by name, ignoring case.
pub fn by_name(name: &str) -> Option<Box<dyn Topology>> {
    catalog()
        .into_iter()
        .find(|t| t.name().eq_ignore_ascii_case(name))
}
