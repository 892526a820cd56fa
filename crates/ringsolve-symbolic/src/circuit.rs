//! A topology with its cached symbolic solution and numeric parameters.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::cache::SolutionCache;
use crate::efficiency::{extraction_efficiency, EfficiencyConfig};
use crate::error::{Error, Result};
use crate::params::{validate, NumericParameters};
use crate::poly::Poly;
use crate::solve::SymbolicSolution;
use crate::topology::{Ring, Topology};
use crate::transfer::{linspace, substitute, PoleZero, TransferFunction, DEFAULT_CANCELLATION_TOLERANCE};

/// Samples of the default `[0, 2π]` response grid.
pub const DEFAULT_RESPONSE_SAMPLES: usize = 10_000;

/// Symbolic circuit: solve once, then substitute numbers as often as needed.
#[derive(Debug)]
pub struct SymbolicCircuit<T: Topology> {
    topology: T,
    solution: Arc<SymbolicSolution>,
    parameters: Option<NumericParameters>,
}

impl<T: Topology> SymbolicCircuit<T> {
    /// Solve `topology` through the process-wide cache.
    pub fn new(topology: T) -> Result<Self> {
        Self::with_cache(topology, SolutionCache::global())
    }

    /// Solve `topology` through `cache`.
    pub fn with_cache(topology: T, cache: &SolutionCache) -> Result<Self> {
        let solution = cache.get_or_solve(&topology)?;
        Ok(Self {
            topology,
            solution,
            parameters: None,
        })
    }

    pub fn topology(&self) -> &T {
        &self.topology
    }

    /// Solutions for every pin.
    pub fn solutions(&self) -> &SymbolicSolution {
        &self.solution
    }

    /// `(numerator, denominator)` of pin `pin`.
    pub fn solution(&self, pin: usize) -> Result<(&Poly, &Poly)> {
        let numerator = self.solution.numerator(pin).ok_or(Error::PinOutOfRange {
            pin,
            num_pins: self.topology.num_pins(),
        })?;
        Ok((numerator, self.solution.denominator()))
    }

    /// Set the numeric parameters. The key set must match the topology's
    /// parameter symbols exactly.
    pub fn set_numeric_parameters(&mut self, values: NumericParameters) -> Result<()> {
        validate(self.topology.parameter_symbols(), &values)?;
        self.parameters = Some(values);
        Ok(())
    }

    /// Builder form of [`set_numeric_parameters`](Self::set_numeric_parameters).
    pub fn with_numeric_parameters(mut self, values: NumericParameters) -> Result<Self> {
        self.set_numeric_parameters(values)?;
        Ok(self)
    }

    pub fn numeric_parameters(&self) -> Option<&NumericParameters> {
        self.parameters.as_ref()
    }

    fn parameters(&self) -> Result<&NumericParameters> {
        self.parameters.as_ref().ok_or(Error::ParametersNotSet)
    }

    /// Rational function of `z` for pin `pin` at the current parameters.
    pub fn numeric_solution(&self, pin: usize) -> Result<TransferFunction> {
        let parameters = self.parameters()?;
        let (numerator, denominator) = self.solution(pin)?;
        Ok(TransferFunction::new(
            substitute(numerator, parameters)?,
            substitute(denominator, parameters)?,
        ))
    }

    /// `|H(e^{iω})|` of pin `pin`.
    pub fn magnitude_response(&self, pin: usize, omegas: &[f64]) -> Result<Vec<f64>> {
        Ok(self.numeric_solution(pin)?.magnitude_response(omegas))
    }

    /// `(ω, |H(e^{iω})|)` over the default grid on `[0, 2π]`.
    pub fn magnitude_response_data(&self, pin: usize) -> Result<(Vec<f64>, Vec<f64>)> {
        let omegas = linspace(0.0, 2.0 * PI, DEFAULT_RESPONSE_SAMPLES);
        let magnitude = self.magnitude_response(pin, &omegas)?;
        Ok((omegas, magnitude))
    }

    /// `arg H(e^{iω})` of pin `pin`.
    pub fn phase_response(&self, pin: usize, omegas: &[f64]) -> Result<Vec<f64>> {
        Ok(self.numeric_solution(pin)?.phase_response(omegas))
    }

    /// Poles and zeros of pin `pin`, coincident pairs cancelled.
    pub fn pole_zero(&self, pin: usize) -> Result<PoleZero> {
        self.pole_zero_with(pin, DEFAULT_CANCELLATION_TOLERANCE)
    }

    pub fn pole_zero_with(&self, pin: usize, tolerance: f64) -> Result<PoleZero> {
        self.numeric_solution(pin)?.pole_zero(tolerance)
    }

    /// Round-trip length and amplitude `(L, γ^L)` of the main cavity.
    pub fn main_cavity(&self) -> Result<(f64, f64)> {
        let parameters = self.parameters()?;
        let mut length = 0.0;
        for name in self.topology.main_cavity_lengths() {
            length += parameter(parameters, name)?;
        }
        let gamma = parameter(parameters, self.topology.loss_parameter())?;
        Ok((length, gamma.powf(length)))
    }

    /// Extraction efficiency of the main resonance seen at pin `pin`.
    pub fn main_extraction_efficiency(&self, pin: usize) -> Result<f64> {
        self.main_extraction_efficiency_with(pin, &EfficiencyConfig::default())
    }

    pub fn main_extraction_efficiency_with(
        &self,
        pin: usize,
        config: &EfficiencyConfig,
    ) -> Result<f64> {
        let h = self.numeric_solution(pin)?;
        let (length, amplitude) = self.main_cavity()?;
        extraction_efficiency(&h, amplitude, length, config)
    }

    /// A single ring with the same first coupler, loss and main cavity
    /// length, for comparing responses.
    pub fn reference_ring(&self) -> Result<SymbolicCircuit<Ring>> {
        let parameters = self.parameters()?;
        let (length, _) = self.main_cavity()?;
        let mut values = NumericParameters::new();
        values.insert("l".into(), length);
        for name in ["cross_coupling_1", "self_coupling_1", self.topology.loss_parameter()] {
            values.insert(name.to_string(), parameter(parameters, name)?);
        }
        SymbolicCircuit::new(Ring)?.with_numeric_parameters(values)
    }
}

fn parameter(parameters: &NumericParameters, name: &str) -> Result<f64> {
    parameters
        .get(name)
        .copied()
        .ok_or_else(|| Error::UndeclaredParameter(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Equation;
    use crate::params::ParameterSymbol;

    fn ring_parameters(l: f64, kappa: f64, gamma: f64) -> NumericParameters {
        NumericParameters::from([
            ("l".to_string(), l),
            ("cross_coupling_1".to_string(), kappa),
            ("self_coupling_1".to_string(), (1.0 - kappa * kappa).sqrt()),
            ("unitary_loss_coefficient".to_string(), gamma),
        ])
    }

    #[test]
    fn test_requires_parameters() {
        let circuit = SymbolicCircuit::new(Ring).unwrap();
        assert!(matches!(
            circuit.magnitude_response(2, &[0.0]),
            Err(Error::ParametersNotSet)
        ));
        assert!(matches!(circuit.pole_zero(2), Err(Error::ParametersNotSet)));
        assert!(matches!(
            circuit.main_extraction_efficiency(3),
            Err(Error::ParametersNotSet)
        ));
    }

    #[test]
    fn test_parameter_keys_must_match() {
        let mut circuit = SymbolicCircuit::new(Ring).unwrap();
        let mut values = ring_parameters(5.0, 0.5, 0.999);
        values.remove("l");
        values.insert("m".into(), 5.0);
        match circuit.set_numeric_parameters(values) {
            Err(Error::ParameterMismatch {
                missing,
                unexpected,
            }) => {
                assert_eq!(missing, vec!["l".to_string()]);
                assert_eq!(unexpected, vec!["m".to_string()]);
            }
            other => panic!("expected ParameterMismatch, got {other:?}"),
        }
        assert!(circuit.numeric_parameters().is_none());
    }

    #[test]
    fn test_pin_out_of_range() {
        let circuit = SymbolicCircuit::new(Ring)
            .unwrap()
            .with_numeric_parameters(ring_parameters(5.0, 0.5, 0.999))
            .unwrap();
        assert!(matches!(
            circuit.numeric_solution(4),
            Err(Error::PinOutOfRange { pin: 4, num_pins: 4 })
        ));
    }

    #[test]
    fn test_long_cavity_pole_zero_is_refused() {
        let circuit = SymbolicCircuit::new(Ring)
            .unwrap()
            .with_numeric_parameters(ring_parameters(5000.0, 0.5, 0.999))
            .unwrap();
        assert!(matches!(
            circuit.pole_zero(2),
            Err(Error::DegreeTooHigh { degree, .. }) if degree >= 5000
        ));
        let magnitude = circuit.magnitude_response(2, &[0.0, 1.0]).unwrap();
        assert!(magnitude.iter().all(|m| m.is_finite()));
    }

    /// A ring that names a cavity length it never declares.
    struct MisnamedCavity;

    impl Topology for MisnamedCavity {
        fn name(&self) -> &'static str {
            "MisnamedCavity"
        }

        fn num_pins(&self) -> usize {
            Ring.num_pins()
        }

        fn parameter_symbols(&self) -> &'static [ParameterSymbol] {
            Ring.parameter_symbols()
        }

        fn equations(&self) -> Vec<Equation> {
            Ring.equations()
        }

        fn main_cavity_lengths(&self) -> &'static [&'static str] {
            &["m"]
        }
    }

    #[test]
    fn test_undeclared_cavity_length_is_an_error() {
        let circuit = SymbolicCircuit::with_cache(MisnamedCavity, &SolutionCache::in_memory())
            .unwrap()
            .with_numeric_parameters(ring_parameters(5.0, 0.5, 0.999))
            .unwrap();
        assert!(matches!(
            circuit.main_cavity(),
            Err(Error::UndeclaredParameter(name)) if name == "m"
        ));
        assert!(matches!(
            circuit.main_extraction_efficiency(2),
            Err(Error::UndeclaredParameter(_))
        ));
    }

    #[test]
    fn test_reference_ring() {
        let circuit = SymbolicCircuit::new(crate::topology::ResonantInterferometricCoupler)
            .unwrap()
            .with_numeric_parameters(NumericParameters::from([
                ("m_1".to_string(), 2.0),
                ("m_2".to_string(), 2.0),
                ("n_1".to_string(), 1.0),
                ("n_2".to_string(), 1.0),
                ("p".to_string(), 3.0),
                ("cross_coupling_1".to_string(), 0.2),
                ("cross_coupling_2".to_string(), 0.2),
                ("cross_coupling_a".to_string(), 0.4),
                ("self_coupling_1".to_string(), 0.96f64.sqrt()),
                ("self_coupling_2".to_string(), 0.96f64.sqrt()),
                ("self_coupling_a".to_string(), 0.84f64.sqrt()),
                ("unitary_loss_coefficient".to_string(), 0.999),
            ]))
            .unwrap();
        let reference = circuit.reference_ring().unwrap();
        let params = reference.numeric_parameters().unwrap();
        assert_eq!(params["l"], 4.0);
        assert_eq!(params["cross_coupling_1"], 0.2);
    }
}
