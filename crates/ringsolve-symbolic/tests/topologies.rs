//! End-to-end checks of the symbolic path against closed forms and a
//! direct numeric solve.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use ringsolve_core::C64;
use ringsolve_symbolic::{
    catalog, intrinsic_fwhm, Atom, EfficiencyConfig, NumericParameters, ParameterKind, Ring,
    SolutionCache, SymbolicCircuit, Topology, TwoHeadedRic,
};

fn ring_parameters(l: f64, kappa: f64, gamma: f64) -> NumericParameters {
    NumericParameters::from([
        ("l".to_string(), l),
        ("cross_coupling_1".to_string(), kappa),
        ("self_coupling_1".to_string(), (1.0 - kappa * kappa).sqrt()),
        ("unitary_loss_coefficient".to_string(), gamma),
    ])
}

fn cross_coupling(suffix: &str) -> f64 {
    match suffix {
        "1" => 0.3,
        "2" => 0.5,
        "a" => 0.4,
        _ => 0.6,
    }
}

/// Admissible values for every parameter of a topology.
fn sample_parameters(topology: &dyn Topology) -> NumericParameters {
    topology
        .parameter_symbols()
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            let value = match symbol.kind {
                ParameterKind::Length => (1 + i % 3) as f64,
                ParameterKind::Coefficient if symbol.name == topology.loss_parameter() => 0.99,
                ParameterKind::Coefficient => {
                    let (kind, suffix) = symbol.name.rsplit_once('_').unwrap();
                    let kappa = cross_coupling(suffix);
                    if kind == "cross_coupling" {
                        kappa
                    } else {
                        (1.0 - kappa * kappa).sqrt()
                    }
                }
            };
            (symbol.name.to_string(), value)
        })
        .collect()
}

#[test]
fn ring_through_port_matches_closed_form_at_dc() {
    let (kappa, gamma, l) = (0.5, 0.999, 5.0);
    let ring = SymbolicCircuit::new(Ring)
        .unwrap()
        .with_numeric_parameters(ring_parameters(l, kappa, gamma))
        .unwrap();

    let magnitude = ring.magnitude_response(2, &[0.0]).unwrap()[0];
    let sigma = (1.0f64 - kappa * kappa).sqrt();
    let a = gamma.powf(l);
    let expected = ((sigma - a) / (1.0 - sigma * a)).abs();
    assert!(
        (magnitude - expected).abs() < 1e-9,
        "|H_2(1)| = {magnitude}, expected {expected}"
    );
}

#[test]
fn lossless_ring_is_all_pass() {
    let ring = SymbolicCircuit::new(Ring)
        .unwrap()
        .with_numeric_parameters(ring_parameters(3.0, 0.4, 1.0))
        .unwrap();
    let (omegas, magnitude) = ring.magnitude_response_data(2).unwrap();
    assert_eq!(omegas.len(), 10_000);
    for (w, m) in omegas.iter().zip(&magnitude) {
        assert!((m - 1.0).abs() < 1e-9, "|H_2| = {m} at ω = {w}");
    }
}

#[test]
fn ring_poles_and_zeros() {
    let (kappa, gamma, l) = (0.5, 0.99, 4.0);
    let ring = SymbolicCircuit::new(Ring)
        .unwrap()
        .with_numeric_parameters(ring_parameters(l, kappa, gamma))
        .unwrap();
    let pz = ring.pole_zero(2).unwrap();
    let sigma = (1.0f64 - kappa * kappa).sqrt();

    assert_eq!(pz.poles.len(), 4);
    assert_eq!(pz.zeros.len(), 4);
    let pole_radius = gamma * sigma.powf(1.0 / l);
    let zero_radius = gamma / sigma.powf(1.0 / l);
    for p in &pz.poles {
        assert!((p.norm() - pole_radius).abs() < 1e-9, "pole {p}");
    }
    for z in &pz.zeros {
        assert!((z.norm() - zero_radius).abs() < 1e-9, "zero {z}");
    }
}

#[test]
fn lossless_efficiency_is_one() {
    let ring = SymbolicCircuit::new(Ring)
        .unwrap()
        .with_numeric_parameters(ring_parameters(4.0, 0.5, 1.0))
        .unwrap();
    let eta = ring.main_extraction_efficiency(3).unwrap();
    assert!((eta - 1.0).abs() < 1e-12, "efficiency {eta}");
}

#[test]
fn efficiency_approaches_one_as_loss_vanishes() {
    let (kappa, l) = (0.5, 4.0);
    let sigma = (1.0f64 - kappa * kappa).sqrt();
    let mut previous = f64::NEG_INFINITY;
    for gamma in [0.99, 0.999, 0.9999] {
        let ring = SymbolicCircuit::new(Ring)
            .unwrap()
            .with_numeric_parameters(ring_parameters(l, kappa, gamma))
            .unwrap();
        let eta = ring.main_extraction_efficiency(3).unwrap();

        let a = gamma.powf(l);
        let expected =
            1.0 - intrinsic_fwhm(a, l).unwrap() / intrinsic_fwhm(sigma * a, l).unwrap();
        assert!(
            (eta - expected).abs() < 1e-3,
            "γ = {gamma}: efficiency {eta}, closed form {expected}"
        );
        assert!(eta > previous);
        previous = eta;
    }
    assert!(previous > 0.99);
}

#[test]
fn efficiency_without_refinement_is_close() {
    let ring = SymbolicCircuit::new(Ring)
        .unwrap()
        .with_numeric_parameters(ring_parameters(4.0, 0.5, 0.999))
        .unwrap();
    let refined = ring.main_extraction_efficiency(3).unwrap();
    let coarse = ring
        .main_extraction_efficiency_with(
            3,
            &EfficiencyConfig {
                refine_samples: 0,
                ..EfficiencyConfig::default()
            },
        )
        .unwrap();
    assert!((refined - coarse).abs() < 1e-2);
}

#[test]
fn every_topology_agrees_with_numeric_solve() {
    let z = C64::from_polar(1.0, 0.7);
    for topology in catalog() {
        let params = sample_parameters(topology.as_ref());
        let system = topology.linear_system().unwrap();
        let (matrix, rhs) = system.evaluate(|atom| match atom {
            Atom::Param(name) => C64::new(params[name.as_str()], 0.0),
            Atom::Propagation { loss, length } => {
                (C64::new(params[loss.as_str()], 0.0) / z).powi(params[length.as_str()] as i32)
            }
        });
        let n = topology.num_pins();
        let a = DMatrix::from_fn(n, n, |r, c| matrix[r][c]);
        let b = DVector::from_vec(rhs);
        let expected = a.lu().solve(&b).unwrap();

        let name = topology.name();
        let circuit = SymbolicCircuit::new(topology)
            .unwrap()
            .with_numeric_parameters(params)
            .unwrap();
        for pin in 0..n {
            let h = circuit.numeric_solution(pin).unwrap().evaluate(z);
            assert!(
                (h - expected[pin]).norm() < 1e-9,
                "{name} pin {pin}: symbolic {h}, numeric {}",
                expected[pin]
            );
        }
    }
}

#[test]
fn lossless_topologies_are_all_pass() {
    // Every topology has a single bus output; without loss all input power
    // leaves through it.
    let omegas = [0.3, 1.1, 2.9];
    for topology in catalog() {
        let mut params = sample_parameters(topology.as_ref());
        params.insert(topology.loss_parameter().to_string(), 1.0);
        let output = match topology.name() {
            "RingResonator" | "PhotonicMolecule" => 2,
            _ => 6,
        };
        let name = topology.name();
        let circuit = SymbolicCircuit::new(topology)
            .unwrap()
            .with_numeric_parameters(params)
            .unwrap();

        for m in circuit.magnitude_response(output, &omegas).unwrap() {
            assert!((m - 1.0).abs() < 1e-9, "{name}: |H_{output}| = {m}");
        }
    }
}

#[test]
fn two_headed_ric_solves() {
    let circuit = SymbolicCircuit::new(TwoHeadedRic).unwrap();
    assert_eq!(circuit.solutions().num_pins(), 16);
    assert!(!circuit.solutions().denominator().is_zero());
}

#[test]
fn disk_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let first = SolutionCache::with_directory(dir.path());
    let solved = first.get_or_solve(&Ring).unwrap();

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let file_name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("RingResonator-"));
    assert!(file_name.ends_with(".json"));

    // A fresh cache reads the file instead of solving.
    let second = SolutionCache::with_directory(dir.path());
    let loaded = second.get_or_solve(&Ring).unwrap();
    assert_eq!(*loaded, *solved);
}

#[test]
fn stale_cache_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SolutionCache::with_directory(dir.path());
    let key = SolutionCache::key(&Ring.definition());
    let path = dir.path().join(format!("RingResonator-{key:016x}.json"));
    let reference = SolutionCache::in_memory().get_or_solve(&Ring).unwrap();

    // Right file name, different stored definition and a bogus solution.
    let bogus = SolutionCache::in_memory()
        .get_or_solve(&ringsolve_symbolic::PhotonicMolecule)
        .unwrap();
    let stale = serde_json::json!({ "definition": "stale", "solution": bogus.as_ref() });
    std::fs::write(&path, stale.to_string()).unwrap();
    assert_eq!(*cache.get_or_solve(&Ring).unwrap(), *reference);

    // Unparseable file.
    std::fs::write(&path, "{ not json").unwrap();
    let cache = SolutionCache::with_directory(dir.path());
    assert_eq!(*cache.get_or_solve(&Ring).unwrap(), *reference);
}

#[test]
fn missing_cache_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("solutions").join("v1");
    let cache = SolutionCache::with_directory(&nested);
    cache.get_or_solve(&Ring).unwrap();
    assert_eq!(std::fs::read_dir(&nested).unwrap().count(), 1);

    // Unwritable location: solving still succeeds.
    let blocked = dir.path().join("file");
    std::fs::write(&blocked, "").unwrap();
    let cache = SolutionCache::with_directory(blocked.join("sub"));
    assert!(cache.get_or_solve(&Ring).is_ok());
}
