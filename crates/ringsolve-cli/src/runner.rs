//! Job execution and result output.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ringsolve_core::units::frequency_to_wavelength;
use ringsolve_core::{Composite, Dispersion, PinAllocator, PinId, Structure, C64};
use ringsolve_devices::{
    AddDropFilter, ResonantInterferometricCoupler, RingResonator, Source, Waveguide,
};
use ringsolve_solver::{generate_frequencies, solve_structure, SolveConfig, SweepParams};
use ringsolve_symbolic::{
    by_name, catalog, linspace, NumericParameters, PoleZero, SolutionCache, SymbolicCircuit,
    Topology,
};
use serde::Serialize;

use crate::config::{CircuitConfig, JobConfig, SweepConfig, SymbolicConfig};

const ONE: C64 = C64::new(1.0, 0.0);
const ZERO: C64 = C64::new(0.0, 0.0);

/// A named data column.
#[derive(Debug, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Result of a numeric sweep.
#[derive(Debug, Serialize)]
pub struct SweepOutput {
    pub circuit: String,
    pub columns: Vec<Column>,
    /// Indices of samples whose solve failed.
    pub failed_samples: Vec<usize>,
}

/// Result of a symbolic response job.
#[derive(Debug, Serialize)]
pub struct ResponseOutput {
    pub topology: String,
    pub columns: Vec<Column>,
    pub pole_zero: BTreeMap<usize, PoleZero>,
    pub efficiency: Option<f64>,
}

/// A driven device circuit ready to solve.
pub struct BuiltCircuit {
    pub structure: Box<dyn Structure>,
    pub ports: Vec<(&'static str, PinId)>,
    /// Angular free spectral range of the main cavity (rad/s).
    pub free_spectral_range: f64,
}

/// Build the circuit of a job, adding sources where the device needs them.
pub fn build_circuit(config: &CircuitConfig, dispersion: Dispersion) -> Result<BuiltCircuit> {
    let mut alloc = PinAllocator::new();
    let built = match config {
        CircuitConfig::Waveguide {
            length,
            phase_delay,
        } => {
            let length = *length;
            let pins = alloc.allocate_n(Waveguide::NUM_PINS);
            let mut top = Composite::new("Waveguide", pins.clone(), dispersion);
            top.add(Source::with_pins(ONE, &pins[..1])?)?;
            top.add(Waveguide::with_pins(length, dispersion, &pins)?.with_phase_delay(*phase_delay))?;
            BuiltCircuit {
                free_spectral_range: top.free_spectral_range(length),
                structure: Box::new(top),
                ports: vec![("input", pins[0]), ("output", pins[1])],
            }
        }
        CircuitConfig::Ring(params) => {
            let pins = alloc.allocate_n(RingResonator::NUM_PINS);
            let ring = RingResonator::with_pins(*params, dispersion, &pins)?;
            let ports = vec![
                ("input", ring.input()),
                ("through", ring.through()),
                ("ring_in", ring.ring_in()),
                ("ring_out", ring.ring_out()),
            ];
            let free_spectral_range = ring.free_spectral_range();
            let mut top = Composite::new("DrivenRing", pins.clone(), dispersion);
            top.add(Source::with_pins(ONE, &pins[..1])?)?;
            top.add(ring)?;
            BuiltCircuit {
                structure: Box::new(top),
                ports,
                free_spectral_range,
            }
        }
        CircuitConfig::AddDrop(params) => {
            let pins = alloc.allocate_n(8);
            let filter = AddDropFilter::with_pins(*params, dispersion, &pins)?;
            let ports = vec![
                ("input", filter.input()),
                ("through", filter.through()),
                ("add", filter.add_port()),
                ("drop", filter.drop_port()),
            ];
            let free_spectral_range = filter.free_spectral_range();
            let mut top = Composite::new("DrivenAddDrop", pins.clone(), dispersion);
            top.add(Source::with_pins(ONE, &[filter.input()])?)?;
            top.add(Source::with_pins(ZERO, &[filter.add_port()])?)?;
            top.add(filter)?;
            BuiltCircuit {
                structure: Box::new(top),
                ports,
                free_spectral_range,
            }
        }
        CircuitConfig::Ric(params) => {
            let ric = ResonantInterferometricCoupler::new(&mut alloc, *params, dispersion)?;
            let [(arm1_start, arm1_end), (arm2_start, arm2_end)] = ric.interferometer_arms();
            BuiltCircuit {
                ports: vec![
                    ("input", ric.input()),
                    ("drop", ric.drop_port()),
                    ("arm1_start", arm1_start),
                    ("arm1_end", arm1_end),
                    ("arm2_start", arm2_start),
                    ("arm2_end", arm2_end),
                ],
                free_spectral_range: ric.free_spectral_range(),
                structure: Box::new(ric),
            }
        }
    };
    Ok(built)
}

/// Angular frequencies of a sweep section.
pub fn sweep_frequencies(sweep: &SweepConfig, free_spectral_range: f64) -> Result<Vec<f64>> {
    let params = match sweep {
        SweepConfig::Range {
            start,
            stop,
            points,
        } => SweepParams::linear(*start, *stop, *points),
        SweepConfig::Wavelength {
            wavelength,
            fsr_count,
            points,
        } => {
            if !(free_spectral_range.is_finite() && free_spectral_range > 0.0) {
                bail!("a free-spectral-range sweep needs a cavity of nonzero length");
            }
            SweepParams::spanning_fsr(*wavelength, free_spectral_range, *fsr_count, *points)
        }
    };
    params.validate()?;
    Ok(generate_frequencies(&params))
}

fn select_ports<'a>(
    ports: &'a [(&'static str, PinId)],
    wanted: &[String],
) -> Result<Vec<&'a (&'static str, PinId)>> {
    if wanted.is_empty() {
        return Ok(ports.iter().collect());
    }
    wanted
        .iter()
        .map(|name| {
            ports.iter().find(|(n, _)| n == name).with_context(|| {
                let names: Vec<_> = ports.iter().map(|(n, _)| *n).collect();
                format!("unknown port {name:?}; available: {}", names.join(", "))
            })
        })
        .collect()
}

/// Run the numeric sweep of a job.
pub fn run_sweep(job: &JobConfig) -> Result<SweepOutput> {
    let (Some(circuit), Some(sweep)) = (&job.circuit, &job.sweep) else {
        bail!("a sweep job needs [circuit] and [sweep] sections");
    };
    let built = build_circuit(circuit, job.dispersion)?;
    let omegas = sweep_frequencies(sweep, built.free_spectral_range)?;
    let ports = select_ports(&built.ports, &job.output.ports)?;

    println!(
        "Sweeping {} ({} pins) over {} samples",
        built.structure.name(),
        built.structure.num_pins(),
        omegas.len()
    );
    let solution = solve_structure(built.structure.as_ref(), &omegas, &SolveConfig::default())?;
    if !solution.is_complete() {
        log::warn!("{} samples failed to solve", solution.failures().len());
    }

    let wavelengths_nm = omegas
        .iter()
        .map(|&w| frequency_to_wavelength(w) * 1e9)
        .collect();
    let mut columns = vec![
        Column::new("omega_rad_per_s", omegas.clone()),
        Column::new("wavelength_nm", wavelengths_nm),
    ];
    for (name, pin) in ports {
        columns.push(Column::new(format!("transmission_{name}"), solution.transmission(*pin)?));
        columns.push(Column::new(format!("phase_{name}"), solution.phase(*pin)?));
    }
    if let CircuitConfig::Ric(_) = circuit {
        let start = built.ports.iter().find(|(n, _)| *n == "arm1_start");
        let end = built.ports.iter().find(|(n, _)| *n == "arm2_end");
        if let (Some((_, from)), Some((_, to))) = (start, end) {
            columns.push(Column::new(
                "interferometer_phase",
                solution.phase_difference(*from, *to)?,
            ));
        }
    }

    Ok(SweepOutput {
        circuit: built.structure.name().to_string(),
        columns,
        failed_samples: solution.failures().iter().map(|f| f.index).collect(),
    })
}

fn resolve_topology(name: &str) -> Result<Box<dyn Topology>> {
    by_name(name).with_context(|| {
        let names: Vec<_> = catalog().iter().map(|t| t.name()).collect();
        format!("unknown topology {name:?}; available: {}", names.join(", "))
    })
}

/// Fill in `self_coupling_k = sqrt(1 − κ_k²)` where only `cross_coupling_k`
/// is given and the topology declares both.
pub fn complete_parameters(topology: &dyn Topology, given: &NumericParameters) -> NumericParameters {
    let mut values = given.clone();
    for symbol in topology.parameter_symbols() {
        let Some(suffix) = symbol.name.strip_prefix("self_coupling_") else {
            continue;
        };
        if values.contains_key(symbol.name) {
            continue;
        }
        if let Some(kappa) = given.get(&format!("cross_coupling_{suffix}")) {
            values.insert(symbol.name.to_string(), (1.0 - kappa * kappa).sqrt());
        }
    }
    values
}

fn symbolic_circuit(sym: &SymbolicConfig) -> Result<SymbolicCircuit<Box<dyn Topology>>> {
    let topology = resolve_topology(&sym.topology)?;
    let parameters = complete_parameters(topology.as_ref(), &sym.parameters);
    let local;
    let cache = match &sym.cache_dir {
        Some(dir) => {
            local = SolutionCache::with_directory(dir);
            &local
        }
        None => SolutionCache::global(),
    };
    let circuit = SymbolicCircuit::with_cache(topology, cache)?.with_numeric_parameters(parameters)?;
    for &pin in &sym.pins {
        if pin >= circuit.topology().num_pins() {
            bail!(
                "pin {pin} out of range for {} ({} pins)",
                circuit.topology().name(),
                circuit.topology().num_pins()
            );
        }
    }
    Ok(circuit)
}

/// Run the symbolic response of a job.
pub fn run_response(job: &JobConfig) -> Result<ResponseOutput> {
    let Some(sym) = &job.symbolic else {
        bail!("a response job needs a [symbolic] section");
    };
    let circuit = symbolic_circuit(sym)?;
    let omegas = linspace(sym.omega.start, sym.omega.stop, sym.omega.points);
    println!(
        "Evaluating {} at {} normalized frequencies",
        circuit.topology().name(),
        omegas.len()
    );

    let mut columns = vec![Column::new("omega", omegas.clone())];
    let mut pole_zero = BTreeMap::new();
    for &pin in &sym.pins {
        let h = circuit.numeric_solution(pin)?;
        columns.push(Column::new(format!("magnitude_{pin}"), h.magnitude_response(&omegas)));
        columns.push(Column::new(format!("phase_{pin}"), h.phase_response(&omegas)));
        if sym.pole_zero {
            pole_zero.insert(pin, circuit.pole_zero(pin)?);
        }
    }

    if sym.reference_ring {
        let reference = circuit.reference_ring()?;
        let ring_pins = reference.topology().num_pins();
        for &pin in sym.pins.iter().filter(|&&p| p < ring_pins) {
            columns.push(Column::new(
                format!("reference_magnitude_{pin}"),
                reference.magnitude_response(pin, &omegas)?,
            ));
        }
    }

    let efficiency = sym
        .efficiency_pin
        .map(|pin| circuit.main_extraction_efficiency(pin))
        .transpose()?;
    if let Some(eta) = efficiency {
        println!("Main extraction efficiency: {:.1} %", eta * 100.0);
    }

    Ok(ResponseOutput {
        topology: circuit.topology().name().to_string(),
        columns,
        pole_zero,
        efficiency,
    })
}

/// Check that a job can run: circuits build, topologies resolve and
/// parameters match.
pub fn validate_job(job: &JobConfig) -> Result<()> {
    if let Some(circuit) = &job.circuit {
        let built = build_circuit(circuit, job.dispersion)?;
        select_ports(&built.ports, &job.output.ports)?;
        if let Some(sweep) = &job.sweep {
            sweep_frequencies(sweep, built.free_spectral_range)?;
        }
    }
    if let Some(sym) = &job.symbolic {
        let topology = resolve_topology(&sym.topology)?;
        let parameters = complete_parameters(topology.as_ref(), &sym.parameters);
        ringsolve_symbolic::params::validate(topology.parameter_symbols(), &parameters)?;
    }
    Ok(())
}

/// Write columns as CSV with a commented header.
pub fn write_csv(columns: &[Column], path: &Path, title: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writeln!(file, "# ringsolve {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# {title}")?;
    let header: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    writeln!(file, "{}", header.join(","))?;

    let rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
    for row in 0..rows {
        let line: Vec<String> = columns
            .iter()
            .map(|c| c.values.get(row).map_or(String::new(), |v| format!("{v:.10e}")))
            .collect();
        writeln!(file, "{}", line.join(","))?;
    }
    println!("Wrote {}", path.display());
    Ok(())
}

/// Write any result as pretty JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use ringsolve_core::units::free_spectral_range;
    use ringsolve_devices::RingParams;

    #[test]
    fn test_waveguide_sweep_is_lossless() {
        let job: JobConfig = toml::from_str(
            r#"
            [circuit]
            type = "waveguide"
            length = "1m"

            [dispersion]
            loss_db_per_m = 0.0

            [sweep]
            start = 1.2e15
            stop = 1.3e15
            points = 50
            "#,
        )
        .unwrap();
        let out = run_sweep(&job).unwrap();
        assert!(out.failed_samples.is_empty());
        let t = out
            .columns
            .iter()
            .find(|c| c.name == "transmission_output")
            .unwrap();
        assert_eq!(t.values.len(), 50);
        assert!(t.values.iter().all(|v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_ring_ports_and_fsr_grid() {
        let built = build_circuit(
            &CircuitConfig::Ring(RingParams::default()),
            Dispersion::default(),
        )
        .unwrap();
        assert_eq!(built.structure.num_pins(), 4);
        assert!(select_ports(&built.ports, &["through".to_string()]).is_ok());
        assert!(select_ports(&built.ports, &["drop".to_string()]).is_err());

        let sweep = SweepConfig::Wavelength {
            wavelength: 1550e-9,
            fsr_count: 2.0,
            points: 11,
        };
        let omegas = sweep_frequencies(&sweep, built.free_spectral_range).unwrap();
        let circumference = 2.0 * PI * RingParams::default().radius;
        let fsr = free_spectral_range(circumference, Dispersion::default().group_index);
        assert!((built.free_spectral_range - fsr).abs() < 1e-9 * fsr);
        assert_eq!(omegas.len(), 11);
        assert!(((omegas[10] - omegas[0]) - 2.0 * fsr).abs() < 1e-6 * fsr);
    }

    #[test]
    fn test_self_couplings_are_derived() {
        let topology = resolve_topology("RingResonator").unwrap();
        let given = NumericParameters::from([
            ("l".to_string(), 5.0),
            ("cross_coupling_1".to_string(), 0.6),
            ("unitary_loss_coefficient".to_string(), 0.999),
        ]);
        let values = complete_parameters(topology.as_ref(), &given);
        assert!((values["self_coupling_1"] - 0.8).abs() < 1e-12);
        assert!(resolve_topology("Snowman").is_err());
    }

    #[test]
    fn test_response_job() {
        let job: JobConfig = toml::from_str(
            r#"
            [symbolic]
            topology = "RingResonator"
            pins = [2, 3]
            pole_zero = true
            efficiency_pin = 3

            [symbolic.omega]
            points = 101

            [symbolic.parameters]
            l = 4
            cross_coupling_1 = 0.5
            unitary_loss_coefficient = 1.0
            "#,
        )
        .unwrap();
        validate_job(&job).unwrap();
        let out = run_response(&job).unwrap();
        assert_eq!(out.columns.len(), 5);
        assert!(out.columns[1].values.iter().all(|m| (m - 1.0).abs() < 1e-9));
        assert_eq!(out.pole_zero[&2].poles.len(), 4);
        assert!((out.efficiency.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let columns = vec![
            Column::new("x", vec![0.0, 1.0]),
            Column::new("y", vec![2.0, 3.0]),
        ];
        write_csv(&columns, &path, "test").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "x,y");
        assert_eq!(lines.len(), 5);
        assert!(lines[3].starts_with("0.0000000000e0,"));
    }
}
