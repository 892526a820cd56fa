//! Batched coefficient system `M(ω) x(ω) = b`.

use indexmap::IndexMap;
use nalgebra::{DMatrix, DVector};

use crate::C64;
use crate::error::{Error, Result};
use crate::pin::PinId;
use crate::structure::Structure;

/// One square complex system per frequency sample.
///
/// Row and column `k` both belong to the `k`-th pin of the assembled
/// structure: column `k` holds that pin's unknown amplitude and row `k` is
/// the unique equation that determines it. The ordinate is the same at every
/// sample.
#[derive(Debug, Clone)]
pub struct BatchedSystem {
    /// Angular frequency of each sample (rad/s).
    angular_frequencies: Vec<f64>,
    /// Pin id → row/column index.
    columns: IndexMap<PinId, usize>,
    /// One coefficient matrix per sample.
    matrices: Vec<DMatrix<C64>>,
    /// Right-hand side shared by all samples.
    ordinate: DVector<C64>,
}

impl BatchedSystem {
    /// Create an all-zero system over `pins` with one matrix per sample.
    pub fn new(pins: &[PinId], angular_frequencies: &[f64]) -> Self {
        let n = pins.len();
        let zero = C64::new(0.0, 0.0);
        Self {
            angular_frequencies: angular_frequencies.to_vec(),
            columns: pins.iter().enumerate().map(|(i, &p)| (p, i)).collect(),
            matrices: vec![DMatrix::from_element(n, n, zero); angular_frequencies.len()],
            ordinate: DVector::from_element(n, zero),
        }
    }

    /// Assemble the system of a structure on a frequency grid.
    ///
    /// Each equation is placed in the row of the pin it determines. The
    /// system must be square: exactly one equation per pin.
    pub fn assemble(structure: &dyn Structure, angular_frequencies: &[f64]) -> Result<Self> {
        if angular_frequencies.is_empty() {
            return Err(Error::EmptySweep);
        }

        let pins = structure.pins();
        let equations = structure.field_equations(angular_frequencies);
        let n = pins.len();
        if equations.len() < n {
            return Err(Error::Underdetermined {
                pins: n,
                equations: equations.len(),
            });
        }
        if equations.len() > n {
            return Err(Error::Overdetermined {
                pins: n,
                equations: equations.len(),
            });
        }

        log::debug!(
            "assembling {}: {} pins, {} samples",
            structure.name(),
            n,
            angular_frequencies.len()
        );

        let mut system = Self::new(pins, angular_frequencies);
        let num_samples = angular_frequencies.len();
        let mut determined = vec![false; n];

        for equation in &equations {
            let row = system.column_of(equation.target())?;
            if determined[row] {
                return Err(Error::DuplicateEquation(equation.target()));
            }
            determined[row] = true;

            for (pin, coefficient) in equation.terms() {
                let col = system.column_of(*pin)?;
                if let Some(len) = coefficient.num_samples() {
                    if len != num_samples {
                        return Err(Error::SampleMismatch {
                            expected: num_samples,
                            actual: len,
                        });
                    }
                }
                for (sample, matrix) in system.matrices.iter_mut().enumerate() {
                    matrix[(row, col)] += coefficient.at(sample);
                }
            }
            system.ordinate[row] = equation.ordinate();
        }

        Ok(system)
    }

    fn column_of(&self, pin: PinId) -> Result<usize> {
        self.column(pin).ok_or(Error::UnknownPin(pin))
    }

    /// Row/column index of a pin.
    pub fn column(&self, pin: PinId) -> Option<usize> {
        self.columns.get(&pin).copied()
    }

    /// Pins in column order.
    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.columns.keys().copied()
    }

    /// Number of unknowns.
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    /// Number of frequency samples.
    pub fn num_samples(&self) -> usize {
        self.matrices.len()
    }

    /// Angular frequencies of the samples.
    pub fn angular_frequencies(&self) -> &[f64] {
        &self.angular_frequencies
    }

    /// Coefficient matrix of one sample.
    pub fn matrix(&self, sample: usize) -> &DMatrix<C64> {
        &self.matrices[sample]
    }

    /// All coefficient matrices.
    pub fn matrices(&self) -> &[DMatrix<C64>] {
        &self.matrices
    }

    /// Right-hand side, broadcast to every sample.
    pub fn ordinate(&self) -> &DVector<C64> {
        &self.ordinate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::FieldEquation;
    use crate::pin::PinAllocator;

    #[derive(Debug)]
    struct Rows {
        pins: Vec<PinId>,
        rows: Vec<FieldEquation>,
    }

    impl Structure for Rows {
        fn name(&self) -> &str {
            "Rows"
        }

        fn pins(&self) -> &[PinId] {
            &self.pins
        }

        fn num_equations(&self) -> usize {
            self.rows.len()
        }

        fn field_equations(&self, _: &[f64]) -> Vec<FieldEquation> {
            self.rows.clone()
        }
    }

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    #[test]
    fn test_rows_follow_target_pins() {
        let mut alloc = PinAllocator::new();
        let p = alloc.allocate_n(2);
        // Listed out of order: row placement follows the target pin.
        let s = Rows {
            pins: p.clone(),
            rows: vec![
                FieldEquation::new(p[1])
                    .term(p[1], 1.0)
                    .term(p[0], vec![c(-0.5, 0.0), c(0.0, -0.5)]),
                FieldEquation::new(p[0]).term(p[0], 1.0).with_ordinate(c(1.0, 0.0)),
            ],
        };

        let sys = BatchedSystem::assemble(&s, &[1.0, 2.0]).unwrap();
        assert_eq!(sys.size(), 2);
        assert_eq!(sys.num_samples(), 2);
        assert_eq!(sys.matrix(0)[(0, 0)], c(1.0, 0.0));
        assert_eq!(sys.matrix(0)[(1, 0)], c(-0.5, 0.0));
        assert_eq!(sys.matrix(1)[(1, 0)], c(0.0, -0.5));
        assert_eq!(sys.matrix(1)[(1, 1)], c(1.0, 0.0));
        assert_eq!(sys.ordinate()[0], c(1.0, 0.0));
        assert_eq!(sys.ordinate()[1], c(0.0, 0.0));
    }

    #[test]
    fn test_columns_follow_pin_order_not_ids() {
        let mut alloc = PinAllocator::new();
        let _unrelated = alloc.allocate_n(5);
        let p = alloc.allocate_n(2);
        let s = Rows {
            pins: p.clone(),
            rows: vec![
                FieldEquation::new(p[0]).term(p[0], 1.0),
                FieldEquation::new(p[1]).term(p[1], 2.0),
            ],
        };

        let sys = BatchedSystem::assemble(&s, &[0.0]).unwrap();
        assert_eq!(sys.column(p[0]), Some(0));
        assert_eq!(sys.column(p[1]), Some(1));
        assert_eq!(sys.matrix(0)[(1, 1)], c(2.0, 0.0));
    }

    #[test]
    fn test_non_square_rejected() {
        let mut alloc = PinAllocator::new();
        let p = alloc.allocate_n(2);
        let under = Rows {
            pins: p.clone(),
            rows: vec![FieldEquation::new(p[0]).term(p[0], 1.0)],
        };
        assert!(matches!(
            BatchedSystem::assemble(&under, &[0.0]),
            Err(Error::Underdetermined {
                pins: 2,
                equations: 1
            })
        ));

        let empty = Rows {
            pins: vec![],
            rows: vec![FieldEquation::new(p[0])],
        };
        assert!(matches!(
            BatchedSystem::assemble(&empty, &[0.0]),
            Err(Error::Overdetermined { .. })
        ));
    }

    #[test]
    fn test_duplicate_and_unknown_pins_rejected() {
        let mut alloc = PinAllocator::new();
        let p = alloc.allocate_n(2);
        let stray = alloc.allocate();

        let duplicate = Rows {
            pins: p.clone(),
            rows: vec![
                FieldEquation::new(p[0]).term(p[0], 1.0),
                FieldEquation::new(p[0]).term(p[1], 1.0),
            ],
        };
        assert!(matches!(
            BatchedSystem::assemble(&duplicate, &[0.0]),
            Err(Error::DuplicateEquation(_))
        ));

        let unknown = Rows {
            pins: p.clone(),
            rows: vec![
                FieldEquation::new(p[0]).term(p[0], 1.0),
                FieldEquation::new(p[1]).term(stray, 1.0),
            ],
        };
        assert!(matches!(
            BatchedSystem::assemble(&unknown, &[0.0]),
            Err(Error::UnknownPin(pin)) if pin == stray
        ));
    }

    #[test]
    fn test_empty_sweep_and_sample_mismatch() {
        let mut alloc = PinAllocator::new();
        let p = alloc.allocate_n(1);
        let s = Rows {
            pins: p.clone(),
            rows: vec![FieldEquation::new(p[0]).term(p[0], vec![c(1.0, 0.0)])],
        };
        assert!(matches!(
            BatchedSystem::assemble(&s, &[]),
            Err(Error::EmptySweep)
        ));
        assert!(matches!(
            BatchedSystem::assemble(&s, &[1.0, 2.0]),
            Err(Error::SampleMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }
}
