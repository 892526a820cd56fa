//! Composite structures: trees of child structures sharing pins.

use crate::dispersion::Dispersion;
use crate::equation::FieldEquation;
use crate::error::{Error, Result};
use crate::pin::PinId;
use crate::structure::Structure;
use crate::system::BatchedSystem;
use crate::units;

/// A boxed child structure.
pub type BoxedStructure = Box<dyn Structure>;

/// A container of child structures.
///
/// The composite exclusively owns its children; pins are shared by id. Its
/// equations are the depth-first concatenation of its children's equations.
#[derive(Debug)]
pub struct Composite {
    /// Structure name.
    name: String,
    /// Pins of the composite; children reference subsets of these.
    pins: Vec<PinId>,
    /// Child structures in equation order.
    children: Vec<BoxedStructure>,
    /// Propagation parameters handed to every waveguide.
    dispersion: Dispersion,
    /// Sampled angular frequencies (rad/s), if this composite is solved.
    angular_frequencies: Option<Vec<f64>>,
}

impl Composite {
    /// Create an empty composite over the given pins.
    pub fn new(name: impl Into<String>, pins: Vec<PinId>, dispersion: Dispersion) -> Self {
        Self {
            name: name.into(),
            pins,
            children: Vec::new(),
            dispersion,
            angular_frequencies: None,
        }
    }

    /// Attach the frequency grid the composite is solved on.
    pub fn with_angular_frequencies(mut self, angular_frequencies: Vec<f64>) -> Self {
        self.angular_frequencies = Some(angular_frequencies);
        self
    }

    /// Replace the frequency grid.
    pub fn set_angular_frequencies(&mut self, angular_frequencies: Vec<f64>) {
        self.angular_frequencies = Some(angular_frequencies);
    }

    /// Add a child structure.
    ///
    /// Every pin of the child must belong to this composite.
    pub fn add(&mut self, child: impl Structure + 'static) -> Result<()> {
        if let Some(&pin) = child.pins().iter().find(|p| !self.pins.contains(p)) {
            return Err(Error::UnknownPin(pin));
        }
        log::trace!("{}: adding {} over {:?}", self.name, child.name(), child.pins());
        self.children.push(Box::new(child));
        Ok(())
    }

    /// Child structures.
    pub fn children(&self) -> &[BoxedStructure] {
        &self.children
    }

    /// Propagation parameters.
    pub fn dispersion(&self) -> &Dispersion {
        &self.dispersion
    }

    /// Angular free spectral range (rad/s) of a cavity of round-trip
    /// `length` made of this composite's waveguides.
    pub fn free_spectral_range(&self, length: f64) -> f64 {
        units::free_spectral_range(length, self.dispersion.group_index)
    }

    /// Sampled angular frequencies, if any.
    pub fn angular_frequencies(&self) -> Option<&[f64]> {
        self.angular_frequencies.as_deref()
    }

    /// Assemble the batched coefficient system on the attached grid.
    pub fn coefficient_matrix(&self) -> Result<BatchedSystem> {
        let omegas = self
            .angular_frequencies()
            .ok_or_else(|| Error::MissingFrequencies(self.name.clone()))?;
        BatchedSystem::assemble(self, omegas)
    }
}

impl AsRef<Composite> for Composite {
    fn as_ref(&self) -> &Composite {
        self
    }
}

impl Structure for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn pins(&self) -> &[PinId] {
        &self.pins
    }

    fn num_equations(&self) -> usize {
        self.children.iter().map(|c| c.num_equations()).sum()
    }

    fn field_equations(&self, angular_frequencies: &[f64]) -> Vec<FieldEquation> {
        self.children
            .iter()
            .flat_map(|c| c.field_equations(angular_frequencies))
            .collect()
    }
}
