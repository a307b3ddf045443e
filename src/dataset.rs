use serde::Serialize;

use crate::quantity::Quantity;

/// How a quantity's vector came to be in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Resampled grid of a channel's independent variable
    Independent,
    /// Resampled dependent variable of a channel
    Measured,
    /// Broadcast of a constant declaration
    Constant,
    /// Computed from other quantities
    Derived,
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    values: Vec<f32>,
    provenance: Provenance,
}

/// Temporally synchronized output of the pipeline
///
/// Every populated quantity holds exactly [`len`](Self::len) values, aligned
/// index-for-index to the same instants. Quantities that were neither
/// recorded nor derivable are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizedDataset {
    slots: [Option<Slot>; Quantity::COUNT],
    constants: [Option<f32>; Quantity::COUNT],
    len: usize,
}

impl SynchronizedDataset {
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            slots: Default::default(),
            constants: [None; Quantity::COUNT],
            len,
        }
    }

    /// Store a vector, returning the provenance it replaced.
    pub(crate) fn set(
        &mut self,
        quantity: Quantity,
        values: Vec<f32>,
        provenance: Provenance,
    ) -> Option<Provenance> {
        debug_assert_eq!(values.len(), self.len);
        self.slots[quantity.index()]
            .replace(Slot { values, provenance })
            .map(|s| s.provenance)
    }

    pub(crate) fn set_constant(&mut self, quantity: Quantity, value: f32) -> Option<Provenance> {
        self.constants[quantity.index()] = Some(value);
        self.set(quantity, vec![value; self.len], Provenance::Constant)
    }

    /// Number of samples shared by every populated quantity
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, quantity: Quantity) -> Option<&[f32]> {
        self.slots[quantity.index()]
            .as_ref()
            .map(|s| s.values.as_slice())
    }

    pub fn provenance(&self, quantity: Quantity) -> Option<Provenance> {
        self.slots[quantity.index()].as_ref().map(|s| s.provenance)
    }

    /// Whether a constant declaration was bound for this quantity
    pub fn is_constant(&self, quantity: Quantity) -> bool {
        self.constants[quantity.index()].is_some()
    }

    pub fn constant_value(&self, quantity: Quantity) -> Option<f32> {
        self.constants[quantity.index()]
    }

    pub fn time(&self) -> Option<&[f32]> {
        self.get(Quantity::Time)
    }

    pub fn displacement(&self) -> Option<&[f32]> {
        self.get(Quantity::DisplacementX)
    }

    pub fn velocity(&self) -> Option<&[f32]> {
        self.get(Quantity::VelocityX)
    }

    pub fn rotation(&self) -> Option<&[f32]> {
        self.get(Quantity::RotationX)
    }

    pub fn force(&self) -> Option<&[f32]> {
        self.get(Quantity::ForceX)
    }

    /// Populated quantities in canonical order
    pub fn populated(&self) -> impl Iterator<Item = (Quantity, &[f32])> {
        Quantity::ALL
            .into_iter()
            .filter_map(|q| self.get(q).map(|values| (q, values)))
    }
}
