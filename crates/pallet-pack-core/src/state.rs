//! `PalletState`: the set of placed boxes plus the running
//! weight sum. Owned by the `Packer` for its lifetime.

use crate::model::{Pallet, PlacedBox, Weight};

#[derive(Debug, Clone)]
pub struct PalletState {
    pallet: Pallet,
    placed: Vec<PlacedBox>,
    weight_used: Weight,
}

impl PalletState {
    pub fn new(pallet: Pallet) -> Self {
        Self {
            pallet,
            placed: Vec::new(),
            weight_used: 0.0,
        }
    }

    pub fn pallet(&self) -> &Pallet {
        &self.pallet
    }

    pub fn placed(&self) -> &[PlacedBox] {
        &self.placed
    }

    pub fn weight_used(&self) -> Weight {
        self.weight_used
    }

    /// Appends a placement and updates the running weight. Callers are
    /// responsible for having validated the placement through the
    /// geometric kernel first; this method does not re-check invariants.
    pub fn commit(&mut self, placed: PlacedBox) {
        self.weight_used += placed.item.weight;
        self.placed.push(placed);
    }
}
