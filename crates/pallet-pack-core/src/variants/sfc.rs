//! Space-Filling-Curve: a spiral of grid points around the pallet centre,
//! biased toward accepting the first floor fit it finds.

use std::cmp::Ordering;

use crate::analytics::Analytics;
use crate::candidates::{cap_and_sort, spiral_positions, to_index_set, top_corners};
use crate::config::PackingOptions;
use crate::model::{BoxItem, Dims, PlacedBox, Position};
use crate::policy::PlacementPolicy;
use crate::state::PalletState;

#[derive(Debug, Default)]
pub struct SfcPolicy;

impl SfcPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementPolicy for SfcPolicy {
    fn sort_boxes(&mut self, items: &mut [BoxItem]) {
        items.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.volume().cmp(&a.volume()))
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
    }

    fn candidate_positions(
        &mut self,
        state: &PalletState,
        opts: &PackingOptions,
        analytics: &mut Analytics,
    ) -> Vec<Position> {
        let mut points = to_index_set(spiral_positions(state.pallet(), opts.grid_step));
        for b in state.placed() {
            for c in top_corners(b) {
                points.insert((c.x, c.y, c.z));
            }
        }
        cap_and_sort(points, opts.candidate_cap, analytics)
    }

    fn score(&self, pos: Position, _dims: Dims, _state: &PalletState) -> f64 {
        pos.z as f64
    }

    fn on_placement(&mut self, _placed: &PlacedBox, _state: &PalletState) {}

    fn short_circuits_at_floor(&self) -> bool {
        true
    }

    fn reset(&mut self) {}
}
