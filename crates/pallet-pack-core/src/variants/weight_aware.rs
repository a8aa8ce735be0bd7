//! Weight-Aware: stable, weight-ordered stacking that never perches a
//! heavier box on a lighter one when the rule is enabled.

use std::cmp::Ordering;

use crate::analytics::Analytics;
use crate::candidates::{cap_and_sort, floor_grid, to_index_set, top_corners};
use crate::config::PackingOptions;
use crate::model::{BoxItem, Dims, PlacedBox, Position};
use crate::policy::PlacementPolicy;
use crate::state::PalletState;

#[derive(Debug, Default)]
pub struct WeightAwarePolicy;

impl WeightAwarePolicy {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementPolicy for WeightAwarePolicy {
    fn sort_boxes(&mut self, items: &mut [BoxItem]) {
        items.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    let area_a = a.length as i64 * a.width as i64;
                    let area_b = b.length as i64 * b.width as i64;
                    area_b.cmp(&area_a)
                })
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
    }

    fn candidate_positions(
        &mut self,
        state: &PalletState,
        opts: &PackingOptions,
        analytics: &mut Analytics,
    ) -> Vec<Position> {
        let mut points = to_index_set(floor_grid(state.pallet(), opts.grid_step));
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

    fn weight_rule_applies(&self) -> bool {
        true
    }

    fn requires_edge_support(&self, opts: &PackingOptions) -> bool {
        opts.require_edge_support || opts.support_threshold > 0.7
    }

    fn short_circuits_at_floor(&self) -> bool {
        true
    }

    fn reset(&mut self) {}
}
