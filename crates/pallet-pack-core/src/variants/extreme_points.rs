//! Extreme-Points: grows a candidate-point set from placed boxes' extreme
//! corners and projections, maximizing space usage with a jittered sort
//! key.

use std::cmp::Ordering;

use crate::analytics::Analytics;
use crate::candidates::ExtremePointSet;
use crate::config::PackingOptions;
use crate::model::{BoxItem, Dims, PlacedBox, Position};
use crate::policy::PlacementPolicy;
use crate::rng::Jitter;
use crate::state::PalletState;

#[derive(Debug)]
pub struct ExtremePointsPolicy {
    seed: u64,
    jitter: Jitter,
    points: ExtremePointSet,
}

impl ExtremePointsPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            jitter: Jitter::new(seed),
            points: ExtremePointSet::new(),
        }
    }
}

/// Count of base corners touching a pallet wall (x = 0, x = W, y = 0, y = D).
fn wall_touch_count(pos: Position, dims: Dims, pallet_w: i32, pallet_d: i32) -> u32 {
    let mut n = 0;
    if pos.x == 0 || pos.x + dims.dx == pallet_w {
        n += 1;
    }
    if pos.y == 0 || pos.y + dims.dy == pallet_d {
        n += 1;
    }
    n
}

/// Length of shared boundary between the candidate's footprint and any
/// already-placed box's footprint, a proxy for "resting against a
/// neighbour" (rewarded, since it improves stability and compactness).
fn contact_perimeter(pos: Position, dims: Dims, placed: &[PlacedBox]) -> i64 {
    let mut contact = 0i64;
    for other in placed {
        let touches_x = pos.x + dims.dx == other.position.x || other.position.x + other.dims.dx == pos.x;
        let touches_y = pos.y + dims.dy == other.position.y || other.position.y + other.dims.dy == pos.y;
        let y_overlap = (pos.y.max(other.position.y), (pos.y + dims.dy).min(other.position.y + other.dims.dy));
        let x_overlap = (pos.x.max(other.position.x), (pos.x + dims.dx).min(other.position.x + other.dims.dx));
        if touches_x && y_overlap.1 > y_overlap.0 {
            contact += (y_overlap.1 - y_overlap.0) as i64;
        }
        if touches_y && x_overlap.1 > x_overlap.0 {
            contact += (x_overlap.1 - x_overlap.0) as i64;
        }
    }
    contact
}

impl PlacementPolicy for ExtremePointsPolicy {
    fn sort_boxes(&mut self, items: &mut [BoxItem]) {
        let keys: Vec<f64> = items
            .iter()
            .map(|it| -(it.volume() as f64) * self.jitter.factor(0.9, 1.1))
            .collect();
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| {
            keys[a]
                .partial_cmp(&keys[b])
                .unwrap_or(Ordering::Equal)
                .then_with(|| items[a].id.0.cmp(&items[b].id.0))
        });
        let original = items.to_vec();
        for (slot, &src) in order.iter().enumerate() {
            items[slot] = original[src].clone();
        }
    }

    fn candidate_positions(
        &mut self,
        state: &PalletState,
        opts: &PackingOptions,
        analytics: &mut Analytics,
    ) -> Vec<Position> {
        self.points.candidates(state.placed(), opts.candidate_cap, analytics)
    }

    fn score(&self, pos: Position, dims: Dims, state: &PalletState) -> f64 {
        let pallet = state.pallet();
        let scale = (pallet.width + pallet.depth + pallet.height).max(1) as f64;
        let normalized_position = (pos.x + pos.y + pos.z) as f64 / scale;
        let height_term = dims.dz as f64 / pallet.height.max(1) as f64;
        let wall_bonus = wall_touch_count(pos, dims, pallet.width, pallet.depth) as f64 * 0.05;
        let contact_bonus =
            contact_perimeter(pos, dims, state.placed()) as f64 / (dims.dx + dims.dy).max(1) as f64 * 0.1;
        normalized_position + height_term + (wall_bonus - contact_bonus)
    }

    fn on_placement(&mut self, placed: &PlacedBox, state: &PalletState) {
        self.points.update(placed, state.placed());
    }

    fn reset(&mut self) {
        self.jitter = Jitter::new(self.seed);
        self.points = ExtremePointSet::new();
    }
}
