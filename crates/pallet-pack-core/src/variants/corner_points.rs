//! Corner-Points: grows a set of "corner points" from placed boxes'
//! offsets and cross-box intersections, scoring candidates toward pallet
//! corners and walls while penalizing isolated placements.

use crate::analytics::Analytics;
use crate::candidates::CornerPointSet;
use crate::config::PackingOptions;
use crate::model::{BoxItem, Dims, PlacedBox, Position};
use crate::policy::PlacementPolicy;
use crate::state::PalletState;

const WALL_BONUS_WEIGHT: f64 = 8.0;
const ISOLATION_PENALTY: f64 = 5.0;

#[derive(Debug, Default)]
pub struct CornerPointsPolicy {
    points: CornerPointSet,
}

impl CornerPointsPolicy {
    pub fn new() -> Self {
        Self {
            points: CornerPointSet::new(),
        }
    }
}

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

fn has_any_contact(pos: Position, dims: Dims, placed: &[PlacedBox]) -> bool {
    placed.iter().any(|other| {
        let touches_x = pos.x + dims.dx == other.position.x || other.position.x + other.dims.dx == pos.x;
        let touches_y = pos.y + dims.dy == other.position.y || other.position.y + other.dims.dy == pos.y;
        let touches_z = pos.z + dims.dz == other.position.z || other.position.z + other.dims.dz == pos.z;
        let x_overlap = pos.x < other.position.x + other.dims.dx && other.position.x < pos.x + dims.dx;
        let y_overlap = pos.y < other.position.y + other.dims.dy && other.position.y < pos.y + dims.dy;
        (touches_x && y_overlap) || (touches_y && x_overlap) || (touches_z && x_overlap && y_overlap)
    })
}

impl PlacementPolicy for CornerPointsPolicy {
    fn sort_boxes(&mut self, items: &mut [BoxItem]) {
        items.sort_by(|a, b| {
            b.volume().cmp(&a.volume()).then_with(|| {
                let ratio = |it: &BoxItem| it.width.min(it.height) as f64 / it.width.max(it.height).max(1) as f64;
                ratio(b)
                    .partial_cmp(&ratio(a))
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.id.0.cmp(&b.id.0))
            })
        });
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
        let distance_to_origin = ((pos.x as f64).powi(2) + (pos.y as f64).powi(2)).sqrt();
        let compactness_bonus = wall_touch_count(pos, dims, pallet.width, pallet.depth) as f64 * WALL_BONUS_WEIGHT;
        let isolation_penalty = if has_any_contact(pos, dims, state.placed()) {
            0.0
        } else {
            ISOLATION_PENALTY
        };
        distance_to_origin + 2.0 * pos.z as f64 - compactness_bonus + isolation_penalty
    }

    fn on_placement(&mut self, placed: &PlacedBox, state: &PalletState) {
        self.points.update(placed, state.placed());
    }

    fn reset(&mut self) {
        self.points = CornerPointSet::new();
    }
}
