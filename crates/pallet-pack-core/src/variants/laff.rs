//! Largest-Area-Fit-First: items are tiled into horizontal layers without
//! rotation; a layer closes once nothing more fits, and the next layer
//! starts at the previous layer's max height.

use crate::analytics::Analytics;
use crate::config::PackingOptions;
use crate::model::{BoxItem, Coord, Dims, PlacedBox, Position};
use crate::policy::PlacementPolicy;
use crate::state::PalletState;

#[derive(Debug, Default)]
pub struct LaffPolicy {
    current_level_z: Coord,
    current_level_max_dz: Coord,
}

impl LaffPolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sum of touching-edge contact lengths with boxes on the same level, a
/// waste proxy where lower waste (i.e. higher contact) is preferred.
fn contact_length(pos: Position, dims: Dims, level_items: &[&PlacedBox]) -> i64 {
    let mut contact = 0i64;
    for other in level_items {
        let y_overlaps = pos.y < other.position.y + other.dims.dy && other.position.y < pos.y + dims.dy;
        let x_overlaps = pos.x < other.position.x + other.dims.dx && other.position.x < pos.x + dims.dx;
        let touches_x_edge = pos.x + dims.dx == other.position.x || pos.x == other.position.x + other.dims.dx;
        let touches_y_edge = pos.y + dims.dy == other.position.y || pos.y == other.position.y + other.dims.dy;
        if touches_x_edge && y_overlaps {
            contact += dims.dy.min(other.dims.dy) as i64;
        }
        if touches_y_edge && x_overlaps {
            contact += dims.dx.min(other.dims.dx) as i64;
        }
    }
    contact
}

impl PlacementPolicy for LaffPolicy {
    fn sort_boxes(&mut self, items: &mut [BoxItem]) {
        items.sort_by(|a, b| {
            let area_a = a.length as i64 * a.width as i64;
            let area_b = b.length as i64 * b.width as i64;
            area_b
                .cmp(&area_a)
                .then_with(|| b.height.cmp(&a.height))
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
    }

    fn orientations(&self, item: &BoxItem) -> Vec<Dims> {
        // No rotation: dimensions are never permuted.
        vec![Dims::new(item.length, item.width, item.height)]
    }

    fn candidate_positions(
        &mut self,
        state: &PalletState,
        _opts: &PackingOptions,
        _analytics: &mut Analytics,
    ) -> Vec<Position> {
        let level_items: Vec<&PlacedBox> = state
            .placed()
            .iter()
            .filter(|b| b.position.z == self.current_level_z)
            .collect();

        let mut positions = vec![Position::new(0, 0, self.current_level_z)];
        for b in &level_items {
            positions.push(Position::new(b.position.x + b.dims.dx, b.position.y, self.current_level_z));
            positions.push(Position::new(b.position.x, b.position.y + b.dims.dy, self.current_level_z));
        }

        let next_level_z = self.current_level_z + self.current_level_max_dz;
        if next_level_z != self.current_level_z {
            positions.push(Position::new(0, 0, next_level_z));
        }
        positions
    }

    fn score(&self, pos: Position, dims: Dims, state: &PalletState) -> f64 {
        if pos.z != self.current_level_z {
            return 0.0;
        }
        let level_items: Vec<&PlacedBox> = state
            .placed()
            .iter()
            .filter(|b| b.position.z == self.current_level_z)
            .collect();
        -(contact_length(pos, dims, &level_items) as f64)
    }

    fn on_placement(&mut self, placed: &PlacedBox, _state: &PalletState) {
        if placed.position.z == self.current_level_z {
            self.current_level_max_dz = self.current_level_max_dz.max(placed.dims.dz);
        } else {
            self.current_level_z = placed.position.z;
            self.current_level_max_dz = placed.dims.dz;
        }
    }

    fn reset(&mut self) {
        self.current_level_z = 0;
        self.current_level_max_dz = 0;
    }
}
