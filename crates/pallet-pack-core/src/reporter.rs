//! The reporter: efficiency metrics, centre of gravity,
//! weight distribution and per-level stats computed from a finished
//! `PalletState` and its analytics, plus short diagnostic recommendations.

use serde::{Deserialize, Serialize};

use crate::analytics::Analytics;
use crate::model::{Coord, Pallet, PlacedBox, UnplacedBox, Weight};
use crate::state::PalletState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightStats {
    pub min: Weight,
    pub mean: Weight,
    pub max: Weight,
    pub variance: Weight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelStats {
    pub index: i32,
    pub volume: i64,
    pub weight: Weight,
    pub item_count: usize,
    pub z_min: Coord,
    pub z_max: Coord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub placed_count: usize,
    pub unplaced_count: usize,
    pub volume_utilization: f64,
    pub space_utilization: f64,
    pub weight_utilization: f64,
    pub packing_efficiency: f64,
    pub center_of_gravity: (f64, f64, f64),
    pub weight_distribution: WeightStats,
    pub levels: Vec<LevelStats>,
    pub recommendations: Vec<String>,
}

impl Report {
    /// A compact, single-line status summary.
    pub fn status_string(&self) -> String {
        format!(
            "{} placed | {} unplaced | {:.1}% space | {:.1}% weight",
            self.placed_count,
            self.unplaced_count,
            self.space_utilization * 100.0,
            self.weight_utilization * 100.0,
        )
    }

    /// A detailed multi-line summary, including recommendations.
    pub fn summary_string(&self) -> String {
        let mut s = format!(
            "Placed: {}\nUnplaced: {}\nVolume utilization: {:.2}%\nSpace utilization: {:.2}%\nWeight utilization: {:.2}%\nPacking efficiency: {:.2}%\nCentre of gravity: ({:.1}, {:.1}, {:.1})",
            self.placed_count,
            self.unplaced_count,
            self.volume_utilization * 100.0,
            self.space_utilization * 100.0,
            self.weight_utilization * 100.0,
            self.packing_efficiency * 100.0,
            self.center_of_gravity.0,
            self.center_of_gravity.1,
            self.center_of_gravity.2,
        );
        for r in &self.recommendations {
            s.push_str("\n- ");
            s.push_str(r);
        }
        s
    }
}

fn weight_stats(placed: &[PlacedBox]) -> WeightStats {
    if placed.is_empty() {
        return WeightStats::default();
    }
    let weights: Vec<Weight> = placed.iter().map(|p| p.item.weight).collect();
    let min = weights.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = weights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    let variance = weights.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / weights.len() as f64;
    WeightStats { min, mean, max, variance }
}

fn center_of_gravity(placed: &[PlacedBox]) -> (f64, f64, f64) {
    let total_weight: Weight = placed.iter().map(|p| p.item.weight).sum();
    if total_weight <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut cz = 0.0;
    for p in placed {
        let centre_x = p.position.x as f64 + p.dims.dx as f64 / 2.0;
        let centre_y = p.position.y as f64 + p.dims.dy as f64 / 2.0;
        let centre_z = p.position.z as f64 + p.dims.dz as f64 / 2.0;
        cx += centre_x * p.item.weight;
        cy += centre_y * p.item.weight;
        cz += centre_z * p.item.weight;
    }
    (cx / total_weight, cy / total_weight, cz / total_weight)
}

fn level_stats(analytics: &Analytics) -> Vec<LevelStats> {
    analytics
        .level_aggregates
        .iter()
        .map(|(&index, agg)| LevelStats {
            index,
            volume: agg.volume,
            weight: agg.weight,
            item_count: agg.item_count,
            z_min: agg.z_min,
            z_max: agg.z_max,
        })
        .collect()
}

fn recommendations(
    analytics: &Analytics,
    pallet: &Pallet,
    cog: (f64, f64, f64),
    unplaced_count: usize,
) -> Vec<String> {
    let mut out = Vec::new();

    if analytics.attempts > 0 && analytics.success_rate() < 0.7 {
        out.push("low placement success rate; consider a different sort order or variant".to_string());
    }

    if unplaced_count > 0 {
        let dev_x = (cog.0 - pallet.width as f64 / 2.0).abs() / (pallet.width as f64 / 2.0).max(1.0);
        let dev_y = (cog.1 - pallet.depth as f64 / 2.0).abs() / (pallet.depth as f64 / 2.0).max(1.0);
        if dev_x > 0.25 || dev_y > 0.25 {
            out.push("centre of gravity is off-centre; redistribute weight across the floor".to_string());
        }
    }

    if let Some((reason, count)) = analytics.dominant_rejection() {
        if count > 0 {
            out.push(format!(
                "dominant rejection reason is {reason}; adjust the constraint or relax the threshold it enforces"
            ));
        }
    }

    out
}

/// Builds the report from the packer's final state. `all_input_volume`
/// and `all_input_weight` cover every box submitted to the packer,
/// placed or not, so utilization denominators are stable across `pack()`
/// calls.
pub fn build(
    state: &PalletState,
    unplaced: &[UnplacedBox],
    all_input_volume: i64,
    all_input_weight: Weight,
    analytics: &Analytics,
) -> Report {
    let placed = state.placed();
    let placed_volume: i64 = placed.iter().map(|p| p.dims.volume()).sum();
    let placed_weight: Weight = placed.iter().map(|p| p.item.weight).sum();
    let pallet_volume = state.pallet().volume();

    let total_count = placed.len() + unplaced.len();
    let volume_utilization = if all_input_volume > 0 {
        placed_volume as f64 / all_input_volume as f64
    } else {
        0.0
    };
    let space_utilization = if pallet_volume > 0 {
        placed_volume as f64 / pallet_volume as f64
    } else {
        0.0
    };
    let weight_utilization = if all_input_weight > 0.0 {
        placed_weight / all_input_weight
    } else {
        0.0
    };
    let packing_efficiency = if total_count > 0 {
        placed.len() as f64 / total_count as f64
    } else {
        0.0
    };

    let cog = center_of_gravity(placed);

    Report {
        placed_count: placed.len(),
        unplaced_count: unplaced.len(),
        volume_utilization,
        space_utilization,
        weight_utilization,
        packing_efficiency,
        center_of_gravity: cog,
        weight_distribution: weight_stats(placed),
        levels: level_stats(analytics),
        recommendations: recommendations(analytics, state.pallet(), cog, unplaced.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxItem, Dims, Pallet, Position};

    fn sample_placed(weight: Weight, x: Coord) -> PlacedBox {
        PlacedBox {
            item: BoxItem::new("b", 10, 10, 10, weight).unwrap(),
            position: Position::new(x, 0, 0),
            dims: Dims::new(10, 10, 10),
        }
    }

    #[test]
    fn utilization_is_zero_with_no_placements() {
        let pallet = Pallet::new(100, 100, 100, 500.0).unwrap();
        let state = PalletState::new(pallet);
        let analytics = Analytics::new(20);
        let report = build(&state, &[], 1000, 10.0, &analytics);
        assert_eq!(report.volume_utilization, 0.0);
        assert_eq!(report.packing_efficiency, 0.0);
    }

    #[test]
    fn center_of_gravity_centers_a_single_box() {
        let placed = vec![sample_placed(5.0, 0)];
        let cog = center_of_gravity(&placed);
        assert_eq!(cog, (5.0, 5.0, 5.0));
    }
}
