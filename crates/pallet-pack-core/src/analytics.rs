//! The analytics record: counters, histograms, a placement timeline,
//! support-quality samples, per-level aggregation and a coarse density
//! grid. Owned explicitly by the `Packer` and passed by reference to the
//! policy, never a mutable attribute hidden on the packer itself.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{BoxId, Coord, Dims, RejectionReason, Weight};

/// Integer index `⌊z / 20 cm⌋` used only for analytics grouping.
pub const LEVEL_HEIGHT: Coord = 20;

/// Default edge length of a density-grid cell, in centimetres.
pub const DEFAULT_DENSITY_CELL: Coord = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementEvent {
    pub box_id: BoxId,
    pub offset: Duration,
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
    pub dx: Coord,
    pub dy: Coord,
    pub dz: Coord,
    pub level: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelAggregate {
    pub volume: i64,
    pub weight: Weight,
    pub item_count: usize,
    pub z_min: Coord,
    pub z_max: Coord,
}

/// Occupancy counts in fixed-size 3D cells. Coarse by design: it answers
/// "how dense is this region", not exact geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityGrid {
    cell_size: Coord,
    occupancy: HashMap<(i32, i32, i32), u32>,
}

impl DensityGrid {
    pub fn new(cell_size: Coord) -> Self {
        Self {
            cell_size: cell_size.max(1),
            occupancy: HashMap::new(),
        }
    }

    pub fn record(&mut self, x: Coord, y: Coord, z: Coord, dx: Coord, dy: Coord, dz: Coord) {
        let s = self.cell_size;
        let (i0, i1) = (x.div_euclid(s), (x + dx - 1).div_euclid(s));
        let (j0, j1) = (y.div_euclid(s), (y + dy - 1).div_euclid(s));
        let (k0, k1) = (z.div_euclid(s), (z + dz - 1).div_euclid(s));
        for i in i0..=i1 {
            for j in j0..=j1 {
                for k in k0..=k1 {
                    *self.occupancy.entry((i, j, k)).or_insert(0) += 1;
                }
            }
        }
    }

    pub fn occupied_cell_count(&self) -> usize {
        self.occupancy.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub attempts: u64,
    pub successes: u64,
    pub orientation_histogram: HashMap<String, u64>,
    pub rejection_histogram: HashMap<RejectionReason, u64>,
    pub placement_timeline: Vec<PlacementEvent>,
    pub support_quality_samples: Vec<f64>,
    pub level_aggregates: BTreeMap<i32, LevelAggregate>,
    pub density_grid: DensityGrid,
    /// Count of times a candidate-point set was trimmed to its cap.
    pub candidate_cap_trims: u64,
}

impl Analytics {
    /// `cell_size` sizes the density grid; callers thread
    /// `PackingOptions::density_cell` through here rather than relying on
    /// the module default.
    pub fn new(cell_size: Coord) -> Self {
        Self {
            attempts: 0,
            successes: 0,
            orientation_histogram: HashMap::new(),
            rejection_histogram: HashMap::new(),
            placement_timeline: Vec::new(),
            support_quality_samples: Vec::new(),
            level_aggregates: BTreeMap::new(),
            density_grid: DensityGrid::new(cell_size),
            candidate_cap_trims: 0,
        }
    }

    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    pub fn record_rejection(&mut self, reason: RejectionReason) {
        *self.rejection_histogram.entry(reason).or_insert(0) += 1;
    }

    pub fn record_support_sample(&mut self, ratio: f64) {
        self.support_quality_samples.push(ratio);
    }

    pub fn record_candidate_cap_trim(&mut self) {
        self.candidate_cap_trims += 1;
        tracing::debug!(
            trims = self.candidate_cap_trims,
            "candidate point set trimmed to cap"
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn record_placement(
        &mut self,
        box_id: BoxId,
        weight: Weight,
        offset: Duration,
        x: Coord,
        y: Coord,
        z: Coord,
        dims: Dims,
    ) {
        self.successes += 1;

        let orient_key = format!("{}x{}x{}", dims.dx, dims.dy, dims.dz);
        *self.orientation_histogram.entry(orient_key).or_insert(0) += 1;

        self.density_grid.record(x, y, z, dims.dx, dims.dy, dims.dz);

        let level = z / LEVEL_HEIGHT;
        let agg = self.level_aggregates.entry(level).or_default();
        if agg.item_count == 0 {
            agg.z_min = z;
            agg.z_max = z + dims.dz;
        } else {
            agg.z_min = agg.z_min.min(z);
            agg.z_max = agg.z_max.max(z + dims.dz);
        }
        agg.volume += dims.volume();
        agg.weight += weight;
        agg.item_count += 1;

        self.placement_timeline.push(PlacementEvent {
            box_id,
            offset,
            x,
            y,
            z,
            dx: dims.dx,
            dy: dims.dy,
            dz: dims.dz,
            level,
        });
    }

    /// The single most frequent rejection reason, if any boxes were rejected.
    /// Ties break on the reason itself (not `HashMap` iteration order, which
    /// is randomized per instance) so repeated packs stay byte-identical.
    pub fn dominant_rejection(&self) -> Option<(RejectionReason, u64)> {
        self.rejection_histogram
            .iter()
            .max_by_key(|(reason, count)| (**count, std::cmp::Reverse(**reason)))
            .map(|(reason, count)| (*reason, *count))
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(DEFAULT_DENSITY_CELL)
    }
}
