//! Candidate-point structures: the floor grid, top corners, and the two
//! growing candidate-point sets (Corner-Points and Extreme-Points), plus
//! the SFC spiral generator. Each set caps itself at a configurable size,
//! keeping the lowest-z points and recording a trim in analytics.

use indexmap::IndexSet;

use crate::analytics::Analytics;
use crate::model::{Coord, Pallet, PlacedBox, Position};

type PointKey = (Coord, Coord, Coord);

fn ranges_overlap(a0: Coord, a1: Coord, b0: Coord, b1: Coord) -> bool {
    a0 < b1 && b0 < a1
}

fn point_inside_any(p: PointKey, placed: &[PlacedBox]) -> bool {
    placed.iter().any(|b| {
        p.0 >= b.position.x
            && p.0 < b.position.x + b.dims.dx
            && p.1 >= b.position.y
            && p.1 < b.position.y + b.dims.dy
            && p.2 >= b.position.z
            && p.2 < b.position.z + b.dims.dz
    })
}

/// Caps `set` at `cap`, keeping the points with the lowest z (ties broken
/// by `x^2+y^2`, then lexicographically), and records a trim if it fired.
pub(crate) fn cap_and_sort(set: IndexSet<PointKey>, cap: usize, analytics: &mut Analytics) -> Vec<Position> {
    let mut points: Vec<PointKey> = set.into_iter().collect();
    points.sort_by_key(|&(x, y, z)| (z, x as i64 * x as i64 + y as i64 * y as i64, x, y));
    if points.len() > cap {
        points.truncate(cap);
        analytics.record_candidate_cap_trim();
    }
    points
        .into_iter()
        .map(|(x, y, z)| Position::new(x, y, z))
        .collect()
}

/// Collects positions into a de-duplicating set, preserving first-seen order.
pub(crate) fn to_index_set(points: impl IntoIterator<Item = Position>) -> IndexSet<PointKey> {
    points.into_iter().map(|p| (p.x, p.y, p.z)).collect()
}

/// Integer lattice `{(i*s, j*s, 0) : 0 <= i*s < W, 0 <= j*s < D}`, fixed
/// per run.
pub fn floor_grid(pallet: &Pallet, step: Coord) -> Vec<Position> {
    let step = step.max(1);
    let mut out = Vec::new();
    let mut i = 0;
    while i * step < pallet.width {
        let mut j = 0;
        while j * step < pallet.depth {
            out.push(Position::new(i * step, j * step, 0));
            j += 1;
        }
        i += 1;
    }
    out
}

/// The four top corners of a placed box, at `z = top_z`.
pub fn top_corners(b: &PlacedBox) -> [Position; 4] {
    let (x, y, z) = (b.position.x, b.position.y, b.top_z());
    let (w, h) = (b.dims.dx, b.dims.dy);
    [
        Position::new(x, y, z),
        Position::new(x + w, y, z),
        Position::new(x, y + h, z),
        Position::new(x + w, y + h, z),
    ]
}

/// The seven face/edge offsets generated whenever a box is placed,
/// shared by the Corner-Points and Extreme-Points update rules.
fn seven_face_offsets(b: &PlacedBox) -> [PointKey; 7] {
    let (x, y, z) = (b.position.x, b.position.y, b.position.z);
    let (w, h, d) = (b.dims.dx, b.dims.dy, b.dims.dz);
    [
        (x + w, y, z),
        (x, y + h, z),
        (x, y, z + d),
        (x + w, y + h, z),
        (x + w, y, z + d),
        (x, y + h, z + d),
        (x + w, y + h, z + d),
    ]
}

/// Running set of "corner points": seven offsets from each placed box
/// plus the 64 per-pair combinations of each axis' four candidate
/// coordinates (`{x, x+w}` from the new box, `{px, px+pw}` from an
/// already-placed box) that do not fall strictly inside any placed box.
/// This is the O(n^2) cross-box intersection set, the dominant memory
/// cost of this variant on large catalogues.
#[derive(Debug, Clone)]
pub struct CornerPointSet {
    points: IndexSet<PointKey>,
}

impl CornerPointSet {
    pub fn new() -> Self {
        let mut points = IndexSet::new();
        points.insert((0, 0, 0));
        Self { points }
    }

    pub fn update(&mut self, new_box: &PlacedBox, placed: &[PlacedBox]) {
        for p in seven_face_offsets(new_box) {
            self.points.insert(p);
        }

        let (nx0, ny0, nz0) = (new_box.position.x, new_box.position.y, new_box.position.z);
        let (nx1, ny1, nz1) = (nx0 + new_box.dims.dx, ny0 + new_box.dims.dy, nz0 + new_box.dims.dz);

        for other in placed {
            if std::ptr::eq(other, new_box) {
                continue;
            }
            let (px0, py0, pz0) = (other.position.x, other.position.y, other.position.z);
            let (px1, py1, pz1) = (px0 + other.dims.dx, py0 + other.dims.dy, pz0 + other.dims.dz);
            let xs = [nx0, nx1, px0, px1];
            let ys = [ny0, ny1, py0, py1];
            let zs = [nz0, nz1, pz0, pz1];
            for &x in &xs {
                for &y in &ys {
                    for &z in &zs {
                        self.points.insert((x, y, z));
                    }
                }
            }
        }
    }

    /// Drops points that now fall strictly inside a placed box, then
    /// returns the remaining points capped and sorted by `(z, x^2+y^2)`.
    pub fn candidates(&mut self, placed: &[PlacedBox], cap: usize, analytics: &mut Analytics) -> Vec<Position> {
        self.points.retain(|&p| !point_inside_any(p, placed));
        cap_and_sort(self.points.clone(), cap, analytics)
    }
}

impl Default for CornerPointSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Running set of "extreme points": seven face offsets from each placed
/// box plus, for each previously placed box, six points projecting the
/// new box's far corner onto a facing face of the old box — accepted
/// only when the two boxes' ranges overlap on the other two axes.
#[derive(Debug, Clone)]
pub struct ExtremePointSet {
    points: IndexSet<PointKey>,
}

impl ExtremePointSet {
    pub fn new() -> Self {
        let mut points = IndexSet::new();
        points.insert((0, 0, 0));
        Self { points }
    }

    pub fn update(&mut self, new_box: &PlacedBox, placed: &[PlacedBox]) {
        for p in seven_face_offsets(new_box) {
            self.points.insert(p);
        }

        let (nx0, ny0, nz0) = (new_box.position.x, new_box.position.y, new_box.position.z);
        let (nx1, ny1, nz1) = (nx0 + new_box.dims.dx, ny0 + new_box.dims.dy, nz0 + new_box.dims.dz);

        for other in placed {
            if std::ptr::eq(other, new_box) {
                continue;
            }
            let (ox0, oy0, oz0) = (other.position.x, other.position.y, other.position.z);
            let (ox1, oy1, oz1) = (ox0 + other.dims.dx, oy0 + other.dims.dy, oz0 + other.dims.dz);

            // X-axis projections: valid when the two boxes overlap on y and z.
            if ranges_overlap(ny0, ny1, oy0, oy1) && ranges_overlap(nz0, nz1, oz0, oz1) {
                self.points.insert((ox0, ny1, nz1));
                self.points.insert((ox1, ny1, nz1));
            }
            // Y-axis projections: valid when the two boxes overlap on x and z.
            if ranges_overlap(nx0, nx1, ox0, ox1) && ranges_overlap(nz0, nz1, oz0, oz1) {
                self.points.insert((nx1, oy0, nz1));
                self.points.insert((nx1, oy1, nz1));
            }
            // Z-axis projections: valid when the two boxes overlap on x and y.
            if ranges_overlap(nx0, nx1, ox0, ox1) && ranges_overlap(ny0, ny1, oy0, oy1) {
                self.points.insert((nx1, ny1, oz0));
                self.points.insert((nx1, ny1, oz1));
            }
        }
    }

    /// Adds the top/corner surface points of every placed box, then
    /// returns the capped, sorted candidate list.
    pub fn candidates(&mut self, placed: &[PlacedBox], cap: usize, analytics: &mut Analytics) -> Vec<Position> {
        for b in placed {
            for c in top_corners(b) {
                self.points.insert((c.x, c.y, c.z));
            }
        }
        self.points.retain(|&p| !point_inside_any(p, placed));
        cap_and_sort(self.points.clone(), cap, analytics)
    }
}

impl Default for ExtremePointSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Spiral of grid points around the pallet centre, for SFC: centre, then
/// floor corners, then radii `s, 2s, ...` with `ceil(2*pi*r/s)` angular
/// samples each, then a coarse fallback grid at step `2s`.
pub fn spiral_positions(pallet: &Pallet, step: Coord) -> Vec<Position> {
    let step = step.max(1);
    let cx = pallet.width as f64 / 2.0;
    let cy = pallet.depth as f64 / 2.0;

    let mut out = Vec::new();
    let clamp = |v: f64, max: Coord| -> Coord { (v.round() as Coord).clamp(0, max.saturating_sub(1).max(0)) };

    out.push(Position::new(clamp(cx, pallet.width), clamp(cy, pallet.depth), 0));
    out.push(Position::new(0, 0, 0));
    out.push(Position::new(pallet.width.saturating_sub(1), 0, 0));
    out.push(Position::new(0, pallet.depth.saturating_sub(1), 0));
    out.push(Position::new(
        pallet.width.saturating_sub(1),
        pallet.depth.saturating_sub(1),
        0,
    ));

    let max_radius = (pallet.width.max(pallet.depth)) as f64;
    let mut r = step as f64;
    while r <= max_radius {
        let circumference = 2.0 * std::f64::consts::PI * r;
        let samples = (circumference / step as f64).ceil().max(1.0) as usize;
        for i in 0..samples {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (samples as f64);
            let x = cx + r * theta.cos();
            let y = cy + r * theta.sin();
            if x >= 0.0 && y >= 0.0 && (x as Coord) < pallet.width && (y as Coord) < pallet.depth {
                out.push(Position::new(x as Coord, y as Coord, 0));
            }
        }
        r += step as f64;
    }

    // Fallback coarse grid at step 2s, so sparse pallets always have
    // enough floor candidates even when the spiral misses corners.
    for p in floor_grid(pallet, step * 2) {
        out.push(p);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoxItem, Dims};

    fn placed(x: Coord, y: Coord, z: Coord, dx: Coord, dy: Coord, dz: Coord) -> PlacedBox {
        PlacedBox {
            item: BoxItem::new("t", dx, dy, dz, 1.0).unwrap(),
            position: Position::new(x, y, z),
            dims: Dims::new(dx, dy, dz),
        }
    }

    #[test]
    fn floor_grid_stays_within_pallet() {
        let pallet = Pallet::new(40, 35, 100, 500.0).unwrap();
        let pts = floor_grid(&pallet, 15);
        assert!(pts.iter().all(|p| p.x < 40 && p.y < 35));
        assert!(pts.contains(&Position::new(0, 0, 0)));
        assert!(pts.contains(&Position::new(15, 15, 0)));
    }

    #[test]
    fn corner_point_set_starts_at_origin() {
        let set = CornerPointSet::new();
        assert!(set.points.contains(&(0, 0, 0)));
    }

    #[test]
    fn corner_point_set_grows_after_placement() {
        let mut set = CornerPointSet::new();
        let b = placed(0, 0, 0, 10, 10, 10);
        let placed_list = vec![b.clone()];
        set.update(&b, &placed_list);
        let mut analytics = Analytics::new(20);
        let cands = set.candidates(&placed_list, 4096, &mut analytics);
        assert!(cands.iter().any(|p| p.x == 10 && p.y == 0 && p.z == 0));
    }

    #[test]
    fn candidate_cap_trims_and_records_it() {
        let mut set = CornerPointSet::new();
        for i in 0..20 {
            set.points.insert((i, i, i));
        }
        let mut analytics = Analytics::new(20);
        let cands = set.candidates(&[], 5, &mut analytics);
        assert_eq!(cands.len(), 5);
        assert_eq!(analytics.candidate_cap_trims, 1);
    }
}
