//! The geometric kernel: pure functions over plain data, not methods on
//! a packer, so tests can drive them directly.

use crate::model::{Coord, Dims, Pallet, PlacedBox, Position};

/// Z-tolerance (centimetres) used only when matching a candidate's
/// support plane against a placed box's top face.
pub const SUPPORT_Z_TOLERANCE: f64 = 0.1;

/// Two axis-aligned cuboids overlap iff their projections on all three
/// axes overlap with positive measure. Touching faces are not an overlap.
pub fn overlap(pos_a: Position, dims_a: Dims, pos_b: Position, dims_b: Dims) -> bool {
    let x = pos_a.x < pos_b.x + dims_b.dx && pos_b.x < pos_a.x + dims_a.dx;
    let y = pos_a.y < pos_b.y + dims_b.dy && pos_b.y < pos_a.y + dims_a.dy;
    let z = pos_a.z < pos_b.z + dims_b.dz && pos_b.z < pos_a.z + dims_a.dz;
    x && y && z
}

/// `pos + dims <= (W,D,H)` componentwise, `pos >= 0`.
pub fn fits_in_pallet(pos: Position, dims: Dims, pallet: &Pallet) -> bool {
    pos.x >= 0
        && pos.y >= 0
        && pos.z >= 0
        && pos.x + dims.dx <= pallet.width
        && pos.y + dims.dy <= pallet.depth
        && pos.z + dims.dz <= pallet.height
}

/// Whether placing `dims` at `pos` would overlap any already-placed box.
pub fn intersects_any(pos: Position, dims: Dims, placed: &[PlacedBox]) -> bool {
    placed
        .iter()
        .any(|p| overlap(pos, dims, p.position, p.dims))
}

fn rect_overlap_area(
    ax: Coord,
    ay: Coord,
    aw: Coord,
    ah: Coord,
    bx: Coord,
    by: Coord,
    bw: Coord,
    bh: Coord,
) -> i64 {
    let x1 = ax.max(bx);
    let y1 = ay.max(by);
    let x2 = (ax + aw).min(bx + bw);
    let y2 = (ay + ah).min(by + bh);
    if x1 < x2 && y1 < y2 {
        (x2 - x1) as i64 * (y2 - y1) as i64
    } else {
        0
    }
}

/// Fraction of the candidate's bottom face covered by top faces of
/// placed boxes whose top sits at the candidate's z (within
/// [`SUPPORT_Z_TOLERANCE`]). At z = 0 the ratio is defined as 1.
pub fn support_ratio(pos: Position, dims: Dims, placed: &[PlacedBox]) -> f64 {
    if pos.z == 0 {
        return 1.0;
    }
    let base_area = dims.base_area();
    if base_area == 0 {
        return 0.0;
    }
    let mut covered: i64 = 0;
    for other in placed {
        if (other.top_z() as f64 - pos.z as f64).abs() < SUPPORT_Z_TOLERANCE {
            covered += rect_overlap_area(
                pos.x,
                pos.y,
                dims.dx,
                dims.dy,
                other.position.x,
                other.position.y,
                other.dims.dx,
                other.dims.dy,
            );
        }
    }
    (covered as f64 / base_area as f64).min(1.0)
}

/// Placed boxes that contribute positive support area under the
/// candidate, each with its overlap area. Used by the weight-safety
/// rule and by support-quality analytics.
pub fn supporting_boxes<'a>(
    pos: Position,
    dims: Dims,
    placed: &'a [PlacedBox],
) -> Vec<(&'a PlacedBox, i64)> {
    if pos.z == 0 {
        return Vec::new();
    }
    placed
        .iter()
        .filter_map(|other| {
            if (other.top_z() as f64 - pos.z as f64).abs() >= SUPPORT_Z_TOLERANCE {
                return None;
            }
            let area = rect_overlap_area(
                pos.x,
                pos.y,
                dims.dx,
                dims.dy,
                other.position.x,
                other.position.y,
                other.dims.dx,
                other.dims.dy,
            );
            (area > 0).then_some((other, area))
        })
        .collect()
}

/// Count of base corners `(x,y), (x+w,y), (x,y+h), (x+w,y+h)` lying on
/// some supporting placed top face (closed rectangle). Used only by
/// Weight-Aware in strict mode.
pub fn edge_support(pos: Position, dims: Dims, placed: &[PlacedBox]) -> usize {
    if pos.z == 0 {
        return 4;
    }
    let corners = [
        (pos.x, pos.y),
        (pos.x + dims.dx, pos.y),
        (pos.x, pos.y + dims.dy),
        (pos.x + dims.dx, pos.y + dims.dy),
    ];
    corners
        .iter()
        .filter(|&&(cx, cy)| {
            placed.iter().any(|other| {
                (other.top_z() as f64 - pos.z as f64).abs() < SUPPORT_Z_TOLERANCE
                    && cx >= other.position.x
                    && cx <= other.position.x + other.dims.dx
                    && cy >= other.position.y
                    && cy <= other.position.y + other.dims.dy
            })
        })
        .count()
}

/// `weight_used + w <= cap`.
pub fn weight_ok(w: f64, weight_used: f64, cap: f64) -> bool {
    weight_used + w <= cap
}

/// The up-to-six permutations of `(length, width, height)`, de-duplicated
/// (cubes yield one; plates yield three). Order is the fixed permutation
/// order below, never randomized — variants short-circuit the legal
/// orientation they want by index semantics, not by shuffling this order.
pub fn orientations(length: Coord, width: Coord, height: Coord) -> Vec<Dims> {
    let perms = [
        (length, width, height),
        (width, length, height),
        (height, width, length),
        (width, height, length),
        (length, height, width),
        (height, length, width),
    ];
    let mut out: Vec<Dims> = Vec::with_capacity(6);
    for (dx, dy, dz) in perms {
        let d = Dims::new(dx, dy, dz);
        if !out.contains(&d) {
            out.push(d);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_touching_faces_not_overlapping() {
        let a = Dims::new(10, 10, 10);
        let b = Dims::new(10, 10, 10);
        assert!(!overlap(
            Position::new(0, 0, 0),
            a,
            Position::new(10, 0, 0),
            b
        ));
    }

    #[test]
    fn overlap_detects_real_intersection() {
        let a = Dims::new(10, 10, 10);
        let b = Dims::new(10, 10, 10);
        assert!(overlap(Position::new(0, 0, 0), a, Position::new(5, 5, 5), b));
    }

    #[test]
    fn fits_in_pallet_rejects_negative_position() {
        let pallet = Pallet::new(100, 100, 100, 500.0).unwrap();
        assert!(!fits_in_pallet(
            Position::new(-1, 0, 0),
            Dims::new(10, 10, 10),
            &pallet
        ));
    }

    #[test]
    fn support_ratio_is_one_at_floor() {
        assert_eq!(
            support_ratio(Position::new(0, 0, 0), Dims::new(10, 10, 10), &[]),
            1.0
        );
    }

    #[test]
    fn orientations_of_a_cube_are_deduplicated_to_one() {
        assert_eq!(orientations(10, 10, 10).len(), 1);
    }

    #[test]
    fn orientations_of_a_plate_dedup_to_three() {
        // length == width (square footprint) but height differs, so the six
        // permutations collapse to the three distinct (w,h,d) triples.
        assert_eq!(orientations(20, 20, 5).len(), 3);
    }

    #[test]
    fn orientations_of_a_generic_box_are_six() {
        assert_eq!(orientations(20, 15, 10).len(), 6);
    }
}
