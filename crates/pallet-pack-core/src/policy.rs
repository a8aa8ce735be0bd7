//! The placement-policy trait: composition over inheritance. Each
//! variant implements this trait and supplies
//! only the four things that actually differ between them — box
//! ordering, candidate generation, scoring, and what to remember after a
//! placement — while the shared loop lives in [`crate::packer`].

use std::fmt::Debug;

use crate::analytics::Analytics;
use crate::config::PackingOptions;
use crate::geometry;
use crate::model::{BoxItem, Dims, PlacedBox, Position};
use crate::state::PalletState;

pub trait PlacementPolicy: Debug {
    /// Orders `items` in place, the order boxes are attempted in. Takes
    /// `&mut self` because Extreme-Points' jittered key consumes its
    /// seeded generator while sorting.
    fn sort_boxes(&mut self, items: &mut [BoxItem]);

    /// Candidate positions to try for the current box, already capped and
    /// sorted by the underlying generator.
    fn candidate_positions(
        &mut self,
        state: &PalletState,
        opts: &PackingOptions,
        analytics: &mut Analytics,
    ) -> Vec<Position>;

    /// Tie-break score among candidates that pass every geometric and
    /// weight check; lower is better. The packer picks the first
    /// candidate in generator order that passes checks for most variants,
    /// but Corner-Points and LAFF use this to prefer compactness.
    fn score(&self, pos: Position, dims: Dims, state: &PalletState) -> f64;

    /// Update whatever running candidate structure the variant keeps,
    /// after a box has actually been placed.
    fn on_placement(&mut self, placed: &PlacedBox, state: &PalletState);

    /// Whether the weight-safety rule (`WEIGHT_SUPPORT_RATIO`) applies to
    /// this variant at all. The packer still gates the check on
    /// `opts.weight_check_enabled`. Only Weight-Aware returns `true`.
    fn weight_rule_applies(&self) -> bool {
        false
    }

    /// Whether `>= 2` base corners must rest on a supporting top face for
    /// this attempt. Weight-Aware turns this on once `support_threshold`
    /// crosses 0.7, in addition to any explicit `opts.require_edge_support`.
    fn requires_edge_support(&self, opts: &PackingOptions) -> bool {
        opts.require_edge_support
    }

    /// Orientations to try for this item, in the order the variant wants
    /// them evaluated. Defaults to all (up to) six permutations; LAFF
    /// overrides this to the single nominal orientation.
    fn orientations(&self, item: &BoxItem) -> Vec<Dims> {
        geometry::orientations(item.length, item.width, item.height)
    }

    /// Whether a z = 0 (floor) acceptance is provably optimal for this
    /// variant, letting the packer stop trying further candidates for the
    /// current box.
    fn short_circuits_at_floor(&self) -> bool {
        false
    }

    /// Clears any running candidate state, for reuse across `pack()` calls.
    fn reset(&mut self);
}
