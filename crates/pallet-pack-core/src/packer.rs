//! The packer orchestrator: the one outer loop shared by all five
//! variants, specialized only through the four
//! [`crate::policy::PlacementPolicy`] hooks it calls.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::analytics::Analytics;
use crate::config::{PackingOptions, Variant, WEIGHT_SUPPORT_RATIO};
use crate::error::{PackError, Result};
use crate::geometry;
use crate::model::{BoxItem, Dims, Pallet, PlacedBox, Position, RejectionReason, UnplacedBox};
use crate::policy::PlacementPolicy;
use crate::reporter::{self, Report};
use crate::state::PalletState;
use crate::variants;

/// The `{ placed, unplaced, report, analytics, calculation_time }`
/// result of one `pack()` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackResult {
    pub placed: Vec<PlacedBox>,
    pub unplaced: Vec<UnplacedBox>,
    pub report: Report,
    pub analytics: Analytics,
    /// Wall-clock duration of the `pack()` call, in seconds.
    pub calculation_time: f64,
}

/// Orchestrates one placement-policy variant over one pallet and box
/// list. Owns the live `PalletState` for the duration of a `pack()` call;
/// no other task observes intermediate state.
pub struct Packer {
    variant: Variant,
    options: PackingOptions,
    pallet: Option<Pallet>,
    items: Vec<BoxItem>,
    policy: Box<dyn PlacementPolicy>,
    last_result: Option<PackResult>,
}

impl std::fmt::Debug for Packer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packer")
            .field("variant", &self.variant)
            .field("options", &self.options)
            .field("pallet", &self.pallet)
            .field("item_count", &self.items.len())
            .finish()
    }
}

impl Packer {
    /// Builds a packer for `variant`, using `options.seed` to seed
    /// Extreme-Points' jitter regardless of which variant is chosen.
    pub fn new(variant: Variant, options: PackingOptions) -> Self {
        Self {
            variant,
            policy: variants::build(variant, options.seed),
            options,
            pallet: None,
            items: Vec::new(),
            last_result: None,
        }
    }

    /// Convenience constructor using the variant's default options.
    pub fn with_defaults(variant: Variant) -> Self {
        Self::new(variant, PackingOptions::for_variant(variant))
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn options(&self) -> &PackingOptions {
        &self.options
    }

    pub fn set_pallet(&mut self, pallet: Pallet) {
        self.pallet = Some(pallet);
    }

    /// May be called multiple times before `pack()`.
    pub fn add_box(&mut self, item: BoxItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[BoxItem] {
        &self.items
    }

    /// The last `pack()` result, if `pack()` has run at least once.
    pub fn result(&self) -> Option<&PackResult> {
        self.last_result.as_ref()
    }

    /// Runs the unified packing algorithm to completion. Re-initializes
    /// pallet state and analytics on every call, so repeating `pack()`
    /// without changing inputs reproduces the same result.
    ///
    /// Infallible once a pallet is set: geometric rejection and unplaced
    /// items are data (`RejectionReason`, `UnplacedBox`), never `Err`. The
    /// only error this returns is construction-time misuse (no pallet
    /// set, or invalid options).
    #[instrument(skip_all, fields(variant = ?self.variant, boxes = self.items.len()))]
    pub fn pack(&mut self) -> Result<PackResult> {
        let pallet = self.pallet.clone().ok_or(PackError::NoPallet)?;
        self.options.validate()?;

        let start = Instant::now();
        let mut state = PalletState::new(pallet.clone());
        let mut analytics = Analytics::new(self.options.density_cell);
        self.policy.reset();

        let mut items = self.items.clone();
        self.policy.sort_boxes(&mut items);

        let mut unplaced = Vec::new();

        for item in items {
            analytics.record_attempt();

            let candidates = self
                .policy
                .candidate_positions(&state, &self.options, &mut analytics);
            let orientations = self.policy.orientations(&item);
            let requires_edge_support = self.policy.requires_edge_support(&self.options);

            let mut best: Option<(Position, Dims, f64)> = None;
            let mut reason = RejectionReason::NoValidOrientation;

            'candidates: for &pos in &candidates {
                for &dims in &orientations {
                    if !geometry::fits_in_pallet(pos, dims, state.pallet()) {
                        continue;
                    }
                    if geometry::intersects_any(pos, dims, state.placed()) {
                        reason = RejectionReason::IntersectsExisting;
                        continue;
                    }
                    if !geometry::weight_ok(item.weight, state.weight_used(), pallet.max_weight) {
                        reason = RejectionReason::OverWeightCap;
                        continue;
                    }
                    let ratio = geometry::support_ratio(pos, dims, state.placed());
                    if ratio < self.options.support_threshold {
                        reason = RejectionReason::NoSupport;
                        continue;
                    }
                    if requires_edge_support && geometry::edge_support(pos, dims, state.placed()) < 2 {
                        reason = RejectionReason::NoSupport;
                        continue;
                    }
                    if self.options.weight_check_enabled && self.policy.weight_rule_applies() {
                        let violates = geometry::supporting_boxes(pos, dims, state.placed())
                            .iter()
                            .any(|&(other, _)| other.item.weight < item.weight * WEIGHT_SUPPORT_RATIO);
                        if violates {
                            reason = RejectionReason::WeightRuleViolated;
                            continue;
                        }
                    }

                    analytics.record_support_sample(ratio);
                    let score = self.policy.score(pos, dims, &state);
                    let is_better = best.map_or(true, |(_, _, best_score)| score < best_score);
                    if is_better {
                        best = Some((pos, dims, score));
                    }
                    if pos.z == 0 && self.policy.short_circuits_at_floor() {
                        break 'candidates;
                    }
                }
            }

            match best {
                Some((pos, dims, _)) => {
                    let placed = PlacedBox {
                        item: item.clone(),
                        position: pos,
                        dims,
                    };
                    analytics.record_placement(
                        item.id.clone(),
                        item.weight,
                        start.elapsed(),
                        pos.x,
                        pos.y,
                        pos.z,
                        dims,
                    );
                    state.commit(placed.clone());
                    self.policy.on_placement(&placed, &state);
                    trace!(box_id = %item.id, x = pos.x, y = pos.y, z = pos.z, "placed");
                }
                None => {
                    debug!(box_id = %item.id, ?reason, candidates = candidates.len(), "box unplaced");
                    analytics.record_rejection(reason);
                    unplaced.push(UnplacedBox {
                        item: item.clone(),
                        reason,
                        note: format!(
                            "no candidate accepted among {} position(s) x {} orientation(s)",
                            candidates.len(),
                            orientations.len()
                        ),
                    });
                }
            }
        }

        let calculation_time = start.elapsed();
        let all_input_volume: i64 = self.items.iter().map(|b| b.volume()).sum();
        let all_input_weight: f64 = self.items.iter().map(|b| b.weight).sum();
        let report = reporter::build(&state, &unplaced, all_input_volume, all_input_weight, &analytics);

        debug!(
            placed = state.placed().len(),
            unplaced = unplaced.len(),
            weight_used = state.weight_used(),
            elapsed_ms = calculation_time.as_secs_f64() * 1000.0,
            "pack complete"
        );

        let result = PackResult {
            placed: state.placed().to_vec(),
            unplaced,
            report,
            analytics,
            calculation_time: calculation_time.as_secs_f64(),
        };
        self.last_result = Some(result.clone());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoxItem;

    fn pallet() -> Pallet {
        Pallet::new(120, 80, 160, 1000.0).unwrap()
    }

    #[test]
    fn pack_without_pallet_errors() {
        let mut packer = Packer::with_defaults(Variant::WeightAware);
        packer.add_box(BoxItem::new("b", 10, 10, 10, 1.0).unwrap());
        assert!(matches!(packer.pack(), Err(PackError::NoPallet)));
    }

    #[test]
    fn single_small_box_lands_at_origin() {
        let mut packer = Packer::with_defaults(Variant::WeightAware);
        packer.set_pallet(pallet());
        packer.add_box(BoxItem::new("B", 20, 15, 10, 2.0).unwrap());
        let result = packer.pack().unwrap();
        assert_eq!(result.placed.len(), 1);
        assert!(result.unplaced.is_empty());
        let b = &result.placed[0];
        assert_eq!(b.position, Position::new(0, 0, 0));
        assert_eq!(b.dims, Dims::new(20, 15, 10));
    }

    #[test]
    fn oversize_box_is_unplaced() {
        let mut packer = Packer::with_defaults(Variant::WeightAware);
        packer.set_pallet(pallet());
        packer.add_box(BoxItem::new("big", 130, 90, 170, 50.0).unwrap());
        let result = packer.pack().unwrap();
        assert!(result.placed.is_empty());
        assert_eq!(result.unplaced.len(), 1);
    }

    #[test]
    fn repeated_pack_is_idempotent() {
        let mut packer = Packer::with_defaults(Variant::ExtremePoints);
        packer.set_pallet(pallet());
        for i in 0..8 {
            packer.add_box(BoxItem::new(format!("b{i}"), 20, 20, 20, 3.0 + i as f64).unwrap());
        }
        let first = packer.pack().unwrap();
        let second = packer.pack().unwrap();
        let to_key = |r: &PackResult| {
            r.placed
                .iter()
                .map(|p| (p.item.id.clone(), p.position, p.dims))
                .collect::<Vec<_>>()
        };
        assert_eq!(to_key(&first), to_key(&second));
    }

    #[test]
    fn weight_cap_is_never_exceeded() {
        let mut packer = Packer::with_defaults(Variant::WeightAware);
        packer.set_pallet(pallet());
        for i in 0..20 {
            packer.add_box(BoxItem::new(format!("b{i}"), 20, 20, 20, 60.0).unwrap());
        }
        let result = packer.pack().unwrap();
        let placed_weight: f64 = result.placed.iter().map(|p| p.item.weight).sum();
        assert!(placed_weight <= 1000.0);
        assert!(result.unplaced.len() >= 4);
    }
}
