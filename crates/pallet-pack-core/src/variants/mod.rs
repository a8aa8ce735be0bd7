//! One module per placement-policy variant. Each exposes a single
//! constructor returning a boxed [`crate::policy::PlacementPolicy`].

mod corner_points;
mod extreme_points;
mod laff;
mod sfc;
mod weight_aware;

use crate::config::Variant;
use crate::policy::PlacementPolicy;

/// Builds the policy implementation for a variant tag.
pub fn build(variant: Variant, seed: u64) -> Box<dyn PlacementPolicy> {
    match variant {
        Variant::WeightAware => Box::new(weight_aware::WeightAwarePolicy::new()),
        Variant::ExtremePoints => Box::new(extreme_points::ExtremePointsPolicy::new(seed)),
        Variant::Laff => Box::new(laff::LaffPolicy::new()),
        Variant::CornerPoints => Box::new(corner_points::CornerPointsPolicy::new()),
        Variant::Sfc => Box::new(sfc::SfcPolicy::new()),
    }
}
