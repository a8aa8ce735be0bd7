use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::model::Coord;

/// The supporting-box weight rule's named constant: a supporting box
/// must weigh at least 80% of the box it supports.
pub const WEIGHT_SUPPORT_RATIO: f64 = 0.8;

/// One of the five placement-policy variants sharing the packer core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Stable, weight-ordered stacking; never perches heavier boxes on lighter ones.
    WeightAware,
    /// Maximizes space usage via a growing extreme-point candidate set.
    ExtremePoints,
    /// Largest-Area-Fit-First: fast, predictable, per-level tiling.
    Laff,
    /// Corner-point candidate set with a compactness-aware score.
    CornerPoints,
    /// Spiral (space-filling-curve) candidate generation from pallet centre.
    Sfc,
}

impl Variant {
    pub fn display_name(&self) -> &'static str {
        match self {
            Variant::WeightAware => "Weight-Aware",
            Variant::ExtremePoints => "Extreme-Points",
            Variant::Laff => "Largest-Area-Fit-First",
            Variant::CornerPoints => "Corner-Points",
            Variant::Sfc => "Space-Filling-Curve",
        }
    }

    pub const ALL: [Variant; 5] = [
        Variant::WeightAware,
        Variant::ExtremePoints,
        Variant::Laff,
        Variant::CornerPoints,
        Variant::Sfc,
    ];
}

impl FromStr for Variant {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "weightaware" => Ok(Self::WeightAware),
            "extremepoints" => Ok(Self::ExtremePoints),
            "laff" => Ok(Self::Laff),
            "cornerpoints" => Ok(Self::CornerPoints),
            "sfc" | "spacefillingcurve" => Ok(Self::Sfc),
            _ => Err(()),
        }
    }
}

fn default_support_threshold_for(variant: Variant) -> f64 {
    match variant {
        Variant::WeightAware => 0.8,
        _ => 0.5,
    }
}

/// Options shared by every variant, plus the knobs Weight-Aware needs
/// specifically. Construct via [`PackingOptions::for_variant`] then tune
/// with the builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingOptions {
    /// Minimum fraction of a candidate's bottom face that must be
    /// supported for the placement to be accepted.
    pub support_threshold: f64,
    /// Weight-Aware only: reject placements that would perch a heavier
    /// box on a lighter one.
    pub weight_check_enabled: bool,
    /// Require edge support (>= 2 of the 4 base corners resting on a
    /// supporting top face) when `support_threshold > 0.7`, Weight-Aware
    /// strict mode.
    pub require_edge_support: bool,
    /// Floor-grid step, in centimetres. Also used as the spiral
    /// radius/angular step for SFC.
    pub grid_step: Coord,
    /// Maximum size of a growing candidate-point set before it is
    /// trimmed (lowest-z points retained).
    pub candidate_cap: usize,
    /// Seed for the Extreme-Points jitter, so runs are reproducible
    /// given a seed.
    pub seed: u64,
    /// Density-grid cell size used by the analytics recorder.
    pub density_cell: Coord,
}

impl PackingOptions {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            support_threshold: default_support_threshold_for(variant),
            weight_check_enabled: true,
            require_edge_support: false,
            grid_step: 15,
            candidate_cap: 4096,
            seed: 0x5EED_u64,
            density_cell: 20,
        }
    }

    pub fn builder(variant: Variant) -> PackingOptionsBuilder {
        PackingOptionsBuilder {
            opts: Self::for_variant(variant),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.support_threshold > 0.0 && self.support_threshold <= 1.0) {
            return Err(PackError::InvalidConfig(format!(
                "support_threshold must be in (0,1], got {}",
                self.support_threshold
            )));
        }
        if self.grid_step <= 0 {
            return Err(PackError::InvalidConfig(format!(
                "grid_step must be > 0, got {}",
                self.grid_step
            )));
        }
        if self.candidate_cap == 0 {
            return Err(PackError::InvalidConfig(
                "candidate_cap must be > 0".to_string(),
            ));
        }
        if self.density_cell <= 0 {
            return Err(PackError::InvalidConfig(format!(
                "density_cell must be > 0, got {}",
                self.density_cell
            )));
        }
        Ok(())
    }
}

/// Fluent builder for [`PackingOptions`].
#[derive(Debug, Clone)]
pub struct PackingOptionsBuilder {
    opts: PackingOptions,
}

impl PackingOptionsBuilder {
    pub fn support_threshold(mut self, v: f64) -> Self {
        self.opts.support_threshold = v;
        self
    }
    pub fn weight_check_enabled(mut self, v: bool) -> Self {
        self.opts.weight_check_enabled = v;
        self
    }
    pub fn require_edge_support(mut self, v: bool) -> Self {
        self.opts.require_edge_support = v;
        self
    }
    pub fn grid_step(mut self, v: Coord) -> Self {
        self.opts.grid_step = v;
        self
    }
    pub fn candidate_cap(mut self, v: usize) -> Self {
        self.opts.candidate_cap = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.opts.seed = v;
        self
    }
    pub fn density_cell(mut self, v: Coord) -> Self {
        self.opts.density_cell = v;
        self
    }
    pub fn build(self) -> PackingOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_from_str_accepts_common_spellings() {
        assert_eq!("weight-aware".parse::<Variant>(), Ok(Variant::WeightAware));
        assert_eq!("sfc".parse::<Variant>(), Ok(Variant::Sfc));
        assert_eq!(
            "corner_points".parse::<Variant>(),
            Ok(Variant::CornerPoints)
        );
    }

    #[test]
    fn default_thresholds_match_spec_table() {
        assert_eq!(
            PackingOptions::for_variant(Variant::WeightAware).support_threshold,
            0.8
        );
        assert_eq!(
            PackingOptions::for_variant(Variant::Sfc).support_threshold,
            0.5
        );
    }

    #[test]
    fn validate_rejects_zero_grid_step() {
        let opts = PackingOptions::builder(Variant::Laff).grid_step(0).build();
        assert!(opts.validate().is_err());
    }
}
