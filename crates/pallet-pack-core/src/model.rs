use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};

/// A position or size coordinate, in whole centimetres.
pub type Coord = i32;
/// A mass, in kilograms.
pub type Weight = f64;

/// Stable identifier for an input box. Cheap to clone, usable as a hash key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoxId(pub String);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BoxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BoxId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An input cuboid with a weight. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxItem {
    pub id: BoxId,
    pub length: Coord,
    pub width: Coord,
    pub height: Coord,
    pub weight: Weight,
}

impl BoxItem {
    /// Builds a box, rejecting non-positive dimensions or weight.
    ///
    /// This is the only validation the core performs on its own initiative;
    /// per-field business-rule ranges (e.g. "dimension <= 500cm") belong to
    /// the validation collaborator, not here.
    pub fn new(
        id: impl Into<BoxId>,
        length: Coord,
        width: Coord,
        height: Coord,
        weight: Weight,
    ) -> Result<Self> {
        if length <= 0 || width <= 0 || height <= 0 {
            return Err(PackError::InvalidDimensions {
                length,
                width,
                height,
            });
        }
        if !(weight > 0.0) {
            return Err(PackError::InvalidWeight { weight });
        }
        Ok(Self {
            id: id.into(),
            length,
            width,
            height,
            weight,
        })
    }

    pub fn volume(&self) -> i64 {
        self.length as i64 * self.width as i64 * self.height as i64
    }
}

/// The effective size of a box after a chosen orientation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub dx: Coord,
    pub dy: Coord,
    pub dz: Coord,
}

impl Dims {
    pub fn new(dx: Coord, dy: Coord, dz: Coord) -> Self {
        Self { dx, dy, dz }
    }

    pub fn volume(&self) -> i64 {
        self.dx as i64 * self.dy as i64 * self.dz as i64
    }

    pub fn base_area(&self) -> i64 {
        self.dx as i64 * self.dy as i64
    }
}

/// The minimum corner of a placed cuboid, in pallet coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl Position {
    pub fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }

    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };
}

/// A `BoxItem` plus a committed position and orientation. Never mutated
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedBox {
    pub item: BoxItem,
    pub position: Position,
    pub dims: Dims,
}

impl PlacedBox {
    pub fn top_z(&self) -> Coord {
        self.position.z + self.dims.dz
    }
}

/// The rectangular container: fixed dimensions and weight cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    pub width: Coord,
    pub depth: Coord,
    pub height: Coord,
    pub max_weight: Weight,
}

impl Pallet {
    pub fn new(width: Coord, depth: Coord, height: Coord, max_weight: Weight) -> Result<Self> {
        if width <= 0 || depth <= 0 || height <= 0 {
            return Err(PackError::InvalidPalletDimensions {
                width,
                depth,
                height,
            });
        }
        if !(max_weight > 0.0) {
            return Err(PackError::InvalidWeight { weight: max_weight });
        }
        Ok(Self {
            width,
            depth,
            height,
            max_weight,
        })
    }

    pub fn volume(&self) -> i64 {
        self.width as i64 * self.depth as i64 * self.height as i64
    }
}

/// A tagged cause for failing to place a box at a particular candidate.
/// Used only in analytics; never surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectionReason {
    NoValidOrientation,
    NoSupport,
    IntersectsExisting,
    OverWeightCap,
    WeightRuleViolated,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectionReason::NoValidOrientation => "no_valid_orientation",
            RejectionReason::NoSupport => "no_support",
            RejectionReason::IntersectsExisting => "intersects_existing",
            RejectionReason::OverWeightCap => "over_weight_cap",
            RejectionReason::WeightRuleViolated => "weight_rule_violated",
        };
        f.write_str(s)
    }
}

/// A box that exhausted every candidate without a successful placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnplacedBox {
    pub item: BoxItem,
    pub reason: RejectionReason,
    pub note: String,
}
