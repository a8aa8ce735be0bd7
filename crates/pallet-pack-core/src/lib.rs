//! Core library for the heuristic 3D pallet-loading engine.
//!
//! - Variants: Weight-Aware, Extreme-Points, Largest-Area-Fit-First,
//!   Corner-Points, Space-Filling-Curve — five placement policies sharing
//!   one geometric kernel and one outer packing loop.
//! - Entry point: [`Packer`] — `set_pallet`, `add_box`, `pack`, `result`.
//! - Data model is serde-serializable; the CLI crate owns catalogue I/O
//!   and human-facing output.
//!
//! Quick example:
//! ```
//! use pallet_pack_core::{BoxItem, Packer, Pallet, PackingOptions, Variant};
//!
//! let mut packer = Packer::new(Variant::WeightAware, PackingOptions::for_variant(Variant::WeightAware));
//! packer.set_pallet(Pallet::new(120, 80, 160, 1000.0).unwrap());
//! packer.add_box(BoxItem::new("crate-1", 40, 30, 20, 12.5).unwrap());
//! let result = packer.pack().unwrap();
//! println!("placed {} of {}", result.placed.len(), result.placed.len() + result.unplaced.len());
//! ```

pub mod analytics;
pub mod candidates;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod model;
pub mod packer;
pub mod policy;
pub mod reporter;
pub mod rng;
pub mod state;
pub mod variants;

pub use config::*;
pub use error::*;
pub use model::*;
pub use packer::*;

/// Convenience prelude bringing the primary API into scope.
/// Importing `pallet_pack_core::prelude::*` brings the primary types into scope.
pub mod prelude {
    pub use crate::analytics::Analytics;
    pub use crate::config::{PackingOptions, PackingOptionsBuilder, Variant, WEIGHT_SUPPORT_RATIO};
    pub use crate::error::{PackError, Result};
    pub use crate::model::{
        BoxId, BoxItem, Dims, Pallet, PlacedBox, Position, RejectionReason, UnplacedBox,
    };
    pub use crate::packer::{PackResult, Packer};
    pub use crate::reporter::Report;
}
