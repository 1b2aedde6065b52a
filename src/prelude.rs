//! Prelude module for day_range_picker crate.
//!
//! Re-exports the derive_more macros used across the crate.

pub use derive_more::{Display, From, Into};
