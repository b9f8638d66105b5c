//! Immutable, structurally-typed message values and the compact `cereal` text codec.

/// Value model, numerics, persistent collections, message runtime, and the cereal codec.
pub mod model;
