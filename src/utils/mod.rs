//! Helpers shared across the crate that are not tied to the structure model.

pub mod parallel;
