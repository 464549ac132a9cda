//! Core type definitions.

pub mod target;

pub use target::expand_targets;
