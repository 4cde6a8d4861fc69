//! Domain types for kindload
//!
//! - Artifact / BuildOutput: images handed over by the build step
//! - BuiltTags: tags the current run actually produced
//! - LoadOutcome / LoadReport: per-artifact status of a load

pub mod artifact;
pub mod outcome;

pub use artifact::{Artifact, BuildOutput, BuiltTags};
pub use outcome::{LoadOutcome, LoadReport};
