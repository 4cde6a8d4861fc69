//! kindload - make freshly built images available inside a kind cluster
//!
//! Given the artifacts of a build, kindload transfers into every cluster
//! node exactly the images this run produced, skipping any the nodes
//! already cache.

pub mod cluster;
pub mod command;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod kubectl;
pub mod loader;
pub mod transfer;

pub use error::{KindLoadError, Result};
pub use loader::ImageLoader;
