//! Collision geometry used by the headless engine
//!
//! - [`primitives`] - rays and axis-aligned boxes with intersection tests

pub mod primitives;

pub use primitives::{Aabb, Ray};
