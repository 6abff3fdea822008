//! # Rigid Bridge
//!
//! Object lifecycle and collision event orchestration over a native rigid-body
//! engine.
//!
//! ## Features
//!
//! - **Typed objects**: static, kinematic, dynamic and ghost handles with
//!   per-kind contracts, released exactly once
//! - **Shape deduplication**: equal shape descriptors share one native shape
//! - **Collision events**: per-step overlap reports diffed into new and lost
//!   collisions, on separate body and ghost channels
//! - **Raycasts and gravity**: thin, validated wrappers over the engine
//! - **Pluggable engine**: anything implementing [`native::NativeEngine`];
//!   a pure-Rust [`native::HeadlessEngine`] ships for tests and headless hosts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rigid_bridge::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     rigid_bridge::foundation::logging::init();
//!
//!     let mut world = World::new(HeadlessEngine::new());
//!     world.add_collision_listener(|pair: &CollisionPair| {
//!         println!("{} hit {}", pair.entity_a, pair.entity_b);
//!     });
//!
//!     let _ground = world
//!         .create_object()
//!         .with_id(1)
//!         .with_plane(100.0, 100.0)
//!         .build_static()?;
//!     let _ball = world
//!         .create_object()
//!         .with_id(2)
//!         .with_sphere(0.5)
//!         .at_position(Vec3::new(0.0, 0.4, 0.0))
//!         .build_dynamic()?;
//!
//!     world.update()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod native;
pub mod physics;

#[cfg(test)]
mod tests;

pub use error::{PhysicsError, Result};

/// Common imports for users of the crate
pub mod prelude {
    pub use crate::{
        config::{Config, WorldConfig},
        error::PhysicsError,
        foundation::math::{Quat, Vec3, BASE_DIRECTION},
        native::{HeadlessEngine, NativeEngine, NativeHandle, SharedEngine, TracingEngine},
        physics::{
            BodyHandle, BodyKind, CollisionListener, CollisionPair, EntityId, ObjectBuilder,
            RaycastResult, Shape, World, WorldState,
        },
    };
}
