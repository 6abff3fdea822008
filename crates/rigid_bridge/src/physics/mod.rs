//! Physics object lifecycle and collision events
//!
//! - [`World`]: one native simulation world, stepped by the host
//! - [`ObjectBuilder`]: fluent construction of static, kinematic, dynamic and ghost objects
//! - [`BodyHandle`]: owning handle to one native object
//! - [`ShapeCache`]: per-world deduplication of native shapes
//! - [`CollisionChannel`]: frame-to-frame diffing of overlap reports

pub mod body;
pub mod builder;
pub mod collision;
pub mod collision_system;
pub mod entity;
pub mod shape;
pub mod shape_cache;
pub mod world;

pub use body::{BodyHandle, BodyKind};
pub use builder::ObjectBuilder;
pub use collision::{Aabb, Ray};
pub use collision_system::{CollisionChannel, CollisionListener, CollisionPair, CollisionSnapshot};
pub use entity::EntityId;
pub use shape::{Shape, ShapeHandle};
pub use shape_cache::ShapeCache;
pub use world::{RaycastResult, World, WorldState};
