//! Native engine contract
//!
//! The rigid-body engine (collision detection, solving, integration, mesh
//! deserialization) lives behind [`NativeEngine`]. Everything it creates is
//! referred to by an opaque 64-bit [`NativeHandle`]; this crate never looks
//! inside a handle, it only hands it back.
//!
//! Three implementations ship with the crate:
//! - [`HeadlessEngine`], a pure-Rust collaborator for tests and headless hosts
//! - [`TracingEngine`], a decorator logging and counting every call
//! - [`SharedEngine`], a decorator letting the host keep access to an engine
//!   owned by a world

pub mod headless;
pub mod shared;
pub mod trace;

use std::path::Path;
use std::time::Duration;

use crate::foundation::math::{Quat, Vec3};

pub use headless::HeadlessEngine;
pub use shared::SharedEngine;
pub use trace::{CallLog, TracingEngine};

/// Opaque reference to an object owned by the native engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(u64);

impl NativeHandle {
    /// Handle value that never refers to a native object
    pub const NULL: Self = Self(0);

    /// Wrap a raw handle value received from the engine
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value to pass back to the engine
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether this is the null handle
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Raw ray hit as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeRayHit {
    /// Id of the hit object, `0` when nothing was hit
    pub id: u64,
    /// Hit point in world space
    pub point: Vec3,
}

/// Calls the physics layer makes into the native rigid-body engine
///
/// All calls are synchronous. Id pair arrays are flat: element `2i` collides
/// with element `2i + 1`. The id `0` means "no entity". Gravity arrives already
/// converted to the engine's axis convention.
pub trait NativeEngine {
    /// Create a simulation world
    fn world_create(&mut self) -> NativeHandle;

    /// Destroy a world and every object still inside it
    fn world_delete(&mut self, world: NativeHandle);

    /// Advance the simulation and return the colliding body id pairs
    fn world_step(&mut self, world: NativeHandle, elapsed: Duration) -> Vec<u64>;

    /// Ghost/body id pairs overlapping after the last step
    fn world_ghost_collision_pairs(&mut self, world: NativeHandle) -> Vec<u64>;

    /// Closest hit along the segment, with the hit point
    fn world_raycast(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> NativeRayHit;

    /// Closest hit along the segment, id only
    fn world_raycast_simple(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> u64;

    /// Set the world gravity
    fn world_set_gravity(&mut self, world: NativeHandle, x: f32, y: f32, z: f32);

    /// Create a box shape from its full width, height and depth
    fn shape_create_box(&mut self, width: f32, height: f32, depth: f32) -> NativeHandle;

    /// Create a sphere shape
    fn shape_create_sphere(&mut self, radius: f32) -> NativeHandle;

    /// Create a plane shape
    fn shape_create_plane(&mut self, width: f32, depth: f32) -> NativeHandle;

    /// Deserialize a triangle mesh shape from a file
    fn shape_from_mesh_file(&mut self, world: NativeHandle, path: &Path) -> NativeHandle;

    /// Create an immovable body
    fn body_create_static(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        direction: Vec3,
    ) -> NativeHandle;

    /// Create a zero-mass, externally driven body
    fn body_create_kinematic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle;

    /// Create a mass-bearing body subject to force integration
    fn body_create_dynamic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        mass: f32,
    ) -> NativeHandle;

    /// Create a collision-only ghost object
    fn body_create_ghost(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle;

    /// Current body position
    fn body_position(&mut self, body: NativeHandle) -> Vec3;

    /// Current body direction
    fn body_direction(&mut self, body: NativeHandle) -> Vec3;

    /// Move a body
    fn body_set_position(&mut self, body: NativeHandle, position: Vec3);

    /// Point a body in a direction
    fn body_set_direction(&mut self, body: NativeHandle, direction: Vec3);

    /// Rotate a body
    fn body_set_orientation(&mut self, body: NativeHandle, orientation: Quat);

    /// Activate or deactivate a body in the simulation
    fn body_set_activate(&mut self, body: NativeHandle, active: bool);

    /// Scale a body's collision geometry
    fn body_scale(&mut self, body: NativeHandle, x: f32, y: f32, z: f32);

    /// Remove a body from its world and destroy it
    fn body_delete(&mut self, body: NativeHandle, world: NativeHandle);

    /// Current ghost position
    fn ghost_position(&mut self, ghost: NativeHandle) -> Vec3;

    /// Move a ghost
    fn ghost_set_position(&mut self, ghost: NativeHandle, position: Vec3);

    /// Remove a ghost from its world and destroy it
    fn ghost_delete(&mut self, ghost: NativeHandle, world: NativeHandle);
}
