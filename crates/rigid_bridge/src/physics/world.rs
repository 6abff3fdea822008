//! Physics world
//!
//! A [`World`] owns one native simulation world, the shape cache shared by
//! every object built in it, and the two collision channels (body/body and
//! ghost/body) that turn per-step overlap reports into enter/exit events.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::config::WorldConfig;
use crate::error::{PhysicsError, Result};
use crate::foundation::math::{self, Vec3};
use crate::foundation::time::StepTimer;
use crate::native::{NativeEngine, NativeHandle};
use crate::physics::builder::ObjectBuilder;
use crate::physics::collision_system::{
    CollisionChannel, CollisionListener, CollisionSnapshot,
};
use crate::physics::entity::EntityId;
use crate::physics::shape::{Shape, ShapeHandle};
use crate::physics::shape_cache::ShapeCache;

/// Lifecycle of a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldState {
    /// Created, never stepped
    Created,
    /// Stepped at least once
    Active,
    /// Native world released
    Deleted,
}

/// Result of a full raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    /// Id of the closest object hit, [`EntityId::NONE`] on a miss
    pub hit: EntityId,
    /// Hit point in world space
    pub point: Vec3,
}

impl RaycastResult {
    /// Whether the ray hit anything
    pub fn is_hit(&self) -> bool {
        !self.hit.is_none()
    }
}

/// State shared between a world, its builders and its bodies
pub(crate) struct WorldCore {
    handle: NativeHandle,
    native: RefCell<Box<dyn NativeEngine>>,
    shapes: RefCell<ShapeCache>,
    live_ids: RefCell<HashMap<EntityId, usize>>,
    state: Cell<WorldState>,
}

impl WorldCore {
    pub(crate) fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    pub(crate) fn state(&self) -> WorldState {
        self.state.get()
    }

    pub(crate) fn is_deleted(&self) -> bool {
        self.state.get() == WorldState::Deleted
    }

    pub(crate) fn ensure_alive(&self) -> Result<()> {
        if self.is_deleted() {
            Err(PhysicsError::WorldDeleted)
        } else {
            Ok(())
        }
    }

    /// Run `f` against the engine; the borrow ends when `f` returns
    pub(crate) fn with_native<R>(&self, f: impl FnOnce(&mut dyn NativeEngine) -> R) -> R {
        let mut native = self.native.borrow_mut();
        f(&mut **native)
    }

    pub(crate) fn resolve_shape(&self, shape: &Shape) -> Result<ShapeHandle> {
        self.ensure_alive()?;
        let mut native = self.native.borrow_mut();
        self.shapes.borrow_mut().get_shape(shape, &mut **native, self.handle)
    }

    pub(crate) fn register(&self, id: EntityId) {
        *self.live_ids.borrow_mut().entry(id).or_insert(0) += 1;
    }

    pub(crate) fn unregister(&self, id: EntityId) {
        let mut live_ids = self.live_ids.borrow_mut();
        if let Some(count) = live_ids.get_mut(&id) {
            *count -= 1;
            if *count == 0 {
                live_ids.remove(&id);
            }
        }
    }

    pub(crate) fn is_live(&self, id: EntityId) -> bool {
        self.live_ids.borrow().contains_key(&id)
    }

    fn live_count(&self) -> usize {
        self.live_ids.borrow().values().sum()
    }

    fn advance(&self) {
        if self.state.get() == WorldState::Created {
            self.state.set(WorldState::Active);
        }
    }

    fn release(&self) {
        if self.is_deleted() {
            return;
        }
        self.state.set(WorldState::Deleted);
        self.with_native(|native| native.world_delete(self.handle));
        log::debug!(
            "Released physics world {:?} ({} objects still held)",
            self.handle,
            self.live_count()
        );
    }
}

/// A native physics world and its collision event channels
pub struct World {
    core: Rc<WorldCore>,
    timer: StepTimer,
    gravity: Vec3,
    bodies: CollisionChannel,
    ghosts: CollisionChannel,
}

impl World {
    /// Create a world with default settings
    pub fn new(engine: impl NativeEngine + 'static) -> Self {
        Self::with_config(engine, &WorldConfig::default())
    }

    /// Create a world and apply `config`
    pub fn with_config(engine: impl NativeEngine + 'static, config: &WorldConfig) -> Self {
        let mut native: Box<dyn NativeEngine> = Box::new(engine);
        let handle = native.world_create();
        log::debug!("Created physics world {:?}", handle);

        let shapes = match &config.mesh_directory {
            Some(directory) => ShapeCache::with_mesh_directory(directory),
            None => ShapeCache::new(),
        };
        let timer = match config.max_step() {
            Some(max_step) => StepTimer::new().with_max_step(max_step),
            None => StepTimer::new(),
        };

        let mut world = Self {
            core: Rc::new(WorldCore {
                handle,
                native: RefCell::new(native),
                shapes: RefCell::new(shapes),
                live_ids: RefCell::new(HashMap::new()),
                state: Cell::new(WorldState::Created),
            }),
            timer,
            gravity: Vec3::zeros(),
            bodies: CollisionChannel::new("body"),
            ghosts: CollisionChannel::new("ghost"),
        };
        if let Some(gravity) = config.gravity_vector() {
            world.set_gravity(gravity.x, gravity.y, gravity.z);
        }
        world
    }

    /// Native world handle
    pub fn native_handle(&self) -> NativeHandle {
        self.core.native_handle()
    }

    /// Lifecycle state
    pub fn state(&self) -> WorldState {
        self.core.state()
    }

    /// Start building an object in this world
    pub fn create_object(&self) -> ObjectBuilder {
        ObjectBuilder::new(Rc::clone(&self.core))
    }

    /// Native shape for a descriptor, created on first request
    pub fn shape(&self, shape: &Shape) -> Result<ShapeHandle> {
        self.core.resolve_shape(shape)
    }

    /// Number of distinct native shapes created in this world
    pub fn shape_count(&self) -> usize {
        self.core.shapes.borrow().len()
    }

    /// Register a listener on the body/body channel
    pub fn add_collision_listener(&mut self, listener: impl CollisionListener + 'static) {
        self.bodies.add_listener(Box::new(listener));
    }

    /// Register a listener on the ghost/body channel
    pub fn add_ghost_collision_listener(&mut self, listener: impl CollisionListener + 'static) {
        self.ghosts.add_listener(Box::new(listener));
    }

    /// Body pairs colliding after the last step
    pub fn current_collisions(&self) -> &CollisionSnapshot {
        self.bodies.snapshot()
    }

    /// Ghost/body pairs overlapping after the last step
    pub fn current_ghost_collisions(&self) -> &CollisionSnapshot {
        self.ghosts.snapshot()
    }

    /// Advance the simulation by the time elapsed since the previous update
    pub fn update(&mut self) -> Result<()> {
        let elapsed = self.timer.tick();
        self.step(elapsed)
    }

    /// Advance the simulation by `elapsed` and dispatch collision events
    ///
    /// Listeners run after the engine has answered, so they may freely move,
    /// build or delete objects of this world.
    pub fn step(&mut self, elapsed: Duration) -> Result<()> {
        self.core.ensure_alive()?;
        let handle = self.core.native_handle();

        let raw_bodies = self.core.with_native(|native| native.world_step(handle, elapsed));
        self.core.advance();
        let bodies = CollisionSnapshot::from_raw(&raw_bodies, self.bodies.name(), |id| {
            self.core.is_live(id)
        });
        self.bodies.apply(bodies);

        let raw_ghosts = self.core.with_native(|native| native.world_ghost_collision_pairs(handle));
        let ghosts = CollisionSnapshot::from_raw(&raw_ghosts, self.ghosts.name(), |id| {
            self.core.is_live(id)
        });
        self.ghosts.apply(ghosts);
        Ok(())
    }

    /// Closest object on the segment from `origin` to `destination`, with the hit point
    pub fn raycast(&self, origin: Vec3, destination: Vec3) -> Result<RaycastResult> {
        self.core.ensure_alive()?;
        let handle = self.core.native_handle();
        let hit = self
            .core
            .with_native(|native| native.world_raycast(handle, origin, destination));
        Ok(RaycastResult {
            hit: EntityId::new(hit.id),
            point: hit.point,
        })
    }

    /// Id of the closest object on the segment, [`EntityId::NONE`] on a miss
    pub fn throw_simple_ray(&self, origin: Vec3, destination: Vec3) -> Result<EntityId> {
        self.core.ensure_alive()?;
        let handle = self.core.native_handle();
        let id = self
            .core
            .with_native(|native| native.world_raycast_simple(handle, origin, destination));
        Ok(EntityId::new(id))
    }

    /// Id of the closest object within `distance` of `origin` along `direction`
    ///
    /// The segment ends at `origin + normalize(direction) * distance`, so the
    /// ray always starts at `origin` rather than treating the scaled direction
    /// as an absolute end point. `direction` does not need to be normalized.
    /// A negative distance or a degenerate direction is rejected before the
    /// engine is queried.
    pub fn throw_simple_ray_towards(
        &self,
        origin: Vec3,
        direction: Vec3,
        distance: f32,
    ) -> Result<EntityId> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "Distance must be a finite non-negative value, got {}",
                distance
            )));
        }
        let offset = math::normalize_and_scale(&direction, distance).ok_or_else(|| {
            PhysicsError::InvalidArgument(format!(
                "Direction must be a finite non-zero vector, got {:?}",
                direction
            ))
        })?;
        self.throw_simple_ray(origin, origin + offset)
    }

    /// Set the gravity, +Y being up
    pub fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
        self.gravity = Vec3::new(x, y, z);
        if self.core.is_deleted() {
            return;
        }
        let native_gravity = math::flip_y(&self.gravity);
        let handle = self.core.native_handle();
        self.core.with_native(|native| {
            native.world_set_gravity(handle, native_gravity.x, native_gravity.y, native_gravity.z);
        });
    }

    /// Gravity exactly as last set
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Release the native world
    ///
    /// Objects still held keep answering their cached values where they have
    /// some and fail with [`PhysicsError::WorldDeleted`] otherwise.
    pub fn delete(self) {
        self.core.release();
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.core.release();
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("handle", &self.core.native_handle())
            .field("state", &self.core.state())
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies)
            .field("ghosts", &self.ghosts)
            .finish()
    }
}
