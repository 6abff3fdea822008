//! Fluent construction of physics objects

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::{PhysicsError, Result};
use crate::foundation::math::{Vec3, BASE_DIRECTION, ORIGIN};
use crate::physics::body::BodyHandle;
use crate::physics::entity::EntityId;
use crate::physics::shape::{Shape, ShapeHandle};
use crate::physics::world::WorldCore;

/// Accumulates the description of a physics object, then builds it
///
/// Obtained from `World::create_object`. The builder is not consumed by a
/// build: every `build_*` call creates a new, independent native object from
/// the current settings, so one builder can stamp out many similar objects.
///
/// ```no_run
/// # use rigid_bridge::prelude::*;
/// # fn demo(world: &World) -> rigid_bridge::Result<()> {
/// let crate_box = world
///     .create_object()
///     .with_id(42)
///     .with_box(1.0, 1.0, 1.0)
///     .at_position(Vec3::new(0.0, 5.0, 0.0))
///     .with_mass(2.0)
///     .build_dynamic()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ObjectBuilder {
    world: Rc<WorldCore>,
    id: Option<EntityId>,
    shape: Option<Shape>,
    position: Vec3,
    direction: Vec3,
    mass: f32,
}

impl ObjectBuilder {
    pub(crate) fn new(world: Rc<WorldCore>) -> Self {
        Self {
            world,
            id: None,
            shape: None,
            position: ORIGIN,
            direction: BASE_DIRECTION,
            mass: 1.0,
        }
    }

    /// Entity id the object reports in collisions and ray hits
    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Use a shape descriptor, replacing any previous one
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Box of the given full width, height and depth
    pub fn with_box(self, width: f32, height: f32, depth: f32) -> Self {
        self.with_shape(Shape::cuboid(width, height, depth))
    }

    /// Sphere of the given radius
    pub fn with_sphere(self, radius: f32) -> Self {
        self.with_shape(Shape::sphere(radius))
    }

    /// Plane of the given width and depth
    pub fn with_plane(self, width: f32, depth: f32) -> Self {
        self.with_shape(Shape::plane(width, depth))
    }

    /// Triangle mesh loaded from a file
    pub fn with_mesh(self, path: impl Into<PathBuf>) -> Self {
        self.with_shape(Shape::mesh(path))
    }

    /// Initial position, origin by default
    pub fn at_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Initial direction, `BASE_DIRECTION` by default
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    /// Mass of a dynamic body, `1.0` by default
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    fn required(&self) -> Result<(EntityId, &Shape)> {
        let id = self.id.ok_or(PhysicsError::IdNotProvided)?;
        let shape = self.shape.as_ref().ok_or(PhysicsError::ShapeNotProvided)?;
        Ok((id, shape))
    }

    fn resolve(&self, shape: &Shape) -> Result<ShapeHandle> {
        self.world.resolve_shape(shape)
    }

    /// Build an immovable body
    pub fn build_static(&self) -> Result<BodyHandle> {
        let (id, shape) = self.required()?;
        let shape = self.resolve(shape)?;
        let world = self.world.native_handle();
        let (position, direction) = (self.position, self.direction);
        let pointer = self.world.with_native(|native| {
            native.body_create_static(world, shape.native(), id.value(), position, direction)
        });
        log::debug!("Built static object {} at {:?}", id, position);
        Ok(BodyHandle::new_static(Rc::clone(&self.world), id, pointer, position, direction))
    }

    /// Build a zero-mass body moved by the caller
    pub fn build_kinematic(&self) -> Result<BodyHandle> {
        let (id, shape) = self.required()?;
        let shape = self.resolve(shape)?;
        let world = self.world.native_handle();
        let position = self.position;
        let pointer = self.world.with_native(|native| {
            native.body_create_kinematic(world, shape.native(), id.value(), position)
        });
        log::debug!("Built kinematic object {} at {:?}", id, position);
        Ok(BodyHandle::new_kinematic(Rc::clone(&self.world), id, pointer))
    }

    /// Build a body moved by the simulation
    pub fn build_dynamic(&self) -> Result<BodyHandle> {
        let (id, shape) = self.required()?;
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "Mass must be a finite positive value, got {}",
                self.mass
            )));
        }
        let shape = self.resolve(shape)?;
        let world = self.world.native_handle();
        let (position, mass) = (self.position, self.mass);
        let pointer = self.world.with_native(|native| {
            native.body_create_dynamic(world, shape.native(), id.value(), position, mass)
        });
        log::debug!("Built dynamic object {} at {:?} with mass {}", id, position, mass);
        Ok(BodyHandle::new_dynamic(Rc::clone(&self.world), id, pointer, mass))
    }

    /// Build a collision-only ghost object
    pub fn build_ghost(&self) -> Result<BodyHandle> {
        let (id, shape) = self.required()?;
        let shape = self.resolve(shape)?;
        let world = self.world.native_handle();
        let position = self.position;
        let pointer = self.world.with_native(|native| {
            native.body_create_ghost(world, shape.native(), id.value(), position)
        });
        log::debug!("Built ghost object {} at {:?}", id, position);
        Ok(BodyHandle::new_ghost(Rc::clone(&self.world), id, pointer))
    }
}

impl fmt::Debug for ObjectBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBuilder")
            .field("id", &self.id)
            .field("shape", &self.shape)
            .field("position", &self.position)
            .field("direction", &self.direction)
            .field("mass", &self.mass)
            .finish()
    }
}
