//! Shared engine access
//!
//! A [`World`](crate::physics::World) takes ownership of its engine. Wrapping
//! the engine in a [`SharedEngine`] first lets the host keep a second handle
//! to inspect or drive it directly between updates.

use std::cell::{Ref, RefCell, RefMut};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use super::{NativeEngine, NativeHandle, NativeRayHit};
use crate::foundation::math::{Quat, Vec3};

/// Reference-counted engine handle; clones refer to the same engine
#[derive(Debug, Default)]
pub struct SharedEngine<E> {
    inner: Rc<RefCell<E>>,
}

impl<E> Clone for SharedEngine<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: NativeEngine> SharedEngine<E> {
    /// Share `engine`
    pub fn new(engine: E) -> Self {
        Self {
            inner: Rc::new(RefCell::new(engine)),
        }
    }

    /// Borrow the engine
    ///
    /// Panics if called from inside a native call made through this handle.
    pub fn borrow(&self) -> Ref<'_, E> {
        self.inner.borrow()
    }

    /// Borrow the engine mutably
    ///
    /// Panics if called from inside a native call made through this handle.
    pub fn borrow_mut(&self) -> RefMut<'_, E> {
        self.inner.borrow_mut()
    }
}

impl<E: NativeEngine> NativeEngine for SharedEngine<E> {
    fn world_create(&mut self) -> NativeHandle {
        self.inner.borrow_mut().world_create()
    }

    fn world_delete(&mut self, world: NativeHandle) {
        self.inner.borrow_mut().world_delete(world);
    }

    fn world_step(&mut self, world: NativeHandle, elapsed: Duration) -> Vec<u64> {
        self.inner.borrow_mut().world_step(world, elapsed)
    }

    fn world_ghost_collision_pairs(&mut self, world: NativeHandle) -> Vec<u64> {
        self.inner.borrow_mut().world_ghost_collision_pairs(world)
    }

    fn world_raycast(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> NativeRayHit {
        self.inner.borrow_mut().world_raycast(world, origin, destination)
    }

    fn world_raycast_simple(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> u64 {
        self.inner.borrow_mut().world_raycast_simple(world, origin, destination)
    }

    fn world_set_gravity(&mut self, world: NativeHandle, x: f32, y: f32, z: f32) {
        self.inner.borrow_mut().world_set_gravity(world, x, y, z);
    }

    fn shape_create_box(&mut self, width: f32, height: f32, depth: f32) -> NativeHandle {
        self.inner.borrow_mut().shape_create_box(width, height, depth)
    }

    fn shape_create_sphere(&mut self, radius: f32) -> NativeHandle {
        self.inner.borrow_mut().shape_create_sphere(radius)
    }

    fn shape_create_plane(&mut self, width: f32, depth: f32) -> NativeHandle {
        self.inner.borrow_mut().shape_create_plane(width, depth)
    }

    fn shape_from_mesh_file(&mut self, world: NativeHandle, path: &Path) -> NativeHandle {
        self.inner.borrow_mut().shape_from_mesh_file(world, path)
    }

    fn body_create_static(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        direction: Vec3,
    ) -> NativeHandle {
        self.inner
            .borrow_mut()
            .body_create_static(world, shape, id, position, direction)
    }

    fn body_create_kinematic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle {
        self.inner.borrow_mut().body_create_kinematic(world, shape, id, position)
    }

    fn body_create_dynamic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        mass: f32,
    ) -> NativeHandle {
        self.inner
            .borrow_mut()
            .body_create_dynamic(world, shape, id, position, mass)
    }

    fn body_create_ghost(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle {
        self.inner.borrow_mut().body_create_ghost(world, shape, id, position)
    }

    fn body_position(&mut self, body: NativeHandle) -> Vec3 {
        self.inner.borrow_mut().body_position(body)
    }

    fn body_direction(&mut self, body: NativeHandle) -> Vec3 {
        self.inner.borrow_mut().body_direction(body)
    }

    fn body_set_position(&mut self, body: NativeHandle, position: Vec3) {
        self.inner.borrow_mut().body_set_position(body, position);
    }

    fn body_set_direction(&mut self, body: NativeHandle, direction: Vec3) {
        self.inner.borrow_mut().body_set_direction(body, direction);
    }

    fn body_set_orientation(&mut self, body: NativeHandle, orientation: Quat) {
        self.inner.borrow_mut().body_set_orientation(body, orientation);
    }

    fn body_set_activate(&mut self, body: NativeHandle, active: bool) {
        self.inner.borrow_mut().body_set_activate(body, active);
    }

    fn body_scale(&mut self, body: NativeHandle, x: f32, y: f32, z: f32) {
        self.inner.borrow_mut().body_scale(body, x, y, z);
    }

    fn body_delete(&mut self, body: NativeHandle, world: NativeHandle) {
        self.inner.borrow_mut().body_delete(body, world);
    }

    fn ghost_position(&mut self, ghost: NativeHandle) -> Vec3 {
        self.inner.borrow_mut().ghost_position(ghost)
    }

    fn ghost_set_position(&mut self, ghost: NativeHandle, position: Vec3) {
        self.inner.borrow_mut().ghost_set_position(ghost, position);
    }

    fn ghost_delete(&mut self, ghost: NativeHandle, world: NativeHandle) {
        self.inner.borrow_mut().ghost_delete(ghost, world);
    }
}
