//! Call tracing decorator for native engines
//!
//! [`TracingEngine`] forwards every call to the wrapped engine, logs it at
//! `trace` level and appends its name to a shared [`CallLog`]. Hosts use it to
//! watch native traffic; tests use it to assert how many calls were made.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use super::{NativeEngine, NativeHandle, NativeRayHit};
use crate::foundation::math::{Quat, Vec3};

/// Shared, ordered record of native call names
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<&'static str>>>,
}

impl CallLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }

    /// Number of recorded calls with the given name
    pub fn count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| **call == name).count()
    }

    /// Total number of recorded calls
    pub fn total(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Copy of the recorded call names, oldest first
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    /// Forget every recorded call
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// Engine decorator recording every call
#[derive(Debug)]
pub struct TracingEngine<E> {
    inner: E,
    log: CallLog,
}

impl<E: NativeEngine> TracingEngine<E> {
    /// Wrap `inner` with a fresh call log
    pub fn new(inner: E) -> Self {
        Self::with_log(inner, CallLog::new())
    }

    /// Wrap `inner`, recording into an existing log
    pub fn with_log(inner: E, log: CallLog) -> Self {
        Self { inner, log }
    }

    /// Handle to the shared call log
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    /// Wrapped engine
    pub fn inner(&self) -> &E {
        &self.inner
    }

    fn enter(&self, name: &'static str) {
        log::trace!("native call: {}", name);
        self.log.record(name);
    }
}

impl<E: NativeEngine> NativeEngine for TracingEngine<E> {
    fn world_create(&mut self) -> NativeHandle {
        self.enter("world_create");
        self.inner.world_create()
    }

    fn world_delete(&mut self, world: NativeHandle) {
        self.enter("world_delete");
        self.inner.world_delete(world);
    }

    fn world_step(&mut self, world: NativeHandle, elapsed: Duration) -> Vec<u64> {
        self.enter("world_step");
        self.inner.world_step(world, elapsed)
    }

    fn world_ghost_collision_pairs(&mut self, world: NativeHandle) -> Vec<u64> {
        self.enter("world_ghost_collision_pairs");
        self.inner.world_ghost_collision_pairs(world)
    }

    fn world_raycast(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> NativeRayHit {
        self.enter("world_raycast");
        self.inner.world_raycast(world, origin, destination)
    }

    fn world_raycast_simple(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> u64 {
        self.enter("world_raycast_simple");
        self.inner.world_raycast_simple(world, origin, destination)
    }

    fn world_set_gravity(&mut self, world: NativeHandle, x: f32, y: f32, z: f32) {
        self.enter("world_set_gravity");
        self.inner.world_set_gravity(world, x, y, z);
    }

    fn shape_create_box(&mut self, width: f32, height: f32, depth: f32) -> NativeHandle {
        self.enter("shape_create_box");
        self.inner.shape_create_box(width, height, depth)
    }

    fn shape_create_sphere(&mut self, radius: f32) -> NativeHandle {
        self.enter("shape_create_sphere");
        self.inner.shape_create_sphere(radius)
    }

    fn shape_create_plane(&mut self, width: f32, depth: f32) -> NativeHandle {
        self.enter("shape_create_plane");
        self.inner.shape_create_plane(width, depth)
    }

    fn shape_from_mesh_file(&mut self, world: NativeHandle, path: &Path) -> NativeHandle {
        self.enter("shape_from_mesh_file");
        self.inner.shape_from_mesh_file(world, path)
    }

    fn body_create_static(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        direction: Vec3,
    ) -> NativeHandle {
        self.enter("body_create_static");
        self.inner.body_create_static(world, shape, id, position, direction)
    }

    fn body_create_kinematic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle {
        self.enter("body_create_kinematic");
        self.inner.body_create_kinematic(world, shape, id, position)
    }

    fn body_create_dynamic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        mass: f32,
    ) -> NativeHandle {
        self.enter("body_create_dynamic");
        self.inner.body_create_dynamic(world, shape, id, position, mass)
    }

    fn body_create_ghost(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle {
        self.enter("body_create_ghost");
        self.inner.body_create_ghost(world, shape, id, position)
    }

    fn body_position(&mut self, body: NativeHandle) -> Vec3 {
        self.enter("body_position");
        self.inner.body_position(body)
    }

    fn body_direction(&mut self, body: NativeHandle) -> Vec3 {
        self.enter("body_direction");
        self.inner.body_direction(body)
    }

    fn body_set_position(&mut self, body: NativeHandle, position: Vec3) {
        self.enter("body_set_position");
        self.inner.body_set_position(body, position);
    }

    fn body_set_direction(&mut self, body: NativeHandle, direction: Vec3) {
        self.enter("body_set_direction");
        self.inner.body_set_direction(body, direction);
    }

    fn body_set_orientation(&mut self, body: NativeHandle, orientation: Quat) {
        self.enter("body_set_orientation");
        self.inner.body_set_orientation(body, orientation);
    }

    fn body_set_activate(&mut self, body: NativeHandle, active: bool) {
        self.enter("body_set_activate");
        self.inner.body_set_activate(body, active);
    }

    fn body_scale(&mut self, body: NativeHandle, x: f32, y: f32, z: f32) {
        self.enter("body_scale");
        self.inner.body_scale(body, x, y, z);
    }

    fn body_delete(&mut self, body: NativeHandle, world: NativeHandle) {
        self.enter("body_delete");
        self.inner.body_delete(body, world);
    }

    fn ghost_position(&mut self, ghost: NativeHandle) -> Vec3 {
        self.enter("ghost_position");
        self.inner.ghost_position(ghost)
    }

    fn ghost_set_position(&mut self, ghost: NativeHandle, position: Vec3) {
        self.enter("ghost_set_position");
        self.inner.ghost_set_position(ghost, position);
    }

    fn ghost_delete(&mut self, ghost: NativeHandle, world: NativeHandle) {
        self.enter("ghost_delete");
        self.inner.ghost_delete(ghost, world);
    }
}
