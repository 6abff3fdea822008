//! Pure-Rust reference engine
//!
//! [`HeadlessEngine`] implements the native contract without any native
//! library, for tests and for hosts that only need overlap events. It is a
//! small collaborator:
//!
//! - every collision volume is an axis-aligned box derived from the shape
//!   (box half extents, sphere radius, plane as a thin slab, mesh as a unit box)
//!   and the body scale; orientation is tracked but ignored by queries
//! - dynamic, active bodies fall under the world gravity with explicit Euler
//! - all non-static body pairs that overlap are reported, plus ghost/body overlaps
//! - rays hit bodies only, never ghosts

use std::path::Path;
use std::time::Duration;

use slotmap::{new_key_type, Key, KeyData, SlotMap};

use super::{NativeEngine, NativeHandle, NativeRayHit};
use crate::foundation::math::{Quat, Vec3, BASE_DIRECTION};
use crate::physics::collision::{Aabb, Ray};

new_key_type! {
    struct WorldKey;
    struct ShapeKey;
    struct ObjectKey;
}

/// Half thickness of the slab standing in for a plane
const PLANE_HALF_THICKNESS: f32 = 0.01;

/// Half extents of the box standing in for a mesh
const MESH_HALF_EXTENT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Static,
    Kinematic,
    Dynamic { mass: f32 },
    Ghost,
}

#[derive(Debug)]
struct WorldEntry {
    gravity: Vec3,
    ghost_pairs: Vec<u64>,
}

#[derive(Debug)]
struct ShapeEntry {
    half_extents: Vec3,
}

#[derive(Debug)]
struct ObjectEntry {
    world: WorldKey,
    shape: ShapeKey,
    id: u64,
    motion: Motion,
    position: Vec3,
    direction: Vec3,
    orientation: Quat,
    scale: Vec3,
    velocity: Vec3,
    active: bool,
}

impl ObjectEntry {
    fn new(world: WorldKey, shape: ShapeKey, id: u64, motion: Motion, position: Vec3) -> Self {
        Self {
            world,
            shape,
            id,
            motion,
            position,
            direction: BASE_DIRECTION,
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            velocity: Vec3::zeros(),
            active: true,
        }
    }

    fn is_ghost(&self) -> bool {
        self.motion == Motion::Ghost
    }
}

fn to_handle<K: Key>(key: K) -> NativeHandle {
    NativeHandle::from_raw(key.data().as_ffi())
}

fn to_key<K: Key + From<KeyData>>(handle: NativeHandle) -> Option<K> {
    if handle.is_null() {
        None
    } else {
        Some(KeyData::from_ffi(handle.raw()).into())
    }
}

/// Reference engine keeping every native object in slot maps
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    worlds: SlotMap<WorldKey, WorldEntry>,
    shapes: SlotMap<ShapeKey, ShapeEntry>,
    objects: SlotMap<ObjectKey, ObjectEntry>,
}

impl HeadlessEngine {
    /// Create an engine with no world
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live worlds
    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    /// Number of live bodies and ghosts across all worlds
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Gravity currently applied by a world, in engine convention
    pub fn world_gravity(&self, world: NativeHandle) -> Option<Vec3> {
        self.world(world).map(|entry| entry.gravity)
    }

    /// Whether a body or ghost is active in the simulation
    pub fn is_active(&self, object: NativeHandle) -> Option<bool> {
        self.object(object).map(|entry| entry.active)
    }

    /// Current scale of a body
    pub fn object_scale(&self, object: NativeHandle) -> Option<Vec3> {
        self.object(object).map(|entry| entry.scale)
    }

    fn world(&self, handle: NativeHandle) -> Option<&WorldEntry> {
        to_key::<WorldKey>(handle).and_then(|key| self.worlds.get(key))
    }

    fn object(&self, handle: NativeHandle) -> Option<&ObjectEntry> {
        to_key::<ObjectKey>(handle).and_then(|key| self.objects.get(key))
    }

    fn object_mut(&mut self, handle: NativeHandle) -> Option<&mut ObjectEntry> {
        let entry = to_key::<ObjectKey>(handle).and_then(|key| self.objects.get_mut(key));
        if entry.is_none() {
            log::warn!("Headless engine: unknown object handle {:?}", handle);
        }
        entry
    }

    fn add_shape(&mut self, half_extents: Vec3) -> NativeHandle {
        to_handle(self.shapes.insert(ShapeEntry { half_extents }))
    }

    fn add_object(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        motion: Motion,
        position: Vec3,
    ) -> NativeHandle {
        let world_key = match to_key::<WorldKey>(world).filter(|key| self.worlds.contains_key(*key)) {
            Some(key) => key,
            None => {
                log::warn!("Headless engine: unknown world handle {:?}", world);
                return NativeHandle::NULL;
            }
        };
        let shape_key = match to_key::<ShapeKey>(shape).filter(|key| self.shapes.contains_key(*key)) {
            Some(key) => key,
            None => {
                log::warn!("Headless engine: unknown shape handle {:?}", shape);
                return NativeHandle::NULL;
            }
        };
        let entry = ObjectEntry::new(world_key, shape_key, id, motion, position);
        to_handle(self.objects.insert(entry))
    }

    fn bounds(&self, object: &ObjectEntry) -> Aabb {
        let half_extents = self
            .shapes
            .get(object.shape)
            .map_or_else(Vec3::zeros, |shape| shape.half_extents);
        Aabb::from_center_extents(object.position, half_extents.component_mul(&object.scale))
    }

    fn integrate(&mut self, world: WorldKey, gravity: Vec3, dt: f32) {
        for object in self.objects.values_mut() {
            if object.world != world || !object.active {
                continue;
            }
            if let Motion::Dynamic { mass } = object.motion {
                if mass > 0.0 {
                    object.velocity += gravity * dt;
                    object.position += object.velocity * dt;
                }
            }
        }
    }

    fn overlapping_pairs(&self, world: WorldKey) -> (Vec<u64>, Vec<u64>) {
        let members: Vec<(&ObjectEntry, Aabb)> = self
            .objects
            .values()
            .filter(|object| object.world == world)
            .map(|object| (object, self.bounds(object)))
            .collect();

        let mut body_pairs = Vec::new();
        let mut ghost_pairs = Vec::new();

        for (i, (a, bounds_a)) in members.iter().enumerate() {
            for (b, bounds_b) in &members[i + 1..] {
                if !bounds_a.intersects(bounds_b) {
                    continue;
                }
                match (a.is_ghost(), b.is_ghost()) {
                    (false, false) => {
                        if a.motion == Motion::Static && b.motion == Motion::Static {
                            continue;
                        }
                        body_pairs.extend([a.id, b.id]);
                    }
                    (true, false) => ghost_pairs.extend([a.id, b.id]),
                    (false, true) => ghost_pairs.extend([b.id, a.id]),
                    (true, true) => {}
                }
            }
        }
        (body_pairs, ghost_pairs)
    }

    fn closest_hit(&self, world: NativeHandle, origin: Vec3, destination: Vec3) -> NativeRayHit {
        let miss = NativeRayHit { id: 0, point: destination };
        let Some(world_key) = to_key::<WorldKey>(world) else {
            return miss;
        };
        let Some(ray) = Ray::between(origin, destination) else {
            return miss;
        };

        self.objects
            .values()
            .filter(|object| object.world == world_key && !object.is_ghost())
            .filter_map(|object| self.bounds(object).intersect_ray(&ray).map(|t| (t, object.id)))
            .min_by(|(t1, _), (t2, _)| t1.total_cmp(t2))
            .map_or(miss, |(t, id)| NativeRayHit { id, point: ray.point_at(t) })
    }
}

impl NativeEngine for HeadlessEngine {
    fn world_create(&mut self) -> NativeHandle {
        to_handle(self.worlds.insert(WorldEntry {
            gravity: Vec3::zeros(),
            ghost_pairs: Vec::new(),
        }))
    }

    fn world_delete(&mut self, world: NativeHandle) {
        if let Some(key) = to_key::<WorldKey>(world) {
            if self.worlds.remove(key).is_some() {
                self.objects.retain(|_, object| object.world != key);
            }
        }
    }

    fn world_step(&mut self, world: NativeHandle, elapsed: Duration) -> Vec<u64> {
        let Some(key) = to_key::<WorldKey>(world) else {
            return Vec::new();
        };
        let Some(gravity) = self.worlds.get(key).map(|entry| entry.gravity) else {
            log::warn!("Headless engine: stepping unknown world {:?}", world);
            return Vec::new();
        };

        self.integrate(key, gravity, elapsed.as_secs_f32());
        let (body_pairs, ghost_pairs) = self.overlapping_pairs(key);
        if let Some(entry) = self.worlds.get_mut(key) {
            entry.ghost_pairs = ghost_pairs;
        }
        body_pairs
    }

    fn world_ghost_collision_pairs(&mut self, world: NativeHandle) -> Vec<u64> {
        self.world(world)
            .map(|entry| entry.ghost_pairs.clone())
            .unwrap_or_default()
    }

    fn world_raycast(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> NativeRayHit {
        self.closest_hit(world, origin, destination)
    }

    fn world_raycast_simple(&mut self, world: NativeHandle, origin: Vec3, destination: Vec3) -> u64 {
        self.closest_hit(world, origin, destination).id
    }

    fn world_set_gravity(&mut self, world: NativeHandle, x: f32, y: f32, z: f32) {
        if let Some(entry) = to_key::<WorldKey>(world).and_then(|key| self.worlds.get_mut(key)) {
            entry.gravity = Vec3::new(x, y, z);
        }
    }

    fn shape_create_box(&mut self, width: f32, height: f32, depth: f32) -> NativeHandle {
        self.add_shape(Vec3::new(width, height, depth) * 0.5)
    }

    fn shape_create_sphere(&mut self, radius: f32) -> NativeHandle {
        self.add_shape(Vec3::new(radius, radius, radius))
    }

    fn shape_create_plane(&mut self, width: f32, depth: f32) -> NativeHandle {
        self.add_shape(Vec3::new(width * 0.5, PLANE_HALF_THICKNESS, depth * 0.5))
    }

    fn shape_from_mesh_file(&mut self, _world: NativeHandle, path: &Path) -> NativeHandle {
        log::debug!(
            "Headless engine: approximating mesh {} with a unit box",
            path.display()
        );
        self.add_shape(Vec3::new(MESH_HALF_EXTENT, MESH_HALF_EXTENT, MESH_HALF_EXTENT))
    }

    fn body_create_static(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        direction: Vec3,
    ) -> NativeHandle {
        let handle = self.add_object(world, shape, id, Motion::Static, position);
        self.body_set_direction(handle, direction);
        handle
    }

    fn body_create_kinematic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle {
        self.add_object(world, shape, id, Motion::Kinematic, position)
    }

    fn body_create_dynamic(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
        mass: f32,
    ) -> NativeHandle {
        self.add_object(world, shape, id, Motion::Dynamic { mass }, position)
    }

    fn body_create_ghost(
        &mut self,
        world: NativeHandle,
        shape: NativeHandle,
        id: u64,
        position: Vec3,
    ) -> NativeHandle {
        self.add_object(world, shape, id, Motion::Ghost, position)
    }

    fn body_position(&mut self, body: NativeHandle) -> Vec3 {
        self.object_mut(body).map_or_else(Vec3::zeros, |object| object.position)
    }

    fn body_direction(&mut self, body: NativeHandle) -> Vec3 {
        self.object_mut(body).map_or(BASE_DIRECTION, |object| object.direction)
    }

    fn body_set_position(&mut self, body: NativeHandle, position: Vec3) {
        if let Some(object) = self.object_mut(body) {
            object.position = position;
            object.velocity = Vec3::zeros();
        }
    }

    fn body_set_direction(&mut self, body: NativeHandle, direction: Vec3) {
        if let Some(object) = self.object_mut(body) {
            object.direction = direction;
            if let Some(rotation) = Quat::rotation_between(&BASE_DIRECTION, &direction) {
                object.orientation = rotation;
            }
        }
    }

    fn body_set_orientation(&mut self, body: NativeHandle, orientation: Quat) {
        if let Some(object) = self.object_mut(body) {
            object.orientation = orientation;
            object.direction = orientation * BASE_DIRECTION;
        }
    }

    fn body_set_activate(&mut self, body: NativeHandle, active: bool) {
        if let Some(object) = self.object_mut(body) {
            object.active = active;
        }
    }

    fn body_scale(&mut self, body: NativeHandle, x: f32, y: f32, z: f32) {
        if let Some(object) = self.object_mut(body) {
            object.scale = Vec3::new(x, y, z);
        }
    }

    fn body_delete(&mut self, body: NativeHandle, _world: NativeHandle) {
        if let Some(key) = to_key::<ObjectKey>(body) {
            self.objects.remove(key);
        }
    }

    fn ghost_position(&mut self, ghost: NativeHandle) -> Vec3 {
        self.body_position(ghost)
    }

    fn ghost_set_position(&mut self, ghost: NativeHandle, position: Vec3) {
        self.body_set_position(ghost, position);
    }

    fn ghost_delete(&mut self, ghost: NativeHandle, world: NativeHandle) {
        self.body_delete(ghost, world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Fixture {
        engine: HeadlessEngine,
        world: NativeHandle,
        cube: NativeHandle,
    }

    fn fixture() -> Fixture {
        let mut engine = HeadlessEngine::new();
        let world = engine.world_create();
        let cube = engine.shape_create_box(2.0, 2.0, 2.0);
        Fixture { engine, world, cube }
    }

    #[test]
    fn test_overlapping_kinematic_bodies_are_reported() {
        let Fixture { mut engine, world, cube } = fixture();
        engine.body_create_kinematic(world, cube, 1, Vec3::zeros());
        engine.body_create_kinematic(world, cube, 2, Vec3::new(1.5, 0.0, 0.0));
        engine.body_create_kinematic(world, cube, 3, Vec3::new(50.0, 0.0, 0.0));

        let pairs = engine.world_step(world, Duration::from_millis(16));
        assert_eq!(pairs, vec![1, 2]);
    }

    #[test]
    fn test_static_pairs_are_not_reported() {
        let Fixture { mut engine, world, cube } = fixture();
        engine.body_create_static(world, cube, 1, Vec3::zeros(), BASE_DIRECTION);
        engine.body_create_static(world, cube, 2, Vec3::zeros(), BASE_DIRECTION);

        assert!(engine.world_step(world, Duration::ZERO).is_empty());
    }

    #[test]
    fn test_ghost_overlaps_use_ghost_channel() {
        let Fixture { mut engine, world, cube } = fixture();
        engine.body_create_ghost(world, cube, 5, Vec3::zeros());
        engine.body_create_kinematic(world, cube, 1, Vec3::new(0.5, 0.0, 0.0));

        let body_pairs = engine.world_step(world, Duration::ZERO);
        assert!(body_pairs.is_empty());
        assert_eq!(engine.world_ghost_collision_pairs(world), vec![5, 1]);
    }

    #[test]
    fn test_dynamic_body_falls_under_gravity() {
        let Fixture { mut engine, world, cube } = fixture();
        engine.world_set_gravity(world, 0.0, -10.0, 0.0);
        let body = engine.body_create_dynamic(world, cube, 1, Vec3::zeros(), 1.0);

        engine.world_step(world, Duration::from_secs(1));
        assert_relative_eq!(engine.body_position(body), Vec3::new(0.0, -10.0, 0.0), epsilon = 1e-4);

        engine.body_set_activate(body, false);
        engine.world_step(world, Duration::from_secs(1));
        assert_relative_eq!(engine.body_position(body), Vec3::new(0.0, -10.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_raycast_reports_closest_body() {
        let Fixture { mut engine, world, cube } = fixture();
        engine.body_create_kinematic(world, cube, 1, Vec3::new(0.0, 0.0, 10.0));
        engine.body_create_kinematic(world, cube, 2, Vec3::new(0.0, 0.0, 5.0));
        engine.body_create_ghost(world, cube, 3, Vec3::new(0.0, 0.0, 2.0));

        let hit = engine.world_raycast(world, Vec3::zeros(), Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(hit.id, 2);
        assert_relative_eq!(hit.point, Vec3::new(0.0, 0.0, 4.0), epsilon = 1e-5);

        let miss = engine.world_raycast_simple(world, Vec3::zeros(), Vec3::new(0.0, 20.0, 0.0));
        assert_eq!(miss, 0);
    }

    #[test]
    fn test_world_delete_removes_objects() {
        let Fixture { mut engine, world, cube } = fixture();
        engine.body_create_kinematic(world, cube, 1, Vec3::zeros());
        engine.body_create_ghost(world, cube, 2, Vec3::zeros());
        assert_eq!(engine.object_count(), 2);

        engine.world_delete(world);
        assert_eq!(engine.object_count(), 0);
        assert_eq!(engine.world_count(), 0);
    }

    #[test]
    fn test_scale_grows_bounds() {
        let Fixture { mut engine, world, cube } = fixture();
        let body = engine.body_create_kinematic(world, cube, 1, Vec3::zeros());
        engine.body_create_kinematic(world, cube, 2, Vec3::new(3.0, 0.0, 0.0));
        assert!(engine.world_step(world, Duration::ZERO).is_empty());

        engine.body_scale(body, 3.0, 1.0, 1.0);
        assert_eq!(engine.object_scale(body), Some(Vec3::new(3.0, 1.0, 1.0)));
        assert_eq!(engine.world_step(world, Duration::ZERO), vec![1, 2]);
    }

    #[test]
    fn test_scale_replaces_previous_scale() {
        let Fixture { mut engine, world, cube } = fixture();
        let body = engine.body_create_kinematic(world, cube, 1, Vec3::zeros());

        engine.body_scale(body, 2.0, 2.0, 2.0);
        engine.body_scale(body, 2.0, 2.0, 2.0);
        assert_eq!(engine.object_scale(body), Some(Vec3::new(2.0, 2.0, 2.0)));

        engine.body_scale(body, 1.0, 1.0, 1.0);
        assert_eq!(engine.object_scale(body), Some(Vec3::new(1.0, 1.0, 1.0)));
    }
}
