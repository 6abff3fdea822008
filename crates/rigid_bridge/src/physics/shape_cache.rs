//! Shape cache for deduplicating native collision shapes
//!
//! Native shapes are created lazily, once per distinct [`Shape`] descriptor,
//! and shared by every body requesting an equal descriptor.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{PhysicsError, Result};
use crate::native::{NativeEngine, NativeHandle};
use crate::physics::shape::{Shape, ShapeHandle};

/// Per-world cache: descriptor -> native shape
#[derive(Debug, Default)]
pub struct ShapeCache {
    shapes: HashMap<Shape, ShapeHandle>,
    mesh_directory: Option<PathBuf>,
}

impl ShapeCache {
    /// Create an empty cache resolving relative mesh paths against the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache resolving relative mesh paths against `directory`
    pub fn with_mesh_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            shapes: HashMap::new(),
            mesh_directory: Some(directory.into()),
        }
    }

    /// Get the native shape for a descriptor, creating it on first request
    ///
    /// A mesh whose file does not exist fails with [`PhysicsError::FileMissing`]
    /// before anything reaches the engine.
    pub fn get_shape(
        &mut self,
        shape: &Shape,
        engine: &mut dyn NativeEngine,
        world: NativeHandle,
    ) -> Result<ShapeHandle> {
        if let Some(handle) = self.shapes.get(shape) {
            return Ok(*handle);
        }

        let native = match shape {
            Shape::Box { width, height, depth } => engine.shape_create_box(*width, *height, *depth),
            Shape::Sphere { radius } => engine.shape_create_sphere(*radius),
            Shape::Plane { width, depth } => engine.shape_create_plane(*width, *depth),
            Shape::Mesh { path } => {
                let file = self.resolve_mesh_path(path)?;
                engine.shape_from_mesh_file(world, &file)
            }
        };

        let handle = ShapeHandle::new(native);
        log::debug!("Created native shape {:?} for {:?}", native, shape);
        self.shapes.insert(shape.clone(), handle);
        Ok(handle)
    }

    /// Whether a native shape already exists for the descriptor
    pub fn contains(&self, shape: &Shape) -> bool {
        self.shapes.contains_key(shape)
    }

    /// Number of distinct native shapes created
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether no shape was created yet
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn resolve_mesh_path(&self, path: &Path) -> Result<PathBuf> {
        let file = match &self.mesh_directory {
            Some(directory) if path.is_relative() => directory.join(path),
            _ => path.to_path_buf(),
        };

        if !file.exists() {
            return Err(PhysicsError::FileMissing(file));
        }
        Ok(file.canonicalize().unwrap_or(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{HeadlessEngine, TracingEngine};

    fn engine() -> (TracingEngine<HeadlessEngine>, NativeHandle) {
        let mut engine = TracingEngine::new(HeadlessEngine::new());
        let world = engine.world_create();
        (engine, world)
    }

    #[test]
    fn test_equal_descriptors_share_handle() {
        let (mut engine, world) = engine();
        let log = engine.call_log();
        let mut cache = ShapeCache::new();

        let first = cache.get_shape(&Shape::cube(5.0), &mut engine, world).unwrap();
        let second = cache.get_shape(&Shape::cuboid(5.0, 5.0, 5.0), &mut engine, world).unwrap();

        assert_eq!(first, second);
        assert_eq!(log.count("shape_create_box"), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_descriptors_get_distinct_handles() {
        let (mut engine, world) = engine();
        let mut cache = ShapeCache::new();

        let cube = cache.get_shape(&Shape::cube(1.0), &mut engine, world).unwrap();
        let sphere = cache.get_shape(&Shape::sphere(1.0), &mut engine, world).unwrap();
        let plane = cache.get_shape(&Shape::plane(1.0, 1.0), &mut engine, world).unwrap();

        assert_ne!(cube, sphere);
        assert_ne!(sphere, plane);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_missing_mesh_fails_before_native_call() {
        let (mut engine, world) = engine();
        let log = engine.call_log();
        let mut cache = ShapeCache::new();

        let result = cache.get_shape(&Shape::mesh("does/not/exist.mesh"), &mut engine, world);

        assert!(matches!(result, Err(PhysicsError::FileMissing(_))));
        assert_eq!(log.count("shape_from_mesh_file"), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_mesh_resolved_against_directory_and_cached_by_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rock.mesh"), b"mesh").unwrap();

        let (mut engine, world) = engine();
        let log = engine.call_log();
        let mut cache = ShapeCache::with_mesh_directory(dir.path());

        let first = cache.get_shape(&Shape::mesh("rock.mesh"), &mut engine, world).unwrap();
        let second = cache.get_shape(&Shape::mesh("rock.mesh"), &mut engine, world).unwrap();

        assert_eq!(first, second);
        assert_eq!(log.count("shape_from_mesh_file"), 1);
        assert!(cache.contains(&Shape::mesh("rock.mesh")));
    }
}
