//! Shape descriptors
//!
//! A [`Shape`] describes collision geometry by value. Two equal descriptors
//! always resolve to the same native shape within a world.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::native::NativeHandle;

/// Geometry requested for a body
///
/// Dimensions are full sizes, not half extents. Float fields compare by value
/// with `-0.0` and `+0.0` treated as equal; meshes compare by path only.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Box of the given width, height and depth
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// Sphere of the given radius
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Flat plane of the given width and depth
    Plane {
        /// Size along X
        width: f32,
        /// Size along Z
        depth: f32,
    },
    /// Triangle mesh deserialized by the native engine from a file
    Mesh {
        /// Path of the serialized mesh
        path: PathBuf,
    },
}

impl Shape {
    /// Box shape
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box { width, height, depth }
    }

    /// Box shape with the same size on every axis
    pub fn cube(size: f32) -> Self {
        Self::cuboid(size, size, size)
    }

    /// Sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Plane shape
    pub fn plane(width: f32, depth: f32) -> Self {
        Self::Plane { width, depth }
    }

    /// Mesh shape
    pub fn mesh(path: impl Into<PathBuf>) -> Self {
        Self::Mesh { path: path.into() }
    }

    /// Mesh path, for mesh shapes
    pub fn mesh_path(&self) -> Option<&Path> {
        match self {
            Self::Mesh { path } => Some(path),
            _ => None,
        }
    }
}

fn float_key(value: f32) -> u32 {
    // -0.0 + 0.0 == +0.0, folding both zeros onto one bit pattern
    (value + 0.0).to_bits()
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Box { width: w1, height: h1, depth: d1 },
                Self::Box { width: w2, height: h2, depth: d2 },
            ) => {
                float_key(*w1) == float_key(*w2)
                    && float_key(*h1) == float_key(*h2)
                    && float_key(*d1) == float_key(*d2)
            }
            (Self::Sphere { radius: r1 }, Self::Sphere { radius: r2 }) => {
                float_key(*r1) == float_key(*r2)
            }
            (Self::Plane { width: w1, depth: d1 }, Self::Plane { width: w2, depth: d2 }) => {
                float_key(*w1) == float_key(*w2) && float_key(*d1) == float_key(*d2)
            }
            (Self::Mesh { path: p1 }, Self::Mesh { path: p2 }) => p1 == p2,
            _ => false,
        }
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Box { width, height, depth } => {
                float_key(*width).hash(state);
                float_key(*height).hash(state);
                float_key(*depth).hash(state);
            }
            Self::Sphere { radius } => float_key(*radius).hash(state),
            Self::Plane { width, depth } => {
                float_key(*width).hash(state);
                float_key(*depth).hash(state);
            }
            Self::Mesh { path } => path.hash(state),
        }
    }
}

/// Native collision shape shared by every body built from an equal [`Shape`]
///
/// The handle is owned by the world's shape cache and stays valid for the
/// lifetime of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(NativeHandle);

impl ShapeHandle {
    pub(crate) const fn new(handle: NativeHandle) -> Self {
        Self(handle)
    }

    /// Underlying native handle
    pub const fn native(self) -> NativeHandle {
        self.0
    }
}
