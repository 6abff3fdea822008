//! Error types for the physics layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by world, builder and body operations
///
/// Validation and resource errors are raised before any native call is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A body was built without an entity id
    #[error("No id provided for the physic object")]
    IdNotProvided,

    /// A body was built without a shape
    #[error("No shape provided for the physic object")]
    ShapeNotProvided,

    /// An argument is outside its valid domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A mesh file referenced by a shape does not exist
    #[error("No physic trimesh for {}", .0.display())]
    FileMissing(PathBuf),

    /// The owning world has been deleted
    #[error("The physic world has been deleted")]
    WorldDeleted,
}

/// Result alias for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
