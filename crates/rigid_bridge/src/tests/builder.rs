use super::{shared_world, traced_world};
use crate::error::{PhysicsError, Result};
use crate::foundation::math::{Vec3, BASE_DIRECTION};
use crate::native::HeadlessEngine;
use crate::physics::{BodyKind, EntityId, Shape, World};

#[test]
fn test_missing_id_fails_before_native_calls() {
    let (world, calls) = traced_world();
    calls.clear();

    let result = world.create_object().with_sphere(1.0).build_kinematic();
    assert_eq!(result.unwrap_err(), PhysicsError::IdNotProvided);

    let result = world.create_object().build_dynamic();
    assert_eq!(result.unwrap_err(), PhysicsError::IdNotProvided);
    assert_eq!(calls.total(), 0);
}

#[test]
fn test_missing_shape_fails_before_native_calls() {
    let (world, calls) = traced_world();
    calls.clear();

    let result = world.create_object().with_id(4).build_ghost();
    assert_eq!(result.unwrap_err(), PhysicsError::ShapeNotProvided);
    assert_eq!(calls.total(), 0);
}

#[test]
fn test_missing_mesh_fails_before_native_calls() {
    let (world, calls) = traced_world();
    calls.clear();

    let result = world
        .create_object()
        .with_id(4)
        .with_mesh("/definitely/not/here.bullet")
        .build_static();
    assert!(matches!(result, Err(PhysicsError::FileMissing(_))));
    assert_eq!(calls.total(), 0);
}

#[test]
fn test_invalid_mass_rejected() {
    let (world, calls) = traced_world();
    calls.clear();

    for mass in [0.0, -2.0, f32::NAN, f32::INFINITY] {
        let result = world.create_object().with_id(1).with_sphere(1.0).with_mass(mass).build_dynamic();
        assert!(matches!(result, Err(PhysicsError::InvalidArgument(_))));
    }
    assert_eq!(calls.total(), 0);
}

#[test]
fn test_builder_is_reusable() -> Result<()> {
    let (world, calls) = traced_world();
    let template = world
        .create_object()
        .with_id(9)
        .with_box(1.0, 2.0, 3.0)
        .at_position(Vec3::new(0.0, 1.0, 0.0));

    let first = template.build_kinematic()?;
    let second = template.build_kinematic()?;

    assert_ne!(first.native_handle(), second.native_handle());
    assert_eq!(first.id(), second.id());
    assert_eq!(calls.count("body_create_kinematic"), 2);
    assert_eq!(calls.count("shape_create_box"), 1);
    Ok(())
}

#[test]
fn test_equal_shapes_share_one_native_shape() -> Result<()> {
    let (world, calls) = traced_world();

    let _a = world.create_object().with_id(1).with_sphere(0.5).build_kinematic()?;
    let _b = world.create_object().with_id(2).with_shape(Shape::sphere(0.5)).build_ghost()?;
    let _c = world.create_object().with_id(3).with_sphere(0.75).build_kinematic()?;

    assert_eq!(calls.count("shape_create_sphere"), 2);
    assert_eq!(world.shape_count(), 2);
    Ok(())
}

#[test]
fn test_last_shape_selector_wins() -> Result<()> {
    let (world, calls) = traced_world();

    let _body = world
        .create_object()
        .with_id(1)
        .with_sphere(1.0)
        .with_plane(10.0, 10.0)
        .build_static()?;

    assert_eq!(calls.count("shape_create_sphere"), 0);
    assert_eq!(calls.count("shape_create_plane"), 1);
    Ok(())
}

#[test]
fn test_defaults() -> Result<()> {
    let (world, engine) = shared_world();

    let body = world.create_object().with_id(1).with_sphere(1.0).build_dynamic()?;
    assert_eq!(body.mass(), Some(1.0));
    assert_eq!(body.position()?, Vec3::zeros());
    assert_eq!(body.direction()?, BASE_DIRECTION);

    let wall = world.create_object().with_id(2).with_box(1.0, 1.0, 1.0).build_static()?;
    assert_eq!(wall.direction()?, BASE_DIRECTION);
    assert_eq!(engine.borrow().object_count(), 2);
    Ok(())
}

#[test]
fn test_each_build_yields_matching_kind() -> Result<()> {
    let (world, _engine) = shared_world();
    let builder = world.create_object().with_id(EntityId::new(11)).with_sphere(1.0);

    assert_eq!(builder.build_static()?.kind(), BodyKind::Static);
    assert_eq!(builder.build_kinematic()?.kind(), BodyKind::Kinematic);
    assert_eq!(builder.build_dynamic()?.kind(), BodyKind::Dynamic);
    assert_eq!(builder.build_ghost()?.kind(), BodyKind::Ghost);
    Ok(())
}

#[test]
fn test_build_after_world_delete_fails() {
    let world = World::new(HeadlessEngine::new());
    let builder = world.create_object().with_id(1).with_sphere(1.0);
    world.delete();

    assert_eq!(builder.build_kinematic().unwrap_err(), PhysicsError::WorldDeleted);
}
