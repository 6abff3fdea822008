use std::time::Duration;

use approx::assert_relative_eq;

use super::{shared_world, traced_world};
use crate::config::WorldConfig;
use crate::error::{PhysicsError, Result};
use crate::foundation::math::Vec3;
use crate::native::{CallLog, HeadlessEngine, SharedEngine, TracingEngine};
use crate::physics::{BodyHandle, EntityId, Shape, World, WorldState};

/// World holding one 2x2x2 box with id 3 centered at (0, 0, 5)
fn target_world() -> Result<(World, BodyHandle, CallLog)> {
    let (world, calls) = traced_world();
    let target = world
        .create_object()
        .with_id(3)
        .with_box(2.0, 2.0, 2.0)
        .at_position(Vec3::new(0.0, 0.0, 5.0))
        .build_kinematic()?;
    calls.clear();
    Ok((world, target, calls))
}

#[test]
fn test_state_moves_to_active_on_first_step() -> Result<()> {
    let (mut world, _calls) = traced_world();
    assert_eq!(world.state(), WorldState::Created);

    world.step(Duration::ZERO)?;
    assert_eq!(world.state(), WorldState::Active);
    world.update()?;
    assert_eq!(world.state(), WorldState::Active);
    Ok(())
}

#[test]
fn test_raycast_reports_hit_and_point() -> Result<()> {
    let (world, _target, calls) = target_world()?;

    let hit = world.raycast(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0))?;
    assert!(hit.is_hit());
    assert_eq!(hit.hit, EntityId::new(3));
    assert_relative_eq!(hit.point, Vec3::new(0.0, 0.0, 4.0), epsilon = 1e-5);

    let miss = world.raycast(Vec3::zeros(), Vec3::new(0.0, 10.0, 0.0))?;
    assert!(!miss.is_hit());
    assert_eq!(miss.hit, EntityId::NONE);
    assert_eq!(calls.count("world_raycast"), 2);
    Ok(())
}

#[test]
fn test_simple_ray_returns_id_only() -> Result<()> {
    let (world, _target, calls) = target_world()?;

    assert_eq!(world.throw_simple_ray(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0))?, EntityId::new(3));
    assert_eq!(world.throw_simple_ray(Vec3::zeros(), Vec3::new(0.0, 0.0, 3.0))?, EntityId::NONE);
    assert_eq!(calls.count("world_raycast_simple"), 2);
    Ok(())
}

#[test]
fn test_ray_towards_normalizes_direction() -> Result<()> {
    let (world, _target, _calls) = target_world()?;

    let unnormalized = Vec3::new(0.0, 0.0, 25.0);
    assert_eq!(world.throw_simple_ray_towards(Vec3::zeros(), unnormalized, 6.0)?, EntityId::new(3));
    assert_eq!(world.throw_simple_ray_towards(Vec3::zeros(), unnormalized, 3.0)?, EntityId::NONE);
    assert_eq!(world.throw_simple_ray_towards(Vec3::zeros(), unnormalized, 0.0)?, EntityId::NONE);
    Ok(())
}

#[test]
fn test_ray_towards_starts_at_origin() -> Result<()> {
    let (world, _target, _calls) = target_world()?;

    let forward = Vec3::new(0.0, 0.0, 1.0);
    let origin = Vec3::new(0.0, 0.0, 3.0);
    assert_eq!(world.throw_simple_ray_towards(origin, forward, 1.5)?, EntityId::new(3));
    assert_eq!(world.throw_simple_ray_towards(origin, -forward, 1.5)?, EntityId::NONE);
    Ok(())
}

#[test]
fn test_ray_towards_rejects_negative_distance_without_native_call() -> Result<()> {
    let (world, _target, calls) = target_world()?;

    let result = world.throw_simple_ray_towards(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), -1.0);
    assert!(matches!(result, Err(PhysicsError::InvalidArgument(_))));

    let result = world.throw_simple_ray_towards(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), f32::NAN);
    assert!(matches!(result, Err(PhysicsError::InvalidArgument(_))));

    let result = world.throw_simple_ray_towards(Vec3::zeros(), Vec3::zeros(), 5.0);
    assert!(matches!(result, Err(PhysicsError::InvalidArgument(_))));

    assert_eq!(calls.total(), 0);
    Ok(())
}

#[test]
fn test_gravity_round_trips_and_flips_for_engine() {
    let (mut world, engine) = shared_world();

    world.set_gravity(1.0, 9.8, -2.0);
    assert_eq!(world.gravity(), Vec3::new(1.0, 9.8, -2.0));

    let native = engine.borrow().world_gravity(world.native_handle());
    assert_eq!(native, Some(Vec3::new(1.0, -9.8, -2.0)));
}

#[test]
fn test_config_applies_gravity_and_step_clamp() -> Result<()> {
    let engine = SharedEngine::new(HeadlessEngine::new());
    let config = WorldConfig::default()
        .with_gravity(0.0, 10.0, 0.0)
        .with_max_step_seconds(0.0);
    let mut world = World::with_config(engine.clone(), &config);

    assert_eq!(world.gravity(), Vec3::new(0.0, 10.0, 0.0));
    assert_eq!(
        engine.borrow().world_gravity(world.native_handle()),
        Some(Vec3::new(0.0, -10.0, 0.0))
    );

    let ball = world
        .create_object()
        .with_id(1)
        .with_sphere(1.0)
        .at_position(Vec3::new(0.0, 5.0, 0.0))
        .build_dynamic()?;
    std::thread::sleep(Duration::from_millis(5));
    world.update()?;
    assert_relative_eq!(ball.position()?, Vec3::new(0.0, 5.0, 0.0));
    Ok(())
}

#[test]
fn test_config_with_oversized_step_clamp_runs_unclamped() -> Result<()> {
    let config = WorldConfig::default().with_max_step_seconds(1.0e30);
    let mut world = World::with_config(HeadlessEngine::new(), &config);

    world.update()?;
    assert_eq!(world.state(), WorldState::Active);
    Ok(())
}

#[test]
fn test_config_mesh_directory_resolves_relative_paths() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("rock.bullet"), b"mesh").unwrap();
    let config = WorldConfig::default().with_mesh_directory(dir.path());
    let world = World::with_config(HeadlessEngine::new(), &config);

    let rock = world.create_object().with_id(1).with_mesh("rock.bullet").build_static()?;
    assert_eq!(rock.id(), EntityId::new(1));

    let missing = world.create_object().with_id(2).with_mesh("cliff.bullet").build_static();
    assert_eq!(
        missing.unwrap_err(),
        PhysicsError::FileMissing(dir.path().join("cliff.bullet"))
    );
    Ok(())
}

#[test]
fn test_shape_lookup_is_cached_per_world() -> Result<()> {
    let (world, calls) = traced_world();

    let first = world.shape(&Shape::sphere(2.0))?;
    let second = world.shape(&Shape::sphere(2.0))?;
    let other = world.shape(&Shape::sphere(3.0))?;

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(world.shape_count(), 2);
    assert_eq!(calls.count("shape_create_sphere"), 2);
    Ok(())
}

#[test]
fn test_delete_releases_native_world_once() {
    let engine = TracingEngine::new(SharedEngine::new(HeadlessEngine::new()));
    let calls = engine.call_log();
    let headless = engine.inner().clone();
    let world = World::new(engine);
    assert_eq!(headless.borrow().world_count(), 1);

    world.delete();
    assert_eq!(calls.count("world_delete"), 1);
    assert_eq!(headless.borrow().world_count(), 0);
}

#[test]
fn test_drop_releases_native_world() {
    let (world, calls) = traced_world();
    drop(world);
    assert_eq!(calls.count("world_delete"), 1);
}
