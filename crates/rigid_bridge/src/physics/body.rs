//! Physics object handles
//!
//! A [`BodyHandle`] exclusively owns one native object and keeps a reference
//! to the world it lives in. The four kinds share the same capability set but
//! honour different contracts:
//!
//! | kind      | position          | direction         | orientation | mass   |
//! |-----------|-------------------|-------------------|-------------|--------|
//! | Static    | cached, immutable | cached, immutable | no-op       | -      |
//! | Kinematic | native            | native            | native      | zero   |
//! | Dynamic   | native            | native            | native      | stored |
//! | Ghost     | native            | fixed forward     | no-op       | -      |
//!
//! Handles are move-only. [`BodyHandle::delete`] consumes the handle, and a
//! handle dropped without `delete` releases its native object on drop.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::foundation::math::{Quat, Vec3, BASE_DIRECTION};
use crate::native::NativeHandle;
use crate::physics::entity::EntityId;
use crate::physics::world::WorldCore;

/// Kind of a physics object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Immovable body
    Static,
    /// Zero-mass body moved by the caller
    Kinematic,
    /// Mass-bearing body moved by the simulation
    Dynamic,
    /// Collision-only trigger volume
    Ghost,
}

#[derive(Debug, Clone, Copy)]
enum Variant {
    Static { position: Vec3, direction: Vec3 },
    Kinematic,
    Dynamic { mass: f32 },
    Ghost,
}

/// Handle to a body or ghost object owned by the native engine
pub struct BodyHandle {
    id: EntityId,
    pointer: NativeHandle,
    world: Rc<WorldCore>,
    variant: Variant,
    sleeping: bool,
    released: bool,
}

impl BodyHandle {
    fn new(world: Rc<WorldCore>, id: EntityId, pointer: NativeHandle, variant: Variant) -> Self {
        world.register(id);
        Self {
            id,
            pointer,
            world,
            variant,
            sleeping: false,
            released: false,
        }
    }

    pub(crate) fn new_static(
        world: Rc<WorldCore>,
        id: EntityId,
        pointer: NativeHandle,
        position: Vec3,
        direction: Vec3,
    ) -> Self {
        Self::new(world, id, pointer, Variant::Static { position, direction })
    }

    pub(crate) fn new_kinematic(world: Rc<WorldCore>, id: EntityId, pointer: NativeHandle) -> Self {
        Self::new(world, id, pointer, Variant::Kinematic)
    }

    pub(crate) fn new_dynamic(world: Rc<WorldCore>, id: EntityId, pointer: NativeHandle, mass: f32) -> Self {
        Self::new(world, id, pointer, Variant::Dynamic { mass })
    }

    pub(crate) fn new_ghost(world: Rc<WorldCore>, id: EntityId, pointer: NativeHandle) -> Self {
        Self::new(world, id, pointer, Variant::Ghost)
    }

    /// Entity id this object reports in collisions
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Kind of the object
    pub fn kind(&self) -> BodyKind {
        match self.variant {
            Variant::Static { .. } => BodyKind::Static,
            Variant::Kinematic => BodyKind::Kinematic,
            Variant::Dynamic { .. } => BodyKind::Dynamic,
            Variant::Ghost => BodyKind::Ghost,
        }
    }

    /// Mass of a dynamic body, `None` for every other kind
    pub fn mass(&self) -> Option<f32> {
        match self.variant {
            Variant::Dynamic { mass } => Some(mass),
            _ => None,
        }
    }

    /// Whether the object was put to sleep
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Native object handle
    pub fn native_handle(&self) -> NativeHandle {
        self.pointer
    }

    /// Native handle, once the owning world is known to be alive
    fn live_pointer(&self) -> Result<NativeHandle> {
        self.world.ensure_alive()?;
        Ok(self.pointer)
    }

    /// Current position
    pub fn position(&self) -> Result<Vec3> {
        match self.variant {
            Variant::Static { position, .. } => Ok(position),
            Variant::Kinematic | Variant::Dynamic { .. } => {
                let pointer = self.live_pointer()?;
                Ok(self.world.with_native(|native| native.body_position(pointer)))
            }
            Variant::Ghost => {
                let pointer = self.live_pointer()?;
                Ok(self.world.with_native(|native| native.ghost_position(pointer)))
            }
        }
    }

    /// Current direction
    pub fn direction(&self) -> Result<Vec3> {
        match self.variant {
            Variant::Static { direction, .. } => Ok(direction),
            Variant::Kinematic | Variant::Dynamic { .. } => {
                let pointer = self.live_pointer()?;
                Ok(self.world.with_native(|native| native.body_direction(pointer)))
            }
            Variant::Ghost => Ok(BASE_DIRECTION),
        }
    }

    /// Move the object; static bodies ignore it
    pub fn set_position(&mut self, position: Vec3) -> Result<()> {
        match self.variant {
            Variant::Static { .. } => Ok(()),
            Variant::Kinematic | Variant::Dynamic { .. } => {
                let pointer = self.live_pointer()?;
                self.world.with_native(|native| native.body_set_position(pointer, position));
                Ok(())
            }
            Variant::Ghost => {
                let pointer = self.live_pointer()?;
                self.world.with_native(|native| native.ghost_set_position(pointer, position));
                Ok(())
            }
        }
    }

    /// Point the object in a direction; static bodies and ghosts ignore it
    pub fn set_direction(&mut self, direction: Vec3) -> Result<()> {
        match self.variant {
            Variant::Static { .. } | Variant::Ghost => Ok(()),
            Variant::Kinematic | Variant::Dynamic { .. } => {
                let pointer = self.live_pointer()?;
                self.world.with_native(|native| native.body_set_direction(pointer, direction));
                Ok(())
            }
        }
    }

    /// Rotate the object; static bodies and ghosts ignore it
    pub fn set_orientation(&mut self, orientation: Quat) -> Result<()> {
        match self.variant {
            Variant::Static { .. } | Variant::Ghost => Ok(()),
            Variant::Kinematic | Variant::Dynamic { .. } => {
                let pointer = self.live_pointer()?;
                self.world.with_native(|native| native.body_set_orientation(pointer, orientation));
                Ok(())
            }
        }
    }

    /// Remove the object from the simulation (`true`) or put it back (`false`)
    ///
    /// Asking for the state the object is already in does nothing, so a body
    /// is never woken up or put to sleep by a redundant call. Ghosts are never
    /// simulated; only their local flag changes.
    pub fn sleep(&mut self, sleeping: bool) -> Result<()> {
        if self.sleeping == sleeping {
            return Ok(());
        }
        if !matches!(self.variant, Variant::Ghost) {
            let pointer = self.live_pointer()?;
            self.world.with_native(|native| native.body_set_activate(pointer, !sleeping));
        }
        self.sleeping = sleeping;
        Ok(())
    }

    /// Scale the collision geometry; ghosts ignore it
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        if matches!(self.variant, Variant::Ghost) {
            return Ok(());
        }
        let pointer = self.live_pointer()?;
        self.world.with_native(|native| native.body_scale(pointer, x, y, z));
        Ok(())
    }

    /// Remove the object from its world and destroy the native object
    pub fn delete(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.world.unregister(self.id);

        if self.world.is_deleted() {
            log::debug!(
                "Object {} outlived its world, native object already destroyed",
                self.id
            );
            return;
        }

        let world = self.world.native_handle();
        let pointer = self.pointer;
        match self.variant {
            Variant::Ghost => self.world.with_native(|native| native.ghost_delete(pointer, world)),
            _ => self.world.with_native(|native| native.body_delete(pointer, world)),
        }
        log::debug!("Released {:?} object {}", self.kind(), self.id);
    }
}

impl Drop for BodyHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyHandle")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("pointer", &self.pointer)
            .field("sleeping", &self.sleeping)
            .finish()
    }
}
