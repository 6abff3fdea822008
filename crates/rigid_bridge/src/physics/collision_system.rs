//! Per-frame collision diffing
//!
//! The native engine reports every pair that overlaps *now*. This module turns
//! consecutive reports into enter/exit events: pairs present in the new frame
//! but not the previous one are new collisions, pairs present before but gone
//! now are lost collisions.
//!
//! Body/body and ghost/body overlaps run through two independent
//! [`CollisionChannel`]s with their own snapshot and listeners.

use std::collections::HashSet;

use crate::physics::entity::EntityId;

/// Collision pair representing two entities that are colliding
///
/// Unordered: `(a, b)` and `(b, a)` build the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// Smaller id of the pair
    pub entity_a: EntityId,
    /// Larger id of the pair
    pub entity_b: EntityId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller entity ID first for consistency)
    pub fn new(entity_a: EntityId, entity_b: EntityId) -> Self {
        if entity_a <= entity_b {
            Self { entity_a, entity_b }
        } else {
            Self { entity_a: entity_b, entity_b: entity_a }
        }
    }

    /// Create a pair only if it is meaningful: no sentinel id, no self-pair
    pub fn try_new(entity_a: EntityId, entity_b: EntityId) -> Option<Self> {
        if entity_a.is_none() || entity_b.is_none() || entity_a == entity_b {
            None
        } else {
            Some(Self::new(entity_a, entity_b))
        }
    }

    /// Whether `entity` is part of this pair
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }

    /// The other member of the pair, if `entity` is part of it
    pub fn other(&self, entity: EntityId) -> Option<EntityId> {
        if self.entity_a == entity {
            Some(self.entity_b)
        } else if self.entity_b == entity {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// Receives collision transitions from a world
///
/// Listeners are called synchronously from `World::update`, in registration
/// order. Any `FnMut(&CollisionPair)` closure is a listener that only cares
/// about new collisions.
pub trait CollisionListener {
    /// Two objects started colliding
    fn new_collision(&mut self, pair: &CollisionPair);

    /// Two objects stopped colliding
    fn lost_collision(&mut self, _pair: &CollisionPair) {}
}

impl<F: FnMut(&CollisionPair)> CollisionListener for F {
    fn new_collision(&mut self, pair: &CollisionPair) {
        self(pair);
    }
}

/// Set of pairs colliding during one frame
///
/// Keeps the order in which pairs were first reported, so events for a given
/// native output always fire in the same order.
#[derive(Debug, Clone, Default)]
pub struct CollisionSnapshot {
    pairs: Vec<CollisionPair>,
    index: HashSet<CollisionPair>,
}

impl CollisionSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair; returns `false` if it was already present
    pub fn insert(&mut self, pair: CollisionPair) -> bool {
        if self.index.insert(pair) {
            self.pairs.push(pair);
            true
        } else {
            false
        }
    }

    /// Whether the pair is part of this frame
    pub fn contains(&self, pair: &CollisionPair) -> bool {
        self.index.contains(pair)
    }

    /// Number of distinct pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair collides
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in report order
    pub fn iter(&self) -> impl Iterator<Item = &CollisionPair> {
        self.pairs.iter()
    }

    /// Pairs present in `self` but not in `other`
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a CollisionPair> + 'a {
        self.pairs.iter().filter(move |pair| !other.contains(pair))
    }

    /// Build a snapshot from a flat native id array
    ///
    /// Pairs with a sentinel id or two equal ids carry no meaning and are
    /// skipped. Pairs naming an id for which `is_live` returns `false` are
    /// logged and skipped; the rest of the array is still processed.
    pub fn from_raw(raw: &[u64], channel: &str, is_live: impl Fn(EntityId) -> bool) -> Self {
        let mut snapshot = Self::new();
        let chunks = raw.chunks_exact(2);
        if !chunks.remainder().is_empty() {
            log::warn!(
                "{} channel: odd id array of length {}, ignoring trailing id",
                channel,
                raw.len()
            );
        }

        for chunk in chunks {
            let first = EntityId::new(chunk[0]);
            let second = EntityId::new(chunk[1]);
            let Some(pair) = CollisionPair::try_new(first, second) else {
                continue;
            };
            if let Some(unknown) = [first, second].into_iter().find(|id| !is_live(*id)) {
                log::warn!(
                    "{} channel: dropping pair ({}, {}), id {} has no live handle",
                    channel,
                    first,
                    second,
                    unknown
                );
                continue;
            }
            snapshot.insert(pair);
        }
        snapshot
    }
}

/// One independent stream of collision events
pub struct CollisionChannel {
    name: &'static str,
    listeners: Vec<Box<dyn CollisionListener>>,
    snapshot: CollisionSnapshot,
}

impl CollisionChannel {
    /// Create a channel with no listener and an empty snapshot
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Vec::new(),
            snapshot: CollisionSnapshot::new(),
        }
    }

    /// Channel name used in log messages
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a listener; listeners are notified in registration order
    pub fn add_listener(&mut self, listener: Box<dyn CollisionListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Pairs colliding after the last applied frame
    pub fn snapshot(&self) -> &CollisionSnapshot {
        &self.snapshot
    }

    /// Diff `next` against the stored snapshot, notify listeners, store `next`
    pub fn apply(&mut self, next: CollisionSnapshot) {
        for pair in next.difference(&self.snapshot) {
            log::debug!("{} channel: new collision {:?}", self.name, pair);
            for listener in &mut self.listeners {
                listener.new_collision(pair);
            }
        }
        for pair in self.snapshot.difference(&next) {
            log::debug!("{} channel: lost collision {:?}", self.name, pair);
            for listener in &mut self.listeners {
                listener.lost_collision(pair);
            }
        }
        self.snapshot = next;
    }
}

impl std::fmt::Debug for CollisionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionChannel")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .field("snapshot", &self.snapshot)
            .finish()
    }
}
