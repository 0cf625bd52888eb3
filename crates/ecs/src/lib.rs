//! Entity registries for the level editor.
//!
//! Components are stored in BTreeMap keyed by `EntityId`, one map per
//! component type, so iteration order is id order which is creation order.
//!
//! # Invariants
//! - Ids come from a counter owned by the registry; they are never reused,
//!   not even after `remove_all`.
//! - Every live entity has a transform and a physics component. The render
//!   component is optional until the editor attaches one.
//! - Removal cascades through every store; surviving ids are untouched.
//! - `current` and `initial` shape lists always have the same length.
//! - Looking up a missing id through the panicking accessors is a
//!   programming error. Use `contains` or the `get_*` variants to check.

use glam::Mat4;
use lain_common::{Aabb, EntityId, ModelType, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque reference to a model held by the model catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelHandle(pub u64);

impl std::fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Which model an entity draws. Does not own the model data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderComponent {
    pub model: ModelType,
    pub handle: ModelHandle,
}

/// `current` and `initial` lists passed to `PhysicsComponent::from_parts`
/// disagree on length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("collision shape lists differ in length: {current} current, {initial} initial")]
pub struct ShapeListMismatch {
    pub current: usize,
    pub initial: usize,
}

/// Collision shapes of one entity.
///
/// `initial[i]` is the model-space box of sub-mesh `i`; `current[i]` is the
/// same box carried into world space by the entity's model matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsComponent {
    current: Vec<Aabb>,
    initial: Vec<Aabb>,
}

impl PhysicsComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes whose world-space boxes have not been derived yet.
    pub fn from_initial(initial: Vec<Aabb>) -> Self {
        Self {
            current: initial.clone(),
            initial,
        }
    }

    pub fn from_parts(current: Vec<Aabb>, initial: Vec<Aabb>) -> Result<Self, ShapeListMismatch> {
        if current.len() != initial.len() {
            return Err(ShapeListMismatch {
                current: current.len(),
                initial: initial.len(),
            });
        }
        Ok(Self { current, initial })
    }

    pub fn push_shape(&mut self, initial: Aabb, current: Aabb) {
        self.initial.push(initial);
        self.current.push(current);
    }

    /// World-space boxes.
    pub fn current(&self) -> &[Aabb] {
        &self.current
    }

    /// Model-space boxes.
    pub fn initial(&self) -> &[Aabb] {
        &self.initial
    }

    pub fn len(&self) -> usize {
        self.initial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    /// Re-derive every world-space box from its model-space box.
    pub fn refresh(&mut self, model_matrix: &Mat4) {
        for (current, initial) in self.current.iter_mut().zip(&self.initial) {
            *current = initial.transformed(model_matrix);
        }
    }
}

/// Everything an entity owned at the moment it was removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEntity {
    pub id: EntityId,
    pub transform: Transform,
    pub physics: PhysicsComponent,
    pub render: Option<RenderComponent>,
}

/// Transform, physics and render stores that share one id space.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    transforms: BTreeMap<EntityId, Transform>,
    physics: BTreeMap<EntityId, PhysicsComponent>,
    renders: BTreeMap<EntityId, RenderComponent>,
    next_id: Option<EntityId>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self {
            transforms: BTreeMap::new(),
            physics: BTreeMap::new(),
            renders: BTreeMap::new(),
            next_id: Some(EntityId::FIRST),
        }
    }
}

#[track_caller]
fn missing(id: EntityId) -> ! {
    panic!("missing entity {id}")
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id and register `transform` with an empty physics
    /// component. Panics once every `u32` id has been handed out.
    pub fn add_entity(&mut self, transform: Transform) -> EntityId {
        let Some(id) = self.next_id else {
            panic!("entity ids exhausted");
        };
        self.next_id = id.next();
        self.transforms.insert(id, transform);
        self.physics.insert(id, PhysicsComponent::new());
        tracing::debug!(%id, "entity added");
        id
    }

    #[track_caller]
    pub fn set_render(&mut self, id: EntityId, render: RenderComponent) {
        if !self.contains(id) {
            missing(id);
        }
        self.renders.insert(id, render);
    }

    /// Append a model-space box; its world-space counterpart is derived
    /// from the entity's current transform right away.
    #[track_caller]
    pub fn add_aabb(&mut self, id: EntityId, local: Aabb) {
        let matrix = self.transform(id).model_matrix();
        let physics = self.physics.get_mut(&id).unwrap_or_else(|| missing(id));
        physics.push_shape(local, local.transformed(&matrix));
    }

    /// Replace the collision shapes wholesale, as stored.
    #[track_caller]
    pub fn set_physics(&mut self, id: EntityId, physics: PhysicsComponent) {
        if !self.contains(id) {
            missing(id);
        }
        self.physics.insert(id, physics);
    }

    #[track_caller]
    pub fn transform(&self, id: EntityId) -> &Transform {
        self.transforms.get(&id).unwrap_or_else(|| missing(id))
    }

    /// Replace the transform and refresh this entity's world-space boxes.
    #[track_caller]
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) {
        let slot = self.transforms.get_mut(&id).unwrap_or_else(|| missing(id));
        *slot = transform;
        if let Some(physics) = self.physics.get_mut(&id) {
            physics.refresh(&transform.model_matrix());
        }
        tracing::debug!(%id, position = ?transform.position, "transform set");
    }

    /// World-space collision boxes of `id`.
    #[track_caller]
    pub fn collision_shapes(&self, id: EntityId) -> &[Aabb] {
        self.physics(id).current()
    }

    #[track_caller]
    pub fn physics(&self, id: EntityId) -> &PhysicsComponent {
        self.physics.get(&id).unwrap_or_else(|| missing(id))
    }

    /// Render component of `id`. Panics if the entity is missing or has
    /// none attached.
    #[track_caller]
    pub fn render(&self, id: EntityId) -> &RenderComponent {
        self.renders.get(&id).unwrap_or_else(|| missing(id))
    }

    pub fn get_transform(&self, id: EntityId) -> Option<&Transform> {
        self.transforms.get(&id)
    }

    pub fn get_physics(&self, id: EntityId) -> Option<&PhysicsComponent> {
        self.physics.get(&id)
    }

    pub fn get_render(&self, id: EntityId) -> Option<&RenderComponent> {
        self.renders.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.transforms.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Live ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.transforms.keys().copied()
    }

    /// Erase `id` from every store.
    #[track_caller]
    pub fn remove_entity(&mut self, id: EntityId) -> RemovedEntity {
        let transform = self.transforms.remove(&id).unwrap_or_else(|| missing(id));
        let physics = self.physics.remove(&id).unwrap_or_default();
        let render = self.renders.remove(&id);
        tracing::debug!(%id, "entity removed");
        RemovedEntity {
            id,
            transform,
            physics,
            render,
        }
    }

    /// Clear every store. The id counter is not reset.
    pub fn remove_all(&mut self) -> usize {
        let count = self.transforms.len();
        self.transforms.clear();
        self.physics.clear();
        self.renders.clear();
        tracing::debug!(count, "all entities removed");
        count
    }

    /// Re-derive every world-space box from its model-space box and the
    /// owning entity's model matrix.
    pub fn update(&mut self) {
        for (id, physics) in self.physics.iter_mut() {
            if let Some(transform) = self.transforms.get(id) {
                physics.refresh(&transform.model_matrix());
            }
        }
    }

    /// `(id, model matrix, render)` for every entity that has a render
    /// component, in id order.
    pub fn draw_items(&self) -> impl Iterator<Item = (EntityId, Mat4, &RenderComponent)> + '_ {
        self.renders.iter().filter_map(|(id, render)| {
            self.transforms
                .get(id)
                .map(|t| (*id, t.model_matrix(), render))
        })
    }

    /// Every world-space collision box, for debug wireframes.
    pub fn debug_shapes(&self) -> impl Iterator<Item = &Aabb> + '_ {
        self.physics.values().flat_map(|p| p.current().iter())
    }

    /// Total number of collision boxes across all entities.
    pub fn shape_count(&self) -> usize {
        self.physics.values().map(PhysicsComponent::len).sum()
    }
}

pub fn crate_info() -> &'static str {
    "lain-ecs v0.1.0"
}
