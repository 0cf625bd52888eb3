use crate::LevelError;
use lain_assets::ModelCatalog;
use lain_common::{Aabb, EntityId, ModelType, Transform};
use lain_ecs::{EntityRegistry, PhysicsComponent, RenderComponent};
use serde::{Deserialize, Serialize};

/// Saved state of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub transform: Transform,
    /// World-space boxes as they were at save time.
    pub current: Vec<Aabb>,
    /// Model-space boxes.
    pub initial: Vec<Aabb>,
    pub model: ModelType,
}

/// A whole level: one record per entity, in id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub records: Vec<LevelRecord>,
}

impl LevelData {
    /// Snapshot every live entity that has a render component.
    pub fn capture(registry: &EntityRegistry) -> Self {
        let mut records = Vec::with_capacity(registry.len());
        for id in registry.ids() {
            let Some(render) = registry.get_render(id) else {
                tracing::warn!(%id, "entity without a model is not saved");
                continue;
            };
            let physics = registry.physics(id);
            records.push(LevelRecord {
                transform: *registry.transform(id),
                current: physics.current().to_vec(),
                initial: physics.initial().to_vec(),
                model: render.model,
            });
        }
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn shape_count(&self) -> usize {
        self.records.iter().map(|r| r.initial.len()).sum()
    }

    /// Check every record against `catalog` without touching any registry.
    pub fn prepare(&self, catalog: &ModelCatalog) -> Result<PreparedLevel, LevelError> {
        let entities = self
            .records
            .iter()
            .map(|record| -> Result<_, LevelError> {
                let model = catalog.model(record.model)?;
                let physics = PhysicsComponent::from_parts(record.current.clone(), record.initial.clone())?;
                Ok((record.transform, physics, model.render_component()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PreparedLevel { entities })
    }

    /// Recreate every record as a new entity. On error `registry` is
    /// unchanged.
    pub fn restore_into(
        &self,
        registry: &mut EntityRegistry,
        catalog: &ModelCatalog,
    ) -> Result<Vec<EntityId>, LevelError> {
        Ok(self.prepare(catalog)?.insert_into(registry))
    }
}

/// A level that passed validation and can be inserted infallibly.
#[derive(Debug, Clone)]
pub struct PreparedLevel {
    entities: Vec<(Transform, PhysicsComponent, RenderComponent)>,
}

impl PreparedLevel {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Add every entity to `registry` under freshly allocated ids, in
    /// record order.
    pub fn insert_into(self, registry: &mut EntityRegistry) -> Vec<EntityId> {
        self.entities
            .into_iter()
            .map(|(transform, physics, render)| {
                let id = registry.add_entity(transform);
                registry.set_physics(id, physics);
                registry.set_render(id, render);
                id
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_level;
    use glam::Vec3;

    #[test]
    fn capture_then_restore_preserves_entities() {
        let catalog = ModelCatalog::with_builtin_shapes();
        let level = sample_level();
        let mut reg = EntityRegistry::new();
        let ids = level.restore_into(&mut reg, &catalog).unwrap();
        assert_eq!(ids.len(), 3);

        let captured = LevelData::capture(&reg);
        assert_eq!(captured, level);
        assert_eq!(captured.shape_count(), 3);
    }

    #[test]
    fn restore_appends_after_existing_ids() {
        let catalog = ModelCatalog::with_builtin_shapes();
        let mut reg = EntityRegistry::new();
        let existing = reg.add_entity(Transform::default());
        let ids = sample_level().restore_into(&mut reg, &catalog).unwrap();
        assert!(ids.iter().all(|id| *id > existing));
        assert_eq!(reg.render(ids[1]).model, ModelType::Maze);
    }

    #[test]
    fn failed_restore_leaves_registry_untouched() {
        let mut catalog = ModelCatalog::new();
        catalog.register(
            ModelType::Ball,
            vec![lain_assets::SubMesh::new("s", Aabb::new(Vec3::ZERO, Vec3::ONE))],
        );
        let mut reg = EntityRegistry::new();
        let err = sample_level().restore_into(&mut reg, &catalog).unwrap_err();
        assert!(matches!(err, LevelError::Asset(_)), "{err}");
        assert!(reg.is_empty());
    }

    #[test]
    fn mismatched_shape_lists_are_rejected() {
        let mut level = sample_level();
        level.records[0].current.clear();
        let err = level.prepare(&ModelCatalog::with_builtin_shapes()).unwrap_err();
        assert!(matches!(err, LevelError::ShapeMismatch(_)));
    }

    #[test]
    fn entities_without_model_are_skipped() {
        let mut reg = EntityRegistry::new();
        reg.add_entity(Transform::default());
        assert!(LevelData::capture(&reg).is_empty());
    }
}
