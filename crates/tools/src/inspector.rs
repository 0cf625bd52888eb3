use lain_common::{EntityId, EntityInfo, ModelType};
use lain_ecs::EntityRegistry;
use std::collections::BTreeMap;

/// Level inspector for developer tooling.
///
/// Read-only queries against the entity registry, used by the edit-mode
/// entity panel and the CLI.
pub struct LevelInspector;

impl LevelInspector {
    pub fn summary(registry: &EntityRegistry) -> LevelSummary {
        let mut per_model = BTreeMap::new();
        let mut unrendered = 0;
        for id in registry.ids() {
            match registry.get_render(id) {
                Some(render) => *per_model.entry(render.model).or_insert(0) += 1,
                None => unrendered += 1,
            }
        }
        LevelSummary {
            entity_count: registry.len(),
            shape_count: registry.shape_count(),
            per_model,
            unrendered,
        }
    }

    /// Display-ready state of one entity, `None` if it does not exist.
    pub fn inspect_entity(registry: &EntityRegistry, id: EntityId) -> Option<EntityInfo> {
        let transform = registry.get_transform(id)?;
        let (p, r, s) = (transform.position, transform.rotation, transform.scale);
        Some(EntityInfo {
            id,
            model: registry.get_render(id).map(|render| render.model),
            position: p.to_array(),
            rotation: r.to_array(),
            scale: s.to_array(),
            shape_count: registry.get_physics(id).map_or(0, |ph| ph.len()),
        })
    }

    /// Every live id in creation order.
    pub fn list_entities(registry: &EntityRegistry) -> Vec<EntityId> {
        registry.ids().collect()
    }
}

/// Counts over a whole scene.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSummary {
    pub entity_count: usize,
    pub shape_count: usize,
    pub per_model: BTreeMap<ModelType, usize>,
    /// Entities without a render component.
    pub unrendered: usize,
}

impl std::fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level: entities={} shapes={}", self.entity_count, self.shape_count)?;
        for (model, count) in &self.per_model {
            write!(f, " {model}={count}")?;
        }
        if self.unrendered > 0 {
            write!(f, " unrendered={}", self.unrendered)?;
        }
        Ok(())
    }
}
