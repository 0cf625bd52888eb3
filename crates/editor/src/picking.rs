use lain_common::{EntityId, Ray};
use lain_ecs::EntityRegistry;
use lain_geom::{ray_aabb_distance, ray_intersects_aabb};
use serde::{Deserialize, Serialize};

/// How to choose among several entities under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickPolicy {
    /// Lowest id with any intersecting shape. Cheap, ignores depth.
    #[default]
    FirstHit,
    /// Smallest entry distance along the ray.
    NearestHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PickOptions {
    pub policy: PickPolicy,
    /// Skip the currently selected entity so repeated clicks reach what is
    /// behind it.
    pub exclude_selected: bool,
}

/// Entity hit by `ray`, if any.
///
/// Entities are visited in id order and shapes in list order, so the result
/// is deterministic for a given scene. Uses the world-space boxes; call
/// `EntityRegistry::update` first if transforms changed this frame.
pub fn pick(
    registry: &EntityRegistry,
    ray: &Ray,
    options: &PickOptions,
    selected: Option<EntityId>,
) -> Option<EntityId> {
    if ray.is_degenerate() {
        return None;
    }
    let skip = if options.exclude_selected { selected } else { None };
    let mut candidates = registry.ids().filter(|id| Some(*id) != skip);

    let hit = match options.policy {
        PickPolicy::FirstHit => candidates.find(|id| {
            registry
                .collision_shapes(*id)
                .iter()
                .any(|aabb| ray_intersects_aabb(ray, aabb))
        }),
        PickPolicy::NearestHit => {
            let mut best: Option<(EntityId, f32)> = None;
            for id in candidates {
                let nearest = registry
                    .collision_shapes(id)
                    .iter()
                    .filter_map(|aabb| ray_aabb_distance(ray, aabb))
                    .min_by(f32::total_cmp);
                if let Some(t) = nearest {
                    // Strict comparison keeps the lower id on ties.
                    if best.is_none_or(|(_, b)| t < b) {
                        best = Some((id, t));
                    }
                }
            }
            best.map(|(id, _)| id)
        }
    };
    tracing::debug!(policy = ?options.policy, hit = ?hit, "pick");
    hit
}
