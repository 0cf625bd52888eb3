//! Model catalog for the level editor.
//!
//! Each model type maps to a list of sub-meshes with model-space bounding
//! boxes. Spawning an entity copies those boxes into its physics component;
//! the renderer refers to the model by a content-addressed handle, never by
//! file path.
//!
//! # Layout
//! The catalog can be persisted to disk as a JSON manifest.

use glam::Vec3;
use lain_common::{Aabb, ModelType};
use lain_ecs::{ModelHandle, RenderComponent};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// One drawable piece of a model and its model-space bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubMesh {
    pub name: String,
    pub bounds: Aabb,
}

impl SubMesh {
    pub fn new(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// Bounds are the component-wise min/max of the vertex positions.
    pub fn from_positions(name: impl Into<String>, positions: &[Vec3]) -> Result<Self, AssetError> {
        let name = name.into();
        let bounds = Aabb::from_points(positions).ok_or_else(|| AssetError::EmptyMesh(name.clone()))?;
        Ok(Self { name, bounds })
    }
}

/// A registered model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub model: ModelType,
    pub handle: ModelHandle,
    pub meshes: Vec<SubMesh>,
}

impl ModelData {
    pub fn render_component(&self) -> RenderComponent {
        RenderComponent {
            model: self.model,
            handle: self.handle,
        }
    }

    pub fn bounds(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.meshes.iter().map(|m| m.bounds)
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model not registered: {0}")]
    UnknownModel(ModelType),
    #[error("mesh {0:?} has no vertices")]
    EmptyMesh(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct ManifestEntry {
    model: ModelType,
    meshes: Vec<SubMesh>,
}

#[derive(Serialize, Deserialize)]
struct Manifest {
    models: Vec<ManifestEntry>,
}

/// Model type -> sub-mesh bounds and render handle.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: BTreeMap<ModelType, ModelData>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding procedurally built stand-ins for every model type:
    /// a unit ball and a maze tile made of a floor slab and one wall.
    pub fn with_builtin_shapes() -> Self {
        let mut catalog = Self::new();
        catalog.register(ModelType::Ball, vec![SubMesh::new("sphere", ball_bounds())]);
        catalog.register(
            ModelType::Maze,
            vec![
                SubMesh::new(
                    "floor",
                    Aabb::new(Vec3::new(-5.0, -0.25, -5.0), Vec3::new(5.0, 0.0, 5.0)),
                ),
                SubMesh::new(
                    "wall",
                    Aabb::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 1.0, -4.5)),
                ),
            ],
        );
        catalog
    }

    /// Register (or replace) the sub-meshes of a model and return its handle.
    pub fn register(&mut self, model: ModelType, meshes: Vec<SubMesh>) -> ModelHandle {
        let handle = content_hash(model, &meshes);
        if self.models.contains_key(&model) {
            tracing::info!(%model, %handle, "replacing registered model");
        }
        self.models.insert(
            model,
            ModelData {
                model,
                handle,
                meshes,
            },
        );
        handle
    }

    pub fn get(&self, model: ModelType) -> Option<&ModelData> {
        self.models.get(&model)
    }

    pub fn model(&self, model: ModelType) -> Result<&ModelData, AssetError> {
        self.get(model).ok_or(AssetError::UnknownModel(model))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Save the catalog to a JSON manifest.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let manifest = Manifest {
            models: self
                .models
                .values()
                .map(|m| ManifestEntry {
                    model: m.model,
                    meshes: m.meshes.clone(),
                })
                .collect(),
        };
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &manifest)?;
        Ok(())
    }

    /// Load a catalog from a JSON manifest. Handles are recomputed from the
    /// content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let manifest: Manifest = serde_json::from_reader(file)?;
        let mut catalog = Self::new();
        for entry in manifest.models {
            catalog.register(entry.model, entry.meshes);
        }
        tracing::debug!(models = catalog.len(), "model catalog loaded");
        Ok(catalog)
    }
}

fn content_hash(model: ModelType, meshes: &[SubMesh]) -> ModelHandle {
    let mut hasher = Sha256::new();
    hasher.update(model.tag().to_le_bytes());
    for mesh in meshes {
        hasher.update(mesh.name.as_bytes());
        for v in mesh.bounds.min.to_array().into_iter().chain(mesh.bounds.max.to_array()) {
            hasher.update(v.to_le_bytes());
        }
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    ModelHandle(u64::from_le_bytes(bytes))
}

/// Bounds of a UV sphere of radius 1, built from its vertices.
fn ball_bounds() -> Aabb {
    const RINGS: usize = 8;
    const SEGMENTS: usize = 16;
    let mut positions = Vec::with_capacity((RINGS + 1) * SEGMENTS);
    for ring in 0..=RINGS {
        let phi = std::f32::consts::PI * ring as f32 / RINGS as f32;
        for seg in 0..SEGMENTS {
            let theta = std::f32::consts::TAU * seg as f32 / SEGMENTS as f32;
            positions.push(Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ));
        }
    }
    Aabb::from_points(&positions).unwrap_or_else(|| Aabb::new(Vec3::NEG_ONE, Vec3::ONE))
}

pub fn crate_info() -> &'static str {
    "lain-assets v0.1.0"
}
