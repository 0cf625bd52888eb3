use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in a level.
///
/// Ids are handed out by the entity registry from a counter that starts at 1
/// and only grows, so removing an entity never renumbers the survivors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved raw value meaning "no entity". Never allocated.
    pub const NONE: Self = Self(0);

    /// First id handed out by a fresh registry.
    pub const FIRST: Self = Self(1);

    pub fn raw(self) -> u32 {
        self.0
    }

    /// The id that follows this one in allocation order, `None` once the
    /// id space is used up.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: rotation, position, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: Quat,
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform moved to `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Model matrix `translate(position) * rotate(rotation) * scale(scale)`.
    ///
    /// Composed on every call; there is no cached matrix to fall out of sync
    /// with the fields.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.position.is_finite() && self.scale.is_finite()
    }
}

/// Kind of model an entity renders. Stored in level files as a `u32` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum ModelType {
    Ball = 0,
    Maze = 1,
}

/// A model tag read from outside the program did not name a known model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown model type tag {0}")]
pub struct UnknownModelType(pub u32);

impl ModelType {
    pub const ALL: [ModelType; 2] = [ModelType::Ball, ModelType::Maze];

    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Maze => "maze",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

impl TryFrom<u32> for ModelType {
    type Error = UnknownModelType;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Ball),
            1 => Ok(Self::Maze),
            other => Err(UnknownModelType(other)),
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Detailed, display-ready info about a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub model: Option<ModelType>,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub shape_count: usize,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let model = self.model.map_or("none", ModelType::name);
        write!(
            f,
            "Entity {} [{}] pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2}) shapes={}",
            self.id,
            model,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
            self.shape_count,
        )
    }
}
