//! Level persistence.
//!
//! Two on-disk formats share the `.level` extension:
//! ```text
//! legacy     u32 count, then per entity: transform (104 bytes: cached
//!            model matrix, rotation, position, scale), u64 shape count,
//!            current boxes, initial boxes, u32 model tag.
//!            Native byte order, no header.
//! versioned  "LLVL" | u32 version | u64 payload len | sha256(payload)
//!            payload = zstd(cbor(LevelData)), header little-endian
//! ```
//! `decode` picks the format from the leading magic.
//!
//! # Invariants
//! - A level is decoded completely before anything is handed back; a
//!   truncated or corrupt file never yields a partial level.
//! - `LevelStore::save` never leaves a half-written file under the final
//!   name.

pub mod legacy;
pub mod level;
pub mod store;
pub mod versioned;

pub use level::{LevelData, LevelRecord, PreparedLevel};
pub use store::LevelStore;

use lain_assets::AssetError;
use lain_common::UnknownModelType;
use lain_ecs::ShapeListMismatch;
use serde::{Deserialize, Serialize};

/// Errors from level encoding, decoding and storage.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid level name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("level data truncated at byte {offset}: needed {needed} more bytes")]
    Truncated { offset: usize, needed: usize },
    #[error("{0} unexpected bytes after the last entity")]
    TrailingBytes(usize),
    #[error("bad magic: not a versioned level file")]
    BadMagic,
    #[error("unsupported level version: file has v{found}, expected v{expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("CBOR serialization error: {0}")]
    CborEncode(String),
    #[error("CBOR deserialization error: {0}")]
    CborDecode(String),
    #[error(transparent)]
    UnknownModel(#[from] UnknownModelType),
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeListMismatch),
    #[error("too many entities for the legacy format: {0}")]
    TooManyEntities(usize),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// On-disk level format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelFormat {
    /// Raw struct dump compatible with existing level files.
    Legacy,
    #[default]
    Versioned,
}

impl LevelFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Versioned => "versioned",
        }
    }
}

impl std::fmt::Display for LevelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which format `bytes` is in, judged by the leading magic.
pub fn detect_format(bytes: &[u8]) -> LevelFormat {
    if bytes.starts_with(&versioned::MAGIC) {
        LevelFormat::Versioned
    } else {
        LevelFormat::Legacy
    }
}

pub fn encode(level: &LevelData, format: LevelFormat) -> Result<Vec<u8>, LevelError> {
    match format {
        LevelFormat::Legacy => legacy::encode(level),
        LevelFormat::Versioned => versioned::encode(level),
    }
}

/// Decode a level in either format.
pub fn decode(bytes: &[u8]) -> Result<LevelData, LevelError> {
    match detect_format(bytes) {
        LevelFormat::Legacy => legacy::decode(bytes),
        LevelFormat::Versioned => versioned::decode(bytes),
    }
}

pub fn crate_info() -> &'static str {
    "lain-persist v0.1.0"
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::{LevelData, LevelRecord};
    use glam::{Quat, Vec3};
    use lain_common::{Aabb, ModelType, Transform};

    pub fn sample_level() -> LevelData {
        let unit = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        LevelData {
            records: vec![
                LevelRecord {
                    transform: Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
                    current: vec![unit.transformed(&glam::Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)))],
                    initial: vec![unit],
                    model: ModelType::Ball,
                },
                LevelRecord {
                    transform: Transform {
                        rotation: Quat::from_rotation_y(0.5),
                        position: Vec3::new(-4.0, 0.0, 0.5),
                        scale: Vec3::new(2.0, 1.0, 2.0),
                    },
                    current: vec![unit, unit],
                    initial: vec![unit, unit],
                    model: ModelType::Maze,
                },
                LevelRecord {
                    transform: Transform::default(),
                    current: vec![],
                    initial: vec![],
                    model: ModelType::Ball,
                },
            ],
        }
    }
}
