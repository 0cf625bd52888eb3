//! Headerless level layout written by earlier editor builds.
//!
//! All integers and floats are in native byte order. Each transform carries
//! its cached model matrix (16 floats, column-major) ahead of the rotation;
//! quaternions are stored x, y, z, w. The cached matrix is rebuilt from the
//! components on load.

use crate::{LevelData, LevelError, LevelRecord};
use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};
use lain_common::{Aabb, ModelType, Transform};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct RawTransform {
    model: [f32; 16],
    rotation: [f32; 4],
    position: [f32; 3],
    scale: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct RawAabb {
    min: [f32; 3],
    max: [f32; 3],
}

const _: () = assert!(size_of::<RawTransform>() == 104);
const _: () = assert!(size_of::<RawAabb>() == 24);

impl From<&Transform> for RawTransform {
    fn from(t: &Transform) -> Self {
        Self {
            model: t.model_matrix().to_cols_array(),
            rotation: t.rotation.to_array(),
            position: t.position.to_array(),
            scale: t.scale.to_array(),
        }
    }
}

impl From<RawTransform> for Transform {
    fn from(raw: RawTransform) -> Self {
        Self {
            rotation: Quat::from_array(raw.rotation),
            position: Vec3::from_array(raw.position),
            scale: Vec3::from_array(raw.scale),
        }
    }
}

impl From<&Aabb> for RawAabb {
    fn from(b: &Aabb) -> Self {
        Self {
            min: b.min.to_array(),
            max: b.max.to_array(),
        }
    }
}

impl From<RawAabb> for Aabb {
    fn from(raw: RawAabb) -> Self {
        Aabb::new(Vec3::from_array(raw.min), Vec3::from_array(raw.max))
    }
}

pub fn encode(level: &LevelData) -> Result<Vec<u8>, LevelError> {
    let count = u32::try_from(level.records.len()).map_err(|_| LevelError::TooManyEntities(level.records.len()))?;
    let mut out = Vec::new();
    out.extend_from_slice(bytemuck::bytes_of(&count));

    for record in &level.records {
        if record.current.len() != record.initial.len() {
            return Err(lain_ecs::ShapeListMismatch {
                current: record.current.len(),
                initial: record.initial.len(),
            }
            .into());
        }
        out.extend_from_slice(bytemuck::bytes_of(&RawTransform::from(&record.transform)));
        out.extend_from_slice(bytemuck::bytes_of(&(record.initial.len() as u64)));
        let current: Vec<RawAabb> = record.current.iter().map(RawAabb::from).collect();
        let initial: Vec<RawAabb> = record.initial.iter().map(RawAabb::from).collect();
        out.extend_from_slice(bytemuck::cast_slice(&current));
        out.extend_from_slice(bytemuck::cast_slice(&initial));
        out.extend_from_slice(bytemuck::bytes_of(&record.model.tag()));
    }
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<LevelData, LevelError> {
    let mut reader = Reader::new(bytes);
    let count: u32 = reader.read()?;
    // Each entity needs at least a transform, a shape count and a tag.
    let min_entity = size_of::<RawTransform>() + size_of::<u64>() + size_of::<u32>();
    let mut records = Vec::with_capacity((count as usize).min(reader.remaining() / min_entity));

    for _ in 0..count {
        let transform = Transform::from(reader.read::<RawTransform>()?);
        let shapes: u64 = reader.read()?;
        let current = reader.read_many::<RawAabb>(shapes)?;
        let initial = reader.read_many::<RawAabb>(shapes)?;
        let model = ModelType::try_from(reader.read::<u32>()?)?;
        records.push(LevelRecord {
            transform,
            current: current.into_iter().map(Aabb::from).collect(),
            initial: initial.into_iter().map(Aabb::from).collect(),
            model,
        });
    }

    if reader.remaining() != 0 {
        return Err(LevelError::TrailingBytes(reader.remaining()));
    }
    Ok(LevelData { records })
}

/// Bounds-checked cursor over a byte slice.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], LevelError> {
        if len > self.remaining() {
            return Err(LevelError::Truncated {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read<T: Pod>(&mut self) -> Result<T, LevelError> {
        self.take(size_of::<T>()).map(bytemuck::pod_read_unaligned)
    }

    fn read_many<T: Pod>(&mut self, count: u64) -> Result<Vec<T>, LevelError> {
        let size = size_of::<T>();
        let len = usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(size))
            .ok_or(LevelError::Truncated {
                offset: self.pos,
                needed: usize::MAX,
            })?;
        let bytes = self.take(len)?;
        Ok(bytes.chunks_exact(size).map(bytemuck::pod_read_unaligned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_level;

    #[test]
    fn layout_matches_field_sizes() {
        let level = sample_level();
        let bytes = encode(&level).unwrap();
        // count + per entity (transform + u64 + 2 * n * 24 + tag)
        let expected = 4 + (104 + 8 + 2 * 24 + 4) + (104 + 8 + 4 * 24 + 4) + (104 + 8 + 4);
        assert_eq!(bytes.len(), expected);
        assert_eq!(&bytes[..4], &3u32.to_ne_bytes());
        // Cached model matrix first, column-major: translation in column 3.
        assert_eq!(&bytes[4..8], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[52..56], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[56..60], &2.0f32.to_ne_bytes());
        assert_eq!(&bytes[60..64], &3.0f32.to_ne_bytes());
        // Rotation quaternion follows, x first.
        assert_eq!(&bytes[68..72], &0.0f32.to_ne_bytes());
        assert_eq!(&bytes[80..84], &1.0f32.to_ne_bytes());
        // Then position.
        assert_eq!(&bytes[84..88], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn shapeless_entity_takes_120_bytes() {
        let level = LevelData {
            records: vec![LevelRecord {
                transform: Transform::default(),
                current: vec![],
                initial: vec![],
                model: ModelType::Maze,
            }],
        };
        assert_eq!(encode(&level).unwrap().len(), 120);
    }

    fn push_floats(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_ne_bytes());
        }
    }

    #[test]
    fn decodes_hand_built_file() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_ne_bytes());
        #[rustfmt::skip]
        let model = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            1.0, 2.0, 3.0, 1.0,
        ];
        push_floats(&mut bytes, &model);
        push_floats(&mut bytes, &[0.0, 0.0, 0.0, 1.0]);
        push_floats(&mut bytes, &[1.0, 2.0, 3.0]);
        push_floats(&mut bytes, &[1.0, 1.0, 1.0]);
        bytes.extend_from_slice(&1u64.to_ne_bytes());
        push_floats(&mut bytes, &[0.0, 1.0, 2.0, 2.0, 3.0, 4.0]);
        push_floats(&mut bytes, &[-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]);
        bytes.extend_from_slice(&0u32.to_ne_bytes());
        assert_eq!(bytes.len(), 168);

        let level = decode(&bytes).unwrap();
        assert_eq!(level.len(), 1);
        let record = &level.records[0];
        assert_eq!(record.transform, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(record.current, vec![Aabb::new(Vec3::new(0.0, 1.0, 2.0), Vec3::new(2.0, 3.0, 4.0))]);
        assert_eq!(record.initial, vec![Aabb::new(Vec3::splat(-1.0), Vec3::ONE)]);
        assert_eq!(record.model, ModelType::Ball);
        assert_eq!(encode(&level).unwrap(), bytes);
    }

    #[test]
    fn round_trip() {
        let level = sample_level();
        let decoded = decode(&encode(&level).unwrap()).unwrap();
        assert_eq!(decoded, level);
    }

    #[test]
    fn empty_level() {
        let bytes = encode(&LevelData::default()).unwrap();
        assert_eq!(bytes, 0u32.to_ne_bytes());
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn every_truncation_is_rejected() {
        let bytes = encode(&sample_level()).unwrap();
        for len in 0..bytes.len() {
            let err = decode(&bytes[..len]).unwrap_err();
            assert!(matches!(err, LevelError::Truncated { .. }), "len {len}: {err}");
        }
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode(&sample_level()).unwrap();
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(LevelError::TrailingBytes(1))));
    }

    #[test]
    fn unknown_model_tag_is_rejected() {
        let mut bytes = encode(&sample_level()).unwrap();
        let last = bytes.len() - 4;
        bytes[last..].copy_from_slice(&7u32.to_ne_bytes());
        assert!(matches!(decode(&bytes), Err(LevelError::UnknownModel(_))));
    }

    #[test]
    fn absurd_shape_count_does_not_allocate() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_ne_bytes());
        bytes.extend_from_slice(&[0u8; 104]);
        bytes.extend_from_slice(&u64::MAX.to_ne_bytes());
        assert!(matches!(decode(&bytes), Err(LevelError::Truncated { .. })));
    }
}
