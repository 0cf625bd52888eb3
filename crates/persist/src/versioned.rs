//! Self-describing level container.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "LLVL"
//! 4       4     format version (u32 LE)
//! 8       8     payload length (u64 LE)
//! 16      32    sha256 of the payload
//! 48      n     payload: zstd-compressed CBOR of LevelData
//! ```

use crate::{LevelData, LevelError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};

pub const MAGIC: [u8; 4] = *b"LLVL";
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 4 + 4 + 8 + 32;

pub fn encode(level: &LevelData) -> Result<Vec<u8>, LevelError> {
    let cbor_bytes = cbor_serialize(level)?;
    let payload = zstd_compress(&cbor_bytes)?;
    let digest = sha256(&payload);

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&digest);
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> Result<LevelData, LevelError> {
    if bytes.len() < HEADER_LEN {
        if !MAGIC.starts_with(&bytes[..bytes.len().min(MAGIC.len())]) {
            return Err(LevelError::BadMagic);
        }
        return Err(LevelError::Truncated {
            offset: bytes.len(),
            needed: HEADER_LEN - bytes.len(),
        });
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    if header[..4] != MAGIC {
        return Err(LevelError::BadMagic);
    }

    let version = u32::from_le_bytes(field(header, 4));
    if version != VERSION {
        return Err(LevelError::UnsupportedVersion {
            found: version,
            expected: VERSION,
        });
    }

    let declared = u64::from_le_bytes(field(header, 8));
    let actual = body.len() as u64;
    if declared > actual {
        return Err(LevelError::Truncated {
            offset: bytes.len(),
            needed: usize::try_from(declared - actual).unwrap_or(usize::MAX),
        });
    }
    if declared < actual {
        return Err(LevelError::TrailingBytes((actual - declared) as usize));
    }

    let expected: [u8; 32] = field(header, 16);
    let digest = sha256(body);
    if digest != expected {
        return Err(LevelError::ChecksumMismatch {
            expected: hex(&expected),
            actual: hex(&digest),
        });
    }

    let cbor_bytes = zstd_decompress(body)?;
    cbor_deserialize(&cbor_bytes)
}

fn field<const N: usize>(header: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&header[offset..offset + N]);
    out
}

fn cbor_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, LevelError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| LevelError::CborEncode(e.to_string()))?;
    Ok(buf)
}

fn cbor_deserialize<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, LevelError> {
    ciborium::from_reader(data).map_err(|e| LevelError::CborDecode(e.to_string()))
}

fn zstd_compress(data: &[u8]) -> Result<Vec<u8>, LevelError> {
    let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn zstd_decompress(data: &[u8]) -> Result<Vec<u8>, LevelError> {
    let mut decoder = zstd::Decoder::new(data)?;
    let mut buf = Vec::new();
    decoder.read_to_end(&mut buf)?;
    Ok(buf)
}

fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
