//! Directory of named level files.
//!
//! Layout inside the store directory:
//! ```text
//! <name>.level          - one file per level, legacy or versioned format
//! .<name>.level.tmp     - in-flight save, renamed over <name>.level
//! ```

use crate::{LevelData, LevelError, LevelFormat};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LEVEL_EXTENSION: &str = "level";

/// Longest accepted level name, in bytes.
pub const MAX_NAME_LEN: usize = 31;

/// File-backed level store rooted at a directory.
#[derive(Debug, Clone)]
pub struct LevelStore {
    root: PathBuf,
}

impl LevelStore {
    /// The directory is created on first save, not here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Level names must be non-empty, at most 31 bytes, free of whitespace
    /// and path separators, and not `.` or `..`.
    pub fn validate_name(name: &str) -> Result<(), LevelError> {
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name.len() > MAX_NAME_LEN {
            Some("name is longer than 31 bytes")
        } else if name.chars().any(char::is_whitespace) {
            Some("name contains whitespace")
        } else if name.contains(['/', '\\']) {
            Some("name contains a path separator")
        } else if name == "." || name == ".." {
            Some("name is a relative path component")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(LevelError::InvalidName {
                name: name.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// `<root>/<name>.level`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, LevelError> {
        Self::validate_name(name)?;
        Ok(self.root.join(format!("{name}.{LEVEL_EXTENSION}")))
    }

    /// Encode and write a level. The bytes go to a temporary file that is
    /// renamed over the target, so a failed save leaves any previous file
    /// intact.
    pub fn save(&self, name: &str, level: &LevelData, format: LevelFormat) -> Result<PathBuf, LevelError> {
        let path = self.path_for(name)?;
        let bytes = crate::encode(level, format)?;

        std::fs::create_dir_all(&self.root)?;
        let tmp = self.root.join(format!(".{name}.{LEVEL_EXTENSION}.tmp"));
        let written = std::fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| std::fs::rename(&tmp, &path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::info!(
            level = name,
            %format,
            entities = level.len(),
            bytes = bytes.len(),
            "level saved"
        );
        Ok(path)
    }

    /// Read and fully decode a level.
    pub fn load(&self, name: &str) -> Result<LevelData, LevelError> {
        self.load_with_format(name).map(|(level, _)| level)
    }

    /// Like `load`, also reporting which format the file was in.
    pub fn load_with_format(&self, name: &str) -> Result<(LevelData, LevelFormat), LevelError> {
        let path = self.path_for(name)?;
        let bytes = std::fs::read(&path)?;
        let format = crate::detect_format(&bytes);
        let level = crate::decode(&bytes)?;
        tracing::info!(level = name, %format, entities = level.len(), "level loaded");
        Ok((level, format))
    }

    /// Names of every level in the store, sorted. A missing directory is an
    /// empty store.
    pub fn list(&self) -> Result<Vec<String>, LevelError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LEVEL_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if Self::validate_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
