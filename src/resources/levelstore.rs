//! Level registry.
//!
//! A level is plain JSON: obstacle rectangles grouped by layer name, plus the
//! object descriptors the [level loader](crate::levelloader) turns into
//! entities.
//!
//! ```json
//! {
//!   "name": "meadow",
//!   "obstacles": { "solid": [{"x":0,"y":320,"width":640,"height":48}] },
//!   "objects": [
//!     {"kind":"player","x":32,"y":280},
//!     {"kind":"fruit","x":120,"y":260,"properties":{"fruitType":"orange"}}
//!   ]
//! }
//! ```
//!
//! [`LevelStore`] keeps the levels in order and wraps around at both ends.

use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::math::Rect;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no levels available")]
    Empty,
    #[error("level index {index} out of range ({count} levels)")]
    MissingLevel { index: usize, count: usize },
}

/// One placed object. Property values are kept as strings and interpreted
/// by the level loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub properties: FxHashMap<String, String>,
}

impl ObjectDescriptor {
    pub fn new(kind: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
            properties: FxHashMap::default(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub obstacles: BTreeMap<String, Vec<Rect>>,
    #[serde(default)]
    pub objects: Vec<ObjectDescriptor>,
}

impl LevelData {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let file = File::open(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| LevelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Ordered list of levels.
#[derive(Debug, Clone, Default)]
pub struct LevelStore {
    levels: Vec<LevelData>,
}

impl LevelStore {
    pub fn new(levels: Vec<LevelData>) -> Self {
        Self { levels }
    }

    /// Load every `*.json` file of `dir`, sorted by file name.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LevelError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| LevelError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LevelError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut levels = Vec::with_capacity(paths.len());
        for path in &paths {
            let mut level = LevelData::load(path)?;
            if level.name.is_empty() {
                level.name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            levels.push(level);
        }
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        info!("Loaded {} levels from {:?}", levels.len(), dir);
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&LevelData, LevelError> {
        self.levels.get(index).ok_or(LevelError::MissingLevel {
            index,
            count: self.levels.len(),
        })
    }

    /// Index after `index`, wrapping to the first level.
    pub fn next_index(&self, index: usize) -> Result<usize, LevelError> {
        if self.levels.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok((index + 1) % self.levels.len())
    }

    /// Index before `index`, wrapping to the last level.
    pub fn previous_index(&self, index: usize) -> Result<usize, LevelError> {
        if self.levels.is_empty() {
            return Err(LevelError::Empty);
        }
        let count = self.levels.len();
        Ok((index % count + count - 1) % count)
    }
}
