use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::{AssetId, AssetLoader, LoadError, ModelTemplate};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const GLB_JSON_CHUNK: u32 = 0x4E4F_534A;

/// Loads `.glb` / `.gltf` models from a directory on disk.
///
/// Only the glTF container and its JSON metadata are checked; geometry is
/// left to the renderer. Files are read with blocking `std::fs` calls, so the
/// returned future does its I/O on the thread that polls it.
#[derive(Debug, Clone)]
pub struct FsModelLoader {
    root: PathBuf,
}

impl FsModelLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLoader for FsModelLoader {
    async fn load(&self, path: &str) -> Result<ModelTemplate, LoadError> {
        let full = self.root.join(path);
        let bytes = std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_string()),
            _ => LoadError::Io {
                path: full.clone(),
                reason: e.to_string(),
            },
        })?;
        parse_model(path, &bytes)
    }
}

/// In-memory loader with scripted results, for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: BTreeMap<String, Result<ModelTemplate, String>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, path: impl Into<String>, template: ModelTemplate) -> Self {
        self.entries.insert(path.into(), Ok(template));
        self
    }

    pub fn with_placeholder(self, path: impl Into<String>) -> Self {
        let path = path.into();
        let template = ModelTemplate::placeholder(path.clone());
        self.with_template(path, template)
    }

    /// Make loading `path` fail with an invalid-model error.
    pub fn with_failure(mut self, path: impl Into<String>, reason: impl Into<String>) -> Self {
        self.entries.insert(path.into(), Err(reason.into()));
        self
    }
}

impl AssetLoader for MemoryLoader {
    async fn load(&self, path: &str) -> Result<ModelTemplate, LoadError> {
        match self.entries.get(path) {
            Some(Ok(template)) => Ok(template.clone()),
            Some(Err(reason)) => Err(LoadError::InvalidModel {
                path: path.to_string(),
                reason: reason.clone(),
            }),
            None => Err(LoadError::NotFound(path.to_string())),
        }
    }
}

/// Build a template from glTF bytes: binary GLB or plain JSON.
fn parse_model(path: &str, bytes: &[u8]) -> Result<ModelTemplate, LoadError> {
    let invalid = |reason: String| LoadError::InvalidModel {
        path: path.to_string(),
        reason,
    };

    let json_bytes = if bytes.starts_with(GLB_MAGIC) {
        glb_json_chunk(bytes).ok_or_else(|| invalid("malformed GLB container".into()))?
    } else {
        bytes
    };

    let json: serde_json::Value =
        serde_json::from_slice(json_bytes).map_err(|e| invalid(e.to_string()))?;
    if json.get("asset").is_none() {
        return Err(invalid("missing glTF asset block".into()));
    }

    let meshes = json
        .get("meshes")
        .and_then(|m| m.as_array())
        .map(|meshes| {
            meshes
                .iter()
                .enumerate()
                .map(|(i, mesh)| {
                    mesh.get("name")
                        .and_then(|n| n.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("mesh_{i}"))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ModelTemplate {
        id: AssetId::of_bytes(bytes),
        source: path.to_string(),
        meshes,
    })
}

/// Slice out the JSON chunk of a GLB file (12-byte header, then chunk 0).
fn glb_json_chunk(bytes: &[u8]) -> Option<&[u8]> {
    let word = |at: usize| {
        bytes
            .get(at..at + 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    };
    if word(4)? != GLB_VERSION || word(16)? != GLB_JSON_CHUNK {
        return None;
    }
    let len = word(12)? as usize;
    bytes.get(20..20usize.checked_add(len)?)
}
