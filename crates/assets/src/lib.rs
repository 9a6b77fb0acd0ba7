//! Model loading: content-addressed model templates behind an async loader trait.
//!
//! The game treats every model as an opaque prototype that is cloned into the
//! scene. Loading is the only suspension point of a session: all required
//! models are awaited together and any failure aborts startup.

mod loader;

pub use loader::{FsModelLoader, MemoryLoader};

use sha2::{Digest, Sha256};
use skyrun_common::ModelManifest;
use std::future::Future;
use std::path::PathBuf;
use tracing::Instrument;

/// Content-addressed model id computed from the model bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

/// A loaded, clonable model prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTemplate {
    pub id: AssetId,
    /// Path the template was loaded from.
    pub source: String,
    /// Mesh names found in the model metadata.
    pub meshes: Vec<String>,
}

impl ModelTemplate {
    /// A stand-in model with no file behind it.
    pub fn placeholder(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            id: AssetId::of_bytes(source.as_bytes()),
            meshes: vec![format!("{source}_mesh")],
            source,
        }
    }
}

/// Errors from loading a model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {}", .path.display(), .reason)]
    Io { path: PathBuf, reason: String },
    #[error("model not found: {0}")]
    NotFound(String),
    #[error("invalid model {path}: {reason}")]
    InvalidModel { path: String, reason: String },
}

/// Source of model templates.
///
/// Implementations resolve a path to a template asynchronously. The session
/// never inspects templates beyond cloning them into scene nodes.
pub trait AssetLoader {
    fn load(&self, path: &str) -> impl Future<Output = Result<ModelTemplate, LoadError>>;
}

/// Every model a session needs before it can start.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModels {
    pub player: ModelTemplate,
    /// Enemy archetypes, indexed by archetype number.
    pub enemies: Vec<ModelTemplate>,
}

/// Load the player and all enemy archetypes named in the manifest.
///
/// Models load one after another in manifest order, player first. The first
/// failure is returned, later models are not requested and no partial set is
/// produced. No load is retried.
pub async fn load_models<L: AssetLoader>(
    loader: &L,
    manifest: &ModelManifest,
) -> Result<LoadedModels, LoadError> {
    let span = tracing::info_span!("load_models", enemies = manifest.enemies.len());
    async move {
        let player = loader.load(&manifest.player).await?;
        tracing::debug!(source = %player.source, "player model loaded");

        let mut archetypes = Vec::with_capacity(manifest.enemies.len());
        for path in &manifest.enemies {
            let template = loader.load(path).await?;
            tracing::debug!(
                source = %template.source,
                index = archetypes.len(),
                "enemy model loaded"
            );
            archetypes.push(template);
        }

        tracing::info!(archetypes = archetypes.len(), "all models loaded");
        Ok(LoadedModels {
            player,
            enemies: archetypes,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> ModelManifest {
        ModelManifest {
            player: "player.glb".into(),
            enemies: vec!["e1.glb".into(), "e2.glb".into()],
        }
    }

    #[test]
    fn asset_id_is_content_addressed() {
        assert_eq!(AssetId::of_bytes(b"abc"), AssetId::of_bytes(b"abc"));
        assert_ne!(AssetId::of_bytes(b"abc"), AssetId::of_bytes(b"abd"));
    }

    #[test]
    fn loads_all_models_in_manifest_order() {
        let loader = MemoryLoader::new()
            .with_placeholder("player.glb")
            .with_placeholder("e1.glb")
            .with_placeholder("e2.glb");
        let models = pollster::block_on(load_models(&loader, &manifest())).unwrap();
        assert_eq!(models.player.source, "player.glb");
        let sources: Vec<&str> = models.enemies.iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, ["e1.glb", "e2.glb"]);
    }

    #[test]
    fn one_failure_aborts_the_whole_set() {
        let loader = MemoryLoader::new()
            .with_placeholder("player.glb")
            .with_placeholder("e1.glb")
            .with_failure("e2.glb", "corrupt");
        let err = pollster::block_on(load_models(&loader, &manifest())).unwrap_err();
        assert!(matches!(err, LoadError::InvalidModel { ref path, .. } if path == "e2.glb"));
    }

    #[test]
    fn missing_model_is_not_found() {
        let loader = MemoryLoader::new().with_placeholder("player.glb");
        let err = pollster::block_on(load_models(&loader, &manifest())).unwrap_err();
        assert_eq!(err, LoadError::NotFound("e1.glb".into()));
    }

    #[test]
    fn empty_enemy_list_is_allowed() {
        let loader = MemoryLoader::new().with_placeholder("player.glb");
        let manifest = ModelManifest {
            player: "player.glb".into(),
            enemies: Vec::new(),
        };
        let models = pollster::block_on(load_models(&loader, &manifest)).unwrap();
        assert!(models.enemies.is_empty());
    }

    struct RecordingLoader {
        inner: MemoryLoader,
        requested: std::cell::RefCell<Vec<String>>,
    }

    impl AssetLoader for RecordingLoader {
        async fn load(&self, path: &str) -> Result<ModelTemplate, LoadError> {
            self.requested.borrow_mut().push(path.to_string());
            self.inner.load(path).await
        }
    }

    #[test]
    fn loads_run_in_order_and_stop_at_first_failure() {
        let loader = RecordingLoader {
            inner: MemoryLoader::new()
                .with_placeholder("player.glb")
                .with_failure("e1.glb", "corrupt")
                .with_placeholder("e2.glb"),
            requested: Default::default(),
        };
        assert!(pollster::block_on(load_models(&loader, &manifest())).is_err());
        assert_eq!(*loader.requested.borrow(), ["player.glb", "e1.glb"]);
    }
}
