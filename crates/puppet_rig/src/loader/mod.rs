//! Model loaders
//!
//! Loaders turn a model file into a [`SceneNode`] hierarchy rooted at a node
//! named `"Scene"`, ready for inflation, plus the clips the file carries.
//!
//! - glTF 2.0 (`.gltf`, `.glb`) - Feature: `gltf`
//!
//! # Example
//!
//! ```ignore
//! use puppet_rig::loader::ModelLoaderRegistry;
//!
//! let model = ModelLoaderRegistry::new().load("avatars/default.glb")?;
//! println!("{} nodes, {} clips", model.root.count(), model.clips.len());
//! ```

#[cfg(feature = "gltf")]
mod gltf;

#[cfg(feature = "gltf")]
pub use self::gltf::GltfLoader;

use crate::animation::AnimationClip;
use crate::scene::SceneNode;
use std::path::{Path, PathBuf};

/// Error type for model loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    /// No loader handles the extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Structurally invalid model
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(err.to_string())
        } else {
            LoadError::Io(err)
        }
    }
}

/// A loaded model
///
/// Clones share node identities with the source; see [`SceneNode::duplicate`].
#[derive(Clone, Debug)]
pub struct LoadedModel {
    /// Source file
    pub source_path: PathBuf,
    /// Node hierarchy, rooted at a node named `"Scene"`
    pub root: SceneNode,
    /// Animation clips
    pub clips: Vec<AnimationClip>,
}

impl LoadedModel {
    pub fn new(root: SceneNode) -> Self {
        Self {
            source_path: PathBuf::new(),
            root,
            clips: Vec::new(),
        }
    }
}

/// Trait for model loaders
pub trait ModelLoader: Send + Sync {
    /// Load a model from a file path
    fn load(&self, path: &Path) -> Result<LoadedModel, LoadError>;

    /// Supported file extensions
    fn supported_extensions(&self) -> &[&str];

    /// Check if this loader can handle the given extension
    fn can_load(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Loader name for debugging
    fn name(&self) -> &'static str;
}

/// Registry of available model loaders, picked by file extension
pub struct ModelLoaderRegistry {
    loaders: Vec<Box<dyn ModelLoader>>,
}

impl ModelLoaderRegistry {
    /// Create a registry with every loader enabled by features
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut loaders: Vec<Box<dyn ModelLoader>> = Vec::new();

        #[cfg(feature = "gltf")]
        loaders.push(Box::new(GltfLoader::new()));

        Self { loaders }
    }

    /// Create a registry with no loaders
    pub fn empty() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Register a custom loader; later registrations are tried last
    pub fn register(&mut self, loader: Box<dyn ModelLoader>) {
        self.loaders.push(loader);
    }

    /// Load a model file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedModel, LoadError> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let loader = self
            .loaders
            .iter()
            .find(|l| l.can_load(extension))
            .ok_or_else(|| LoadError::UnsupportedFormat(extension.to_string()))?;

        tracing::debug!(path = %path.display(), loader = loader.name(), "loading model");
        loader.load(path)
    }

    /// Check if a format is supported
    pub fn supports_format(&self, extension: &str) -> bool {
        self.loaders.iter().any(|l| l.can_load(extension))
    }

    /// All supported extensions
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.loaders
            .iter()
            .flat_map(|l| l.supported_extensions().iter().copied())
            .collect()
    }
}

impl Default for ModelLoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a model file with the default loaders
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedModel, LoadError> {
    ModelLoaderRegistry::new().load(path)
}
