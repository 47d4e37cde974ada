//! Avatar rig
//!
//! Wires configuration and templates to the model-loaded event. A rig
//! inflates exactly one model; the handler fires once per rig.

use crate::animation::{AnimationClip, ClipBinding};
use crate::config::RigConfig;
use crate::entity::{InflatedEntity, TemplateRegistry};
use crate::error::{Result, RigError};
use crate::inflate::{InflateStats, Inflator};
use crate::loader::{load_model, LoadedModel};
use crate::scene::SceneNode;
use std::path::Path;
use tracing::{debug, info};

/// Payload of the model-loaded event
///
/// Clones share node identities; inflate a [`SceneNode::duplicate`] of the
/// root when a second rig needs its own.
#[derive(Clone, Debug)]
pub struct ModelLoaded {
    /// Loaded hierarchy, rooted at a node named `"Scene"`
    pub root: SceneNode,
    /// Clips shipped with the model
    pub clips: Vec<AnimationClip>,
}

impl From<LoadedModel> for ModelLoaded {
    fn from(model: LoadedModel) -> Self {
        Self {
            root: model.root,
            clips: model.clips,
        }
    }
}

/// One avatar: configuration, templates and, once loaded, its entity tree
pub struct AvatarRig {
    config: RigConfig,
    templates: TemplateRegistry,
    handled: bool,
    stats: InflateStats,
    clips: Vec<AnimationClip>,
}

impl AvatarRig {
    /// Create a rig, registering the configured templates
    pub fn new(config: RigConfig) -> Result<Self> {
        let templates = TemplateRegistry::from_templates(config.templates.iter().cloned())?;
        Ok(Self {
            config,
            templates,
            handled: false,
            stats: InflateStats::default(),
            clips: Vec::new(),
        })
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Mutable configuration; visibility flags are read at inflation time
    pub fn config_mut(&mut self) -> &mut RigConfig {
        &mut self.config
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Mutable template registry, for templates registered at runtime
    pub fn templates_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.templates
    }

    /// Whether the model-loaded event was handled
    pub fn is_loaded(&self) -> bool {
        self.handled
    }

    /// Counters of the inflation run
    pub fn stats(&self) -> InflateStats {
        self.stats
    }

    /// Clips kept from the loaded model
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// Handle the model-loaded event
    ///
    /// Returns the entity tree to attach under the host's avatar entity, or
    /// `None` if nothing in the model qualified. A second event for the same
    /// rig is rejected.
    pub fn handle_model_loaded(&mut self, event: ModelLoaded) -> Result<Option<InflatedEntity>> {
        if self.handled {
            return Err(RigError::AlreadyInflated);
        }
        self.handled = true;

        let mut inflator = Inflator::new(&self.config, &self.templates);
        let entity = inflator.inflate(event.root);
        self.stats = inflator.stats();
        self.clips = event.clips;

        if let Some(root) = &entity {
            info!(
                entities = root.count(),
                clips = self.clips.len(),
                "avatar model inflated"
            );
        }
        Ok(entity)
    }

    /// Load a model file and handle it
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Option<InflatedEntity>> {
        let model = load_model(path)?;
        self.handle_model_loaded(model.into())
    }

    /// Resolve every kept clip against an entity tree
    pub fn bind_clips(&self, root: &InflatedEntity) -> Vec<ClipBinding> {
        let bindings: Vec<ClipBinding> = self
            .clips
            .iter()
            .map(|clip| ClipBinding::resolve(clip, root))
            .collect();
        debug!(clips = bindings.len(), "bound clips");
        bindings
    }
}
