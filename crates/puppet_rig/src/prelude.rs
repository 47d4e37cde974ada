//! Prelude module for common imports
//!
//! ```rust,ignore
//! use puppet_rig::prelude::*;
//! ```

// Core math
pub use puppet_core::{Euler, EulerOrder, Identity, Mat4, Quat, Vec3};

// Configuration
pub use crate::config::{BodyPart, PartTable, RigConfig, VisibilityConfig};

// Scene
pub use crate::scene::{LocalTransform, NodeKind, SceneNode, ROOT_NODE_NAME};

// Entities
pub use crate::entity::{
    EntityFragment, EntityOutline, EntityTemplate, InflatedEntity, NoTemplates, TemplateRegistry,
    TemplateSource,
};

// Inflation
pub use crate::inflate::{inflate, InflateStats, Inflation, Inflator};

// Loading
pub use crate::loader::{LoadError, LoadedModel, ModelLoader, ModelLoaderRegistry};

// Animation
pub use crate::animation::{AnimationClip, BindingTarget, ClipBinding, ClipTrack};

// Systems
pub use crate::systems::{TransformChanged, WorldTransformTracker};

// Audio
pub use crate::audio::{Loudness, LoudnessMeter};

// Rig
pub use crate::rig::{AvatarRig, ModelLoaded};

// Errors
pub use crate::error::RigError;
