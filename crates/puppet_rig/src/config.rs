//! Rig configuration
//!
//! Loaded from `puppet.toml`. Every section is optional:
//!
//! ```toml
//! [visibility]
//! hands = false
//!
//! [parts]
//! Wolf3D_Hands = "hands"
//! Wolf3D_Shirt = "shirt"
//! Wolf3D_Glasses = "head"
//!
//! [[templates]]
//! name = "RightEye"
//! [[templates.content]]
//! classes = ["eye"]
//!
//! [listener]
//! epsilon = 0.001
//!
//! [loudness]
//! threshold_db = -45.0
//! ```

use crate::entity::EntityTemplate;
use crate::error::{Result, RigError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Body part a mesh node belongs to, for visibility toggling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPart {
    Hands,
    Shirt,
    #[default]
    Head,
}

/// Visibility flags per body part
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityConfig {
    #[serde(default = "default_true")]
    pub hands: bool,
    #[serde(default = "default_true")]
    pub shirt: bool,
    #[serde(default = "default_true")]
    pub head: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            hands: true,
            shirt: true,
            head: true,
        }
    }
}

impl VisibilityConfig {
    /// Flag for a body part
    pub fn is_visible(&self, part: BodyPart) -> bool {
        match part {
            BodyPart::Hands => self.hands,
            BodyPart::Shirt => self.shirt,
            BodyPart::Head => self.head,
        }
    }

    /// Set the flag for a body part
    pub fn set_visible(&mut self, part: BodyPart, visible: bool) {
        match part {
            BodyPart::Hands => self.hands = visible,
            BodyPart::Shirt => self.shirt = visible,
            BodyPart::Head => self.head = visible,
        }
    }
}

/// Mesh node name to body part table
///
/// Names missing from the table belong to the head.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartTable(IndexMap<String, BodyPart>);

impl Default for PartTable {
    fn default() -> Self {
        let mut parts = IndexMap::new();
        parts.insert("Wolf3D_Hands".to_string(), BodyPart::Hands);
        parts.insert("Wolf3D_Shirt".to_string(), BodyPart::Shirt);
        Self(parts)
    }
}

impl PartTable {
    /// Table with no entries (everything is head)
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    /// Map a node name to a part
    pub fn with(mut self, name: impl Into<String>, part: BodyPart) -> Self {
        self.0.insert(name.into(), part);
        self
    }

    /// Part a node name belongs to
    pub fn part_of(&self, name: &str) -> BodyPart {
        self.0.get(name).copied().unwrap_or_default()
    }
}

/// Absolute transform listener settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Smallest world-space movement (meters, radians) reported as a change
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
}

fn default_epsilon() -> f32 {
    1e-4
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
        }
    }
}

/// Loudness meter settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoudnessConfig {
    /// Level above which the signal counts as loud
    #[serde(default = "default_threshold_db")]
    pub threshold_db: f32,
    /// Exponential smoothing factor for new blocks (0..1)
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    /// Floor of the dB scale; silence reports this value
    #[serde(default = "default_floor_db")]
    pub floor_db: f32,
}

fn default_threshold_db() -> f32 {
    -40.0
}

fn default_smoothing() -> f32 {
    0.3
}

fn default_floor_db() -> f32 {
    -100.0
}

impl Default for LoudnessConfig {
    fn default() -> Self {
        Self {
            threshold_db: default_threshold_db(),
            smoothing: default_smoothing(),
            floor_db: default_floor_db(),
        }
    }
}

/// Complete rig configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub parts: PartTable,
    #[serde(default)]
    pub templates: Vec<EntityTemplate>,
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub loudness: LoudnessConfig,
}

impl RigConfig {
    /// Configuration file name looked up in a directory
    pub const FILE_NAME: &'static str = "puppet.toml";

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RigError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            templates = config.templates.len(),
            "loaded rig config"
        );
        Ok(config)
    }

    /// Load `puppet.toml` from a directory, falling back to defaults when absent
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(Self::FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(dir = %dir.as_ref().display(), "no puppet.toml, using defaults");
            Ok(Self::default())
        }
    }

    /// Whether a mesh node with this name should be shown
    ///
    /// Flags are read on every call so toggling them between inflations
    /// takes effect.
    pub fn mesh_visible(&self, name: &str) -> bool {
        self.visibility.is_visible(self.parts.part_of(name))
    }
}
