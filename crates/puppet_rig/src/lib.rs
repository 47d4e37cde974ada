//! # Puppet Rig
//!
//! Turns a loaded avatar model into a tree of addressable scene entities.
//!
//! This crate provides:
//! - **Inflation** of a loaded node hierarchy into entities, keeping only the
//!   root, templated nodes and their ancestors
//! - **Templates** that give selected nodes a prebuilt entity shape
//! - **Model loading** from glTF 2.0 / GLB
//! - **Clip binding** of name-addressed animation tracks to inflated entities
//! - **World transform tracking** and **loudness metering** for avatar reactions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use puppet_rig::prelude::*;
//!
//! let mut rig = AvatarRig::new(RigConfig::load_from_dir(".")?)?;
//! if let Some(avatar) = rig.load("avatars/default.glb")? {
//!     println!("{}", avatar.outline().render_tree());
//! }
//! ```

// Errors
pub mod error;

// Configuration
pub mod config;

// Loaded model scene graph
pub mod scene;

// Inflated entities and templates
pub mod entity;

// Hierarchy inflation
pub mod inflate;

// Model loaders
pub mod loader;

// Animation clips
pub mod animation;

// Entity tree systems
pub mod systems;

// Audio levels
pub mod audio;

// Avatar rig wiring
pub mod rig;

// Prelude for common imports
pub mod prelude;

pub use config::RigConfig;
pub use entity::{EntityTemplate, InflatedEntity, TemplateRegistry, TemplateSource};
pub use error::{Result, RigError};
pub use inflate::{inflate, Inflation, Inflator};
pub use rig::{AvatarRig, ModelLoaded};
pub use scene::{NodeKind, SceneNode};

pub use puppet_core;
