//! Loaded model scene graph

mod node;
mod transform;

pub use node::{NodeKind, SceneNode};
pub use transform::LocalTransform;

/// Name model loaders give the top-level node of a loaded hierarchy
pub const ROOT_NODE_NAME: &str = "Scene";
