//! Resolving clip tracks against an inflated entity tree
//!
//! Inflation moves the transform of every inflated node to its entity, so a
//! track naming an inflated node must drive the entity. Tracks naming nodes
//! that stayed behind as payload drive the node directly.

use super::AnimationClip;
use crate::entity::InflatedEntity;
use indexmap::IndexMap;
use puppet_core::Identity;
use tracing::{debug, warn};

/// What a track name resolved to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingTarget {
    /// An entity, addressed by the identity it took over from its node
    Entity(Identity),
    /// A node kept in an entity's payload
    Payload {
        /// Entity whose payload holds the node
        owner: Identity,
        /// The node itself
        node: Identity,
    },
}

impl BindingTarget {
    /// Identity of the object to drive
    pub fn identity(&self) -> Identity {
        match self {
            BindingTarget::Entity(identity) => *identity,
            BindingTarget::Payload { node, .. } => *node,
        }
    }
}

/// Resolution of every target name of a clip
#[derive(Clone, Debug, Default)]
pub struct ClipBinding {
    /// Clip name
    pub clip: String,
    /// Resolved names in first-use order
    pub targets: IndexMap<String, BindingTarget>,
    /// Names with no matching entity or payload node
    pub missing: Vec<String>,
}

impl ClipBinding {
    /// Resolve a clip against an entity tree
    pub fn resolve(clip: &AnimationClip, root: &InflatedEntity) -> Self {
        let mut binding = Self {
            clip: clip.name.clone(),
            ..Self::default()
        };
        for name in clip.target_names() {
            match resolve_name(root, name) {
                Some(target) => {
                    binding.targets.insert(name.to_string(), target);
                }
                None => binding.missing.push(name.to_string()),
            }
        }

        if binding.missing.is_empty() {
            debug!(clip = %clip.name, bound = binding.targets.len(), "bound clip");
        } else {
            warn!(
                clip = %clip.name,
                bound = binding.targets.len(),
                missing = ?binding.missing,
                "clip has unresolved tracks"
            );
        }
        binding
    }

    /// Target for a node name
    pub fn target(&self, name: &str) -> Option<BindingTarget> {
        self.targets.get(name).copied()
    }

    /// Check if every track resolved
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve one node name: entity names win over payload nodes
pub fn resolve_name(root: &InflatedEntity, name: &str) -> Option<BindingTarget> {
    if let Some(entity) = root.find(name) {
        return Some(BindingTarget::Entity(entity.identity));
    }

    let mut found = None;
    root.walk(&mut |entity| {
        if found.is_some() {
            return;
        }
        for (_, object) in entity.objects() {
            // The object itself is the entity's own node; only its
            // descendants are payload.
            if let Some(node) = object.children.iter().find_map(|c| c.find(name)) {
                found = Some(BindingTarget::Payload {
                    owner: entity.identity,
                    node: node.identity,
                });
                return;
            }
        }
    });
    found
}
