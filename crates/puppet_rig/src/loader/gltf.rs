//! glTF 2.0 model loader
//!
//! Loads glTF and GLB files using the `gltf` crate. The default scene's root
//! nodes are placed under a `"Scene"` group; nodes with both a mesh and a
//! skin become skinned meshes and skin joints become bones.

use super::{LoadError, LoadedModel, ModelLoader};
use crate::animation::{AnimationClip, ClipTrack, Interpolation, TrackProperty, TrackValues};
use crate::scene::{LocalTransform, NodeKind, SceneNode, ROOT_NODE_NAME};
use gltf::animation::util::ReadOutputs;
use gltf::Gltf;
use puppet_core::{Quat, Vec3};
use rustc_hash::FxHashSet;
use std::path::Path;

/// glTF 2.0 model loader
pub struct GltfLoader {
    /// Whether to load animations
    pub load_animations: bool,
}

impl GltfLoader {
    pub fn new() -> Self {
        Self {
            load_animations: true,
        }
    }

    /// Set whether to load animations
    pub fn with_animations(mut self, load: bool) -> Self {
        self.load_animations = load;
        self
    }
}

impl Default for GltfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader for GltfLoader {
    fn load(&self, path: &Path) -> Result<LoadedModel, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        let Gltf { document, blob } =
            Gltf::open(path).map_err(|e| LoadError::Parse(e.to_string()))?;

        let base_path = path.parent().unwrap_or(Path::new("."));
        let buffers = gltf::import_buffers(&document, Some(base_path), blob)
            .map_err(|e| LoadError::InvalidData(e.to_string()))?;

        let joints: FxHashSet<usize> = document
            .skins()
            .flat_map(|skin| skin.joints().map(|joint| joint.index()))
            .collect();

        let roots: Vec<gltf::Node> = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .map(|scene| scene.nodes().collect())
            .unwrap_or_default();

        let root = match roots.as_slice() {
            [only] if only.name() == Some(ROOT_NODE_NAME) => load_node(only, &joints),
            _ => SceneNode::group(ROOT_NODE_NAME)
                .with_children(roots.iter().map(|node| load_node(node, &joints))),
        };

        let mut model = LoadedModel::new(root);
        model.source_path = path.to_path_buf();

        if self.load_animations {
            let names: Vec<String> = document
                .nodes()
                .map(|node| node.name().unwrap_or_default().to_string())
                .collect();
            for animation in document.animations() {
                if let Some(clip) = load_animation(&animation, &buffers, &names) {
                    model.clips.push(clip);
                }
            }
        }

        tracing::debug!(
            path = %path.display(),
            nodes = model.root.count(),
            joints = joints.len(),
            clips = model.clips.len(),
            "loaded glTF model"
        );
        Ok(model)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["gltf", "glb"]
    }

    fn name(&self) -> &'static str {
        "glTF 2.0 Loader"
    }
}

/// Load a node and its subtree
fn load_node(node: &gltf::Node, joints: &FxHashSet<usize>) -> SceneNode {
    let (t, r, s) = node.transform().decomposed();

    let kind = match (node.mesh().is_some(), node.skin().is_some()) {
        (true, true) => NodeKind::SkinnedMesh,
        (true, false) => NodeKind::Mesh,
        _ if joints.contains(&node.index()) => NodeKind::Bone,
        _ => NodeKind::Group,
    };

    let mut loaded = SceneNode::new(node.name().unwrap_or_default(), kind).with_transform(
        LocalTransform::from_parts(
            Vec3::new(t[0], t[1], t[2]),
            Quat::from_xyzw(r[0], r[1], r[2], r[3]),
            Vec3::new(s[0], s[1], s[2]),
        ),
    );
    loaded.mesh_index = node.mesh().map(|m| m.index());

    loaded.with_children(node.children().map(|child| load_node(&child, joints)))
}

/// Load an animation, addressing tracks by node name
fn load_animation(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
    names: &[String],
) -> Option<AnimationClip> {
    let mut clip = AnimationClip::new(animation.name().unwrap_or("animation"));

    for channel in animation.channels() {
        let node_name = match names.get(channel.target().node().index()) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                tracing::trace!(clip = %clip.name, "skipping channel on unnamed node");
                continue;
            }
        };

        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
        let Some(inputs) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        let Some(outputs) = reader.read_outputs() else {
            continue;
        };

        let (property, values) = match outputs {
            ReadOutputs::Translations(iter) => (
                TrackProperty::Translation,
                TrackValues::Vec3(iter.map(|t| Vec3::new(t[0], t[1], t[2])).collect()),
            ),
            ReadOutputs::Rotations(iter) => (
                TrackProperty::Rotation,
                TrackValues::Quat(
                    iter.into_f32()
                        .map(|r| Quat::from_xyzw(r[0], r[1], r[2], r[3]))
                        .collect(),
                ),
            ),
            ReadOutputs::Scales(iter) => (
                TrackProperty::Scale,
                TrackValues::Vec3(iter.map(|s| Vec3::new(s[0], s[1], s[2])).collect()),
            ),
            ReadOutputs::MorphTargetWeights(iter) => (
                TrackProperty::Weights,
                TrackValues::Scalar(iter.into_f32().collect()),
            ),
        };

        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };

        clip.push_track(ClipTrack {
            node_name,
            property,
            times,
            interpolation,
            values,
        });
    }

    if clip.tracks.is_empty() {
        return None;
    }
    Some(clip)
}
