//! Model inflation
//!
//! Turns a loaded node hierarchy into a tree of [`InflatedEntity`]s. A node
//! becomes an entity when it is the hierarchy root, when a template is
//! registered for its name, or when any of its children became one. The
//! decision is made bottom-up, so children are always inflated first.
//!
//! Inflating a node moves transform ownership to the entity: the entity takes
//! the node's position, rotation and scale, and the node is frozen at
//! identity so the transform is never applied twice. The entity also takes
//! over the node's identity token and the node gets a fresh one, which keeps
//! identity-based retargeting pointed at the entity.
//!
//! Nodes that do not qualify stay where they are: inside the payload of the
//! nearest inflated ancestor, or dropped with the hierarchy if none exists.
//!
//! # Example
//!
//! ```rust
//! use puppet_rig::prelude::*;
//!
//! let config = RigConfig::default();
//! let templates = TemplateRegistry::new();
//! let root = SceneNode::group("Scene").with_child(SceneNode::bone("Hips"));
//!
//! let entity = Inflator::new(&config, &templates).inflate(root).unwrap();
//! assert_eq!(entity.object_name, "Scene");
//! // Hips had nothing that qualified, so it stays inside the root's payload
//! assert!(entity.children.is_empty());
//! ```

use crate::config::RigConfig;
use crate::entity::{InflatedEntity, TemplateSource};
use crate::scene::{SceneNode, ROOT_NODE_NAME};
use puppet_core::{EulerOrder, Identity, Vec3};
use tracing::{debug, trace};

/// Offset applied to the root entity so the avatar's head sits at the origin
pub const ROOT_OFFSET: Vec3 = Vec3::new(0.0, -0.65, 0.0);

/// Rotation (degrees) applied to the root entity so the avatar faces forward
pub const ROOT_ROTATION: Vec3 = Vec3::new(0.0, 180.0, 0.0);

/// Outcome of inflating one node
#[derive(Debug)]
pub enum Inflation {
    /// The node qualified and is now wrapped by an entity
    Inflated(InflatedEntity),
    /// The node did not qualify and is handed back untouched apart from
    /// visibility and any qualifying descendants that were moved out
    Pruned(SceneNode),
}

impl Inflation {
    /// The entity, if the node qualified
    pub fn into_entity(self) -> Option<InflatedEntity> {
        match self {
            Inflation::Inflated(entity) => Some(entity),
            Inflation::Pruned(_) => None,
        }
    }

    /// Check if the node qualified
    pub fn is_inflated(&self) -> bool {
        matches!(self, Inflation::Inflated(_))
    }
}

/// Counters for one inflation run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InflateStats {
    /// Nodes visited
    pub visited: usize,
    /// Nodes wrapped by an entity
    pub inflated: usize,
    /// Nodes left as plain payload
    pub pruned: usize,
    /// Entities built from a template
    pub templated: usize,
}

/// Converts loaded hierarchies into entity trees
///
/// Borrows the configuration and the template source; holds no state beyond
/// run counters.
pub struct Inflator<'a, T: TemplateSource + ?Sized> {
    config: &'a RigConfig,
    templates: &'a T,
    stats: InflateStats,
}

impl<'a, T: TemplateSource + ?Sized> Inflator<'a, T> {
    /// Create an inflator reading `config` and `templates`
    pub fn new(config: &'a RigConfig, templates: &'a T) -> Self {
        Self {
            config,
            templates,
            stats: InflateStats::default(),
        }
    }

    /// Counters accumulated since creation
    pub fn stats(&self) -> InflateStats {
        self.stats
    }

    /// Inflate a hierarchy, dropping it if nothing in it qualifies
    pub fn inflate(&mut self, node: SceneNode) -> Option<InflatedEntity> {
        let root_name = node.name.clone();
        let result = self.inflate_node(node).into_entity();
        debug!(
            root = %root_name,
            visited = self.stats.visited,
            inflated = self.stats.inflated,
            pruned = self.stats.pruned,
            templated = self.stats.templated,
            "inflated model hierarchy"
        );
        result
    }

    /// Inflate one node and its subtree
    ///
    /// Returns the node itself when it does not qualify, so the caller can
    /// keep it as a child.
    pub fn inflate_node(&mut self, mut node: SceneNode) -> Inflation {
        self.stats.visited += 1;

        if node.kind.is_mesh() {
            node.visible = self.config.mesh_visible(&node.name);
        }

        // Taking the list is the snapshot: every child is either moved into
        // an entity or handed back, never both.
        let snapshot = std::mem::take(&mut node.children);
        let mut inflated_children = Vec::new();
        for child in snapshot {
            match self.inflate_node(child) {
                Inflation::Inflated(entity) => inflated_children.push(entity),
                Inflation::Pruned(child) => node.children.push(child),
            }
        }

        let is_root = node.name == ROOT_NODE_NAME;
        let has_template = self.templates.contains(&node.name);

        if !is_root && !has_template && inflated_children.is_empty() {
            trace!(name = %node.name, kind = node.kind.type_name(), "pruned node");
            self.stats.pruned += 1;
            return Inflation::Pruned(node);
        }

        Inflation::Inflated(self.wrap(node, is_root, inflated_children))
    }

    fn wrap(
        &mut self,
        mut node: SceneNode,
        is_root: bool,
        children: Vec<InflatedEntity>,
    ) -> InflatedEntity {
        let template_element = self
            .templates
            .lookup(&node.name)
            .and_then(|template| template.first_element());

        let mut entity = match template_element {
            Some(element) => {
                self.stats.templated += 1;
                InflatedEntity::from_fragment(element)
            }
            None => InflatedEntity::new(),
        };

        for child in children {
            entity.append_child(child);
        }

        let class = if node.name.is_empty() {
            class_token(&node.identity.to_string())
        } else {
            class_token(&node.name)
        };
        entity.add_class(class);

        if node.transform.reorder_rotation(EulerOrder::HOST) {
            trace!(name = %node.name, "normalized rotation order to YXZ");
        }

        entity.position = node.transform.position;
        entity.rotation = node.transform.rotation().to_degrees();
        entity.scale = node.transform.scale;
        entity.transform_dirty = true;
        node.transform.freeze_at_identity();

        // Compensates the asset's authored orientation and head offset; wins
        // over whatever the root node carried.
        if is_root {
            entity.position = ROOT_OFFSET;
            entity.rotation = ROOT_ROTATION;
        }

        entity.object_name = node.name.clone();
        entity.identity = node.identity;
        node.identity = Identity::generate();

        trace!(
            name = %entity.object_name,
            identity = %entity.identity,
            children = entity.children.len(),
            "inflated node"
        );
        self.stats.inflated += 1;

        let slot = node.kind.slot();
        entity.set_object(slot, node);
        entity
    }
}

/// Reduce a name to characters usable as a class: `[A-Za-z0-9_-]`
pub fn class_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Inflate a hierarchy with a one-off inflator
pub fn inflate<T: TemplateSource + ?Sized>(
    node: SceneNode,
    config: &RigConfig,
    templates: &T,
) -> Option<InflatedEntity> {
    Inflator::new(config, templates).inflate(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityFragment, EntityTemplate, NoTemplates, TemplateRegistry};
    use crate::scene::{LocalTransform, NodeKind};
    use puppet_core::{Euler, Mat4, Quat};
    use std::collections::HashSet;

    fn templates(names: &[&str]) -> TemplateRegistry {
        TemplateRegistry::from_templates(names.iter().map(|name| {
            EntityTemplate::new(*name).with_content(
                EntityFragment::new()
                    .with_class("from-template")
                    .with_attribute("data-template", *name),
            )
        }))
        .unwrap()
    }

    fn names(entity: &InflatedEntity) -> Vec<&str> {
        entity.children.iter().map(|c| c.object_name.as_str()).collect()
    }

    #[test]
    fn test_non_root_without_qualifying_descendants_is_pruned() {
        let config = RigConfig::default();
        let node = SceneNode::group("Armature")
            .with_child(SceneNode::bone("Hips").with_child(SceneNode::bone("Spine")));

        let mut inflator = Inflator::new(&config, &NoTemplates);
        match inflator.inflate_node(node) {
            Inflation::Pruned(node) => {
                // Handed back intact
                assert_eq!(node.count(), 3);
                assert_eq!(node.children[0].children[0].name, "Spine");
            }
            Inflation::Inflated(_) => panic!("Armature should not qualify"),
        }
        assert_eq!(inflator.stats().pruned, 3);
        assert_eq!(inflator.stats().inflated, 0);
    }

    #[test]
    fn test_unnamed_leaf_is_pruned() {
        let config = RigConfig::default();
        assert!(inflate(SceneNode::group(""), &config, &NoTemplates).is_none());
    }

    #[test]
    fn test_root_always_included_with_compensation() {
        let config = RigConfig::default();
        let entity = inflate(SceneNode::group("Scene"), &config, &NoTemplates).unwrap();

        assert_eq!(entity.position, Vec3::new(0.0, -0.65, 0.0));
        assert_eq!(entity.rotation, Vec3::new(0.0, 180.0, 0.0));
        assert!(entity.children.is_empty());
        assert!(entity.object("group").is_some());
    }

    #[test]
    fn test_root_compensation_with_template() {
        let config = RigConfig::default();
        let registry = templates(&["Scene"]);
        let root = SceneNode::group("Scene").with_position(3.0, 0.0, 0.0);

        let entity = inflate(root, &config, &registry).unwrap();

        assert!(entity.has_class("from-template"));
        assert_eq!(entity.position, ROOT_OFFSET);
        assert_eq!(entity.rotation, ROOT_ROTATION);
        let node = entity.object("group").unwrap();
        assert!(node.transform.is_identity());
    }

    #[test]
    fn test_transform_moves_to_entity() {
        let config = RigConfig::default();
        let registry = templates(&["Head"]);
        let rotation = Euler::new(0.1, 0.5, -0.2, EulerOrder::Yxz);
        let head = SceneNode::bone("Head").with_transform(
            LocalTransform::new()
                .with_position(0.0, 0.1, 0.02)
                .with_rotation(rotation)
                .with_scale(1.0, 1.5, 1.0),
        );

        let root = SceneNode::group("Scene").with_child(head);
        let entity = inflate(root, &config, &registry).unwrap();
        let head = &entity.children[0];

        assert!(head.position.abs_diff_eq(Vec3::new(0.0, 0.1, 0.02), 1e-6));
        assert!(head.rotation.abs_diff_eq(rotation.to_degrees(), 1e-4));
        assert!(head.scale.abs_diff_eq(Vec3::new(1.0, 1.5, 1.0), 1e-6));
        assert!(head.transform_dirty);

        let node = head.object("bone").unwrap();
        assert!(!node.transform.matrix_auto_update);
        assert_eq!(node.transform.matrix, Mat4::IDENTITY);
        assert_eq!(node.transform.position, Vec3::ZERO);
        assert_eq!(node.transform.scale, Vec3::ONE);
        assert_eq!(node.transform.quaternion(), Quat::IDENTITY);
        assert_eq!(node.transform.rotation().angles(), Vec3::ZERO);
    }

    #[test]
    fn test_rotation_order_normalized() {
        let config = RigConfig::default();
        let registry = templates(&["Neck"]);
        let authored = Euler::new(0.4, 0.9, 0.2, EulerOrder::Xyz);
        let neck = SceneNode::bone("Neck").with_rotation(authored);

        let root = SceneNode::group("Scene").with_child(neck);
        let entity = inflate(root, &config, &registry).unwrap();
        let neck = &entity.children[0];

        // Same orientation, now expressed in YXZ
        let yxz = neck.rotation_euler();
        assert_eq!(yxz.order, EulerOrder::Yxz);
        assert!(yxz.to_quat().dot(authored.to_quat()).abs() > 0.9999);
        // The raw angles differ because the order changed
        assert!(!neck.rotation.abs_diff_eq(authored.to_degrees(), 1e-2));
    }

    #[test]
    fn test_rotation_set_after_construction_survives() {
        let config = RigConfig::default();
        let registry = templates(&["Neck"]);
        let mut neck = SceneNode::bone("Neck");
        neck.transform.set_rotation(Euler::new(0.5, 0.0, 0.0, EulerOrder::Xyz));

        let root = SceneNode::group("Scene").with_child(neck);
        let entity = inflate(root, &config, &registry).unwrap();

        let neck = &entity.children[0];
        let expected = Vec3::new(0.5_f32.to_degrees(), 0.0, 0.0);
        assert!(neck.rotation.abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn test_identity_swap() {
        let config = RigConfig::default();
        let registry = templates(&["LeftHand", "RightHand"]);
        let root = SceneNode::group("Scene").with_children([
            SceneNode::bone("LeftHand"),
            SceneNode::bone("RightHand"),
        ]);
        let originals: Vec<Identity> = std::iter::once(root.identity)
            .chain(root.children.iter().map(|c| c.identity))
            .collect();

        let entity = inflate(root, &config, &registry).unwrap();

        let mut entities = Vec::new();
        entity.walk(&mut |e| entities.push(e));
        assert_eq!(entities.len(), 3);

        let mut seen = HashSet::new();
        for (e, original) in entities.iter().zip(&originals) {
            assert_eq!(e.identity, *original);
            let (_, node) = e.objects().next().unwrap();
            assert_ne!(node.identity, *original);
            assert!(seen.insert(node.identity), "node identity reused");
        }
        for original in &originals {
            assert!(!seen.contains(original));
        }
    }

    #[test]
    fn test_order_preserved_with_pruned_middle() {
        let config = RigConfig::default();
        let registry = templates(&["A", "C"]);
        let root = SceneNode::group("Scene").with_children([
            SceneNode::bone("A"),
            SceneNode::bone("B"),
            SceneNode::bone("C"),
        ]);

        let entity = inflate(root, &config, &registry).unwrap();

        assert_eq!(names(&entity), ["A", "C"]);
        // B stays with the root's payload
        let payload = entity.object("group").unwrap();
        assert_eq!(payload.children.len(), 1);
        assert_eq!(payload.children[0].name, "B");
    }

    #[test]
    fn test_template_precedence() {
        let config = RigConfig::default();
        let build = |registry: &TemplateRegistry| {
            let root = SceneNode::group("Scene").with_child(
                SceneNode::bone("Hips")
                    .with_position(0.0, 1.0, 0.0)
                    .with_child(SceneNode::bone("Spine")),
            );
            inflate(root, &config, registry).unwrap()
        };

        let plain = build(&templates(&["Spine"]));
        let templated = build(&templates(&["Spine", "Hips"]));

        let plain_hips = &plain.children[0];
        let templated_hips = &templated.children[0];

        assert!(!plain_hips.has_class("from-template"));
        assert!(templated_hips.has_class("from-template"));
        assert_eq!(templated_hips.attribute("data-template"), Some("Hips"));

        assert_eq!(names(plain_hips), names(templated_hips));
        assert_eq!(plain_hips.position, templated_hips.position);
        assert_eq!(plain_hips.rotation, templated_hips.rotation);
        assert!(templated_hips.object("bone").unwrap().transform.is_identity());
    }

    #[test]
    fn test_template_without_content_falls_back() {
        let config = RigConfig::default();
        let mut registry = TemplateRegistry::new();
        registry.register(EntityTemplate::new("Hips")).unwrap();

        let entity = inflate(
            SceneNode::group("Scene").with_child(SceneNode::bone("Hips")),
            &config,
            &registry,
        )
        .unwrap();

        // Registered, so Hips qualifies; empty, so the shell is the default
        let hips = &entity.children[0];
        assert_eq!(hips.object_name, "Hips");
        assert!(hips.attributes.is_empty());
        assert_eq!(hips.classes.as_slice(), ["Hips".to_string()]);
    }

    #[test]
    fn test_template_children_precede_inflated_children() {
        let config = RigConfig::default();
        let mut registry = templates(&["Spine"]);
        registry
            .register(EntityTemplate::new("Hips").with_content(
                EntityFragment::new().with_child(EntityFragment::new().with_class("marker")),
            ))
            .unwrap();

        let entity = inflate(
            SceneNode::group("Scene")
                .with_child(SceneNode::bone("Hips").with_child(SceneNode::bone("Spine"))),
            &config,
            &registry,
        )
        .unwrap();

        let hips = &entity.children[0];
        assert_eq!(hips.children.len(), 2);
        assert!(hips.children[0].has_class("marker"));
        assert_eq!(hips.children[1].object_name, "Spine");
    }

    #[test]
    fn test_eyes_scenario() {
        let config = RigConfig::default();
        let registry = templates(&["RightEye"]);
        let root = SceneNode::group("Scene").with_child(
            SceneNode::bone("Hips")
                .with_children([SceneNode::bone("LeftEye"), SceneNode::bone("RightEye")]),
        );

        let entity = inflate(root, &config, &registry).unwrap();

        assert_eq!(entity.object_name, "Scene");
        assert_eq!(names(&entity), ["Hips"]);

        let hips = &entity.children[0];
        assert_eq!(names(hips), ["RightEye"]);
        let right_eye = &hips.children[0];
        assert!(right_eye.has_class("from-template"));
        assert!(right_eye.has_class("RightEye"));

        // LeftEye never became an entity but is still rendered with Hips
        assert!(entity.find("LeftEye").is_none());
        let hips_node = hips.object("bone").unwrap();
        assert_eq!(hips_node.children.len(), 1);
        assert_eq!(hips_node.children[0].name, "LeftEye");
    }

    #[test]
    fn test_deep_chain_is_kept() {
        let config = RigConfig::default();
        let registry = templates(&["Head"]);
        let root = SceneNode::group("Scene").with_child(
            SceneNode::group("Armature").with_children([
                SceneNode::skinned_mesh("Wolf3D_Body"),
                SceneNode::bone("Spine").with_child(SceneNode::bone("Head")),
            ]),
        );

        let entity = inflate(root, &config, &registry).unwrap();

        let mut chain = Vec::new();
        entity.walk(&mut |e| chain.push(e.object_name.clone()));
        assert_eq!(chain, ["Scene", "Armature", "Spine", "Head"]);

        // The pruned mesh sibling stays in Armature's payload
        let armature = entity.find("Armature").unwrap();
        let payload = armature.object("group").unwrap();
        assert_eq!(payload.children.len(), 1);
        assert_eq!(payload.children[0].kind, NodeKind::SkinnedMesh);
    }

    #[test]
    fn test_visibility_applies_to_pruned_meshes() {
        let mut config = RigConfig::default();
        config.visibility.hands = false;
        config.visibility.shirt = true;
        config.visibility.head = false;

        let root = SceneNode::group("Scene").with_children([
            SceneNode::skinned_mesh("Wolf3D_Hands"),
            SceneNode::skinned_mesh("Wolf3D_Shirt"),
            SceneNode::skinned_mesh("Wolf3D_Head"),
            SceneNode::bone("Hips"),
        ]);

        let entity = inflate(root, &config, &NoTemplates).unwrap();
        let payload = entity.object("group").unwrap();

        let visible: Vec<(&str, bool)> = payload
            .children
            .iter()
            .map(|n| (n.name.as_str(), n.visible))
            .collect();
        assert_eq!(
            visible,
            [
                ("Wolf3D_Hands", false),
                ("Wolf3D_Shirt", true),
                ("Wolf3D_Head", false),
                // Not a mesh: untouched
                ("Hips", true),
            ]
        );
    }

    #[test]
    fn test_hidden_mesh_can_still_inflate() {
        let mut config = RigConfig::default();
        config.visibility.hands = false;
        let registry = templates(&["Wolf3D_Hands"]);

        let entity = inflate(
            SceneNode::group("Scene").with_child(SceneNode::skinned_mesh("Wolf3D_Hands")),
            &config,
            &registry,
        )
        .unwrap();

        let hands = &entity.children[0];
        let node = hands.object("skinnedmesh").unwrap();
        assert!(!node.visible);
    }

    #[test]
    fn test_class_from_name_is_sanitized() {
        let config = RigConfig::default();
        let registry = templates(&["Left Eye.001"]);

        let entity = inflate(
            SceneNode::group("Scene").with_child(SceneNode::bone("Left Eye.001")),
            &config,
            &registry,
        )
        .unwrap();

        assert!(entity.has_class("Scene"));
        let eye = &entity.children[0];
        assert!(eye.has_class("LeftEye001"));
        assert_eq!(eye.object_name, "Left Eye.001");
    }

    #[test]
    fn test_unnamed_node_uses_identity_for_class() {
        let config = RigConfig::default();
        let registry = templates(&["Hips"]);
        let unnamed = SceneNode::group("").with_child(SceneNode::bone("Hips"));
        let identity = unnamed.identity;

        let root = SceneNode::group("Scene").with_child(unnamed);
        let entity = inflate(root, &config, &registry).unwrap();

        let wrapper = &entity.children[0];
        assert_eq!(wrapper.identity, identity);
        assert!(wrapper.has_class(&class_token(&identity.to_string())));
    }

    #[test]
    fn test_class_token() {
        assert_eq!(class_token("mixamorig:Hips"), "mixamorigHips");
        assert_eq!(class_token("Wolf3D_Head-1"), "Wolf3D_Head-1");
        assert_eq!(class_token("!@#"), "");
    }

    #[test]
    fn test_stats() {
        let config = RigConfig::default();
        let registry = templates(&["B"]);
        let root = SceneNode::group("Scene")
            .with_children([SceneNode::bone("A"), SceneNode::bone("B")]);

        let mut inflator = Inflator::new(&config, &registry);
        assert!(inflator.inflate(root).is_some());

        assert_eq!(
            inflator.stats(),
            InflateStats {
                visited: 3,
                inflated: 2,
                pruned: 1,
                templated: 1,
            }
        );
    }
}
