//! Loaded model hierarchy nodes

use super::LocalTransform;
use puppet_core::{Euler, Identity};

/// Type tag of a loaded node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Plain grouping node
    #[default]
    Group,
    /// Generic transform node
    Object3D,
    /// Skeleton joint
    Bone,
    /// Static mesh
    Mesh,
    /// Mesh deformed by a skeleton
    SkinnedMesh,
}

impl NodeKind {
    /// Type name as reported by the model loader
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Group => "Group",
            NodeKind::Object3D => "Object3D",
            NodeKind::Bone => "Bone",
            NodeKind::Mesh => "Mesh",
            NodeKind::SkinnedMesh => "SkinnedMesh",
        }
    }

    /// Slot name an entity stores this node's payload under
    pub fn slot(&self) -> String {
        self.type_name().to_lowercase()
    }

    /// Whether the node carries renderable geometry
    pub fn is_mesh(&self) -> bool {
        matches!(self, NodeKind::Mesh | NodeKind::SkinnedMesh)
    }
}

/// A node in a loaded model hierarchy
///
/// Children are owned: moving a child into another parent (or into an
/// entity) detaches it from this node.
///
/// `Clone` keeps every identity, so a clone and its source resolve to the
/// same host objects. Use [`SceneNode::duplicate`] for an independent copy.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Node name, not guaranteed unique
    pub name: String,
    /// Type tag
    pub kind: NodeKind,
    /// Ordered children
    pub children: Vec<SceneNode>,
    /// Local transform
    pub transform: LocalTransform,
    /// Identity token used by animation retargeting
    pub identity: Identity,
    /// Visibility flag
    pub visible: bool,
    /// Mesh index into the source asset, for mesh-bearing nodes
    pub mesh_index: Option<usize>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new("", NodeKind::default())
    }
}

impl SceneNode {
    /// Create a node with an identity transform and a fresh identity
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
            transform: LocalTransform::default(),
            identity: Identity::generate(),
            visible: true,
            mesh_index: None,
        }
    }

    /// Create a plain group node
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    /// Create a skeleton joint
    pub fn bone(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Bone)
    }

    /// Create a skinned mesh node
    pub fn skinned_mesh(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::SkinnedMesh)
    }

    /// Append a child
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Replace the local transform
    pub fn with_transform(mut self, transform: LocalTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set local position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = self.transform.with_position(x, y, z);
        self
    }

    /// Set local rotation
    pub fn with_rotation(mut self, rotation: Euler) -> Self {
        self.transform = self.transform.with_rotation(rotation);
        self
    }

    /// Set the source mesh index
    pub fn with_mesh(mut self, index: usize) -> Self {
        self.mesh_index = Some(index);
        self
    }

    /// Depth-first search by name, including this node
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Depth-first search by identity, including this node
    pub fn find_by_identity(&self, identity: Identity) -> Option<&SceneNode> {
        if self.identity == identity {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_identity(identity))
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }

    /// Deep copy of the subtree with a fresh identity on every node
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.reassign_identities();
        copy
    }

    fn reassign_identities(&mut self) {
        self.identity = Identity::generate();
        for child in &mut self.children {
            child.reassign_identities();
        }
    }

    /// Visit every node of the subtree in pre-order
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> SceneNode {
        SceneNode::group("Scene").with_child(
            SceneNode::group("Armature")
                .with_child(SceneNode::bone("Hips").with_child(SceneNode::bone("Spine")))
                .with_child(SceneNode::skinned_mesh("Wolf3D_Body").with_mesh(0)),
        )
    }

    #[test]
    fn test_slot_is_lowercased_type() {
        assert_eq!(NodeKind::SkinnedMesh.slot(), "skinnedmesh");
        assert_eq!(NodeKind::Object3D.slot(), "object3d");
        assert_eq!(NodeKind::Group.slot(), "group");
    }

    #[test]
    fn test_mesh_kinds() {
        assert!(NodeKind::Mesh.is_mesh());
        assert!(NodeKind::SkinnedMesh.is_mesh());
        assert!(!NodeKind::Bone.is_mesh());
        assert!(!NodeKind::Group.is_mesh());
    }

    #[test]
    fn test_find_and_count() {
        let root = rig();
        assert_eq!(root.count(), 5);
        assert_eq!(root.find("Spine").map(|n| n.kind), Some(NodeKind::Bone));
        assert!(root.find("Missing").is_none());

        let body = root.find("Wolf3D_Body").map(|n| n.identity);
        assert!(body.is_some());
        assert_eq!(
            body.and_then(|id| root.find_by_identity(id)).map(|n| n.name.as_str()),
            Some("Wolf3D_Body")
        );
    }

    #[test]
    fn test_duplicate_mints_fresh_identities() {
        let root = rig();
        let clone = root.clone();
        let copy = root.duplicate();

        let ids = |node: &SceneNode| {
            let mut out = Vec::new();
            node.walk(&mut |n| out.push((n.name.clone(), n.identity)));
            out
        };
        assert_eq!(ids(&clone), ids(&root));

        let (original, copied) = (ids(&root), ids(&copy));
        assert_eq!(copied.len(), original.len());
        for ((name, id), (copy_name, copy_id)) in original.iter().zip(&copied) {
            assert_eq!(name, copy_name);
            assert_ne!(id, copy_id);
        }
        assert_eq!(copy.find("Wolf3D_Body").and_then(|n| n.mesh_index), Some(0));
    }

    #[test]
    fn test_walk_is_preorder() {
        let root = rig();
        let mut names = Vec::new();
        root.walk(&mut |n| names.push(n.name.clone()));
        assert_eq!(names, ["Scene", "Armature", "Hips", "Spine", "Wolf3D_Body"]);
    }
}
