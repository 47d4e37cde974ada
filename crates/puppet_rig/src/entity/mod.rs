//! Scene entities produced by inflation
//!
//! An [`InflatedEntity`] is the host-side wrapper around one loaded node. It
//! owns the node's transform (the node itself is frozen at identity), carries
//! the node's original identity token, and stores the node as a renderable
//! object under a slot named after the node's type.

mod outline;
mod template;

pub use outline::EntityOutline;
pub use template::{EntityFragment, EntityTemplate, NoTemplates, TemplateRegistry, TemplateSource};

use crate::scene::SceneNode;
use indexmap::IndexMap;
use puppet_core::{Euler, EulerOrder, Identity, Mat4, Vec3};
use smallvec::SmallVec;

/// Entity in the host scene graph wrapping one loaded node
#[derive(Clone, Debug)]
pub struct InflatedEntity {
    /// Name of the entity's scene object, used by name-based lookups
    pub object_name: String,
    /// Identity token of the entity's scene object
    pub identity: Identity,
    /// Class list (selector hooks)
    pub classes: SmallVec<[String; 2]>,
    /// Attributes, from a template or set by the caller
    pub attributes: IndexMap<String, String>,
    /// Local position
    pub position: Vec3,
    /// Local rotation in degrees, applied in YXZ order
    pub rotation: Vec3,
    /// Local scale
    pub scale: Vec3,
    /// Whether the world transform must be recomputed
    pub transform_dirty: bool,
    /// Renderable objects keyed by slot
    objects: IndexMap<String, SceneNode>,
    /// Child entities in order
    pub children: Vec<InflatedEntity>,
}

impl Default for InflatedEntity {
    fn default() -> Self {
        Self {
            object_name: String::new(),
            identity: Identity::generate(),
            classes: SmallVec::new(),
            attributes: IndexMap::new(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            transform_dirty: true,
            objects: IndexMap::new(),
            children: Vec::new(),
        }
    }
}

impl InflatedEntity {
    /// Create an empty entity at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate a template element, recursively cloning nested fragments
    pub fn from_fragment(fragment: &EntityFragment) -> Self {
        Self {
            classes: fragment.classes.iter().cloned().collect(),
            attributes: fragment.attributes.clone(),
            children: fragment.children.iter().map(Self::from_fragment).collect(),
            ..Self::default()
        }
    }

    /// Append a child entity
    pub fn append_child(&mut self, child: InflatedEntity) {
        self.children.push(child);
    }

    /// Add a class, ignoring empty names and duplicates
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !class.is_empty() && !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    /// Check if the entity has a class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Get an attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attach a renderable object under `slot`, returning the one it replaced
    pub fn set_object(&mut self, slot: impl Into<String>, node: SceneNode) -> Option<SceneNode> {
        self.objects.insert(slot.into(), node)
    }

    /// Object stored under `slot`
    pub fn object(&self, slot: &str) -> Option<&SceneNode> {
        self.objects.get(slot)
    }

    /// Detach the object stored under `slot`
    pub fn remove_object(&mut self, slot: &str) -> Option<SceneNode> {
        self.objects.shift_remove(slot)
    }

    /// All attached objects with their slots
    pub fn objects(&self) -> impl Iterator<Item = (&str, &SceneNode)> {
        self.objects.iter().map(|(slot, node)| (slot.as_str(), node))
    }

    /// Rotation as Euler angles in radians
    pub fn rotation_euler(&self) -> Euler {
        Euler::from_degrees(self.rotation, EulerOrder::HOST)
    }

    /// Local transformation matrix
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::compose(self.position, self.rotation_euler().to_quat(), self.scale)
    }

    /// Number of entities in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(InflatedEntity::count).sum::<usize>()
    }

    /// Depth-first search by object name, including this entity
    pub fn find(&self, name: &str) -> Option<&InflatedEntity> {
        if self.object_name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Depth-first search by identity, including this entity
    pub fn find_by_identity(&self, identity: Identity) -> Option<&InflatedEntity> {
        if self.identity == identity {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_identity(identity))
    }

    /// Depth-first search by class, including this entity
    pub fn find_by_class(&self, class: &str) -> Option<&InflatedEntity> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_class(class))
    }

    /// Visit every entity of the subtree in pre-order
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a InflatedEntity)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Serializable summary of the subtree
    pub fn outline(&self) -> EntityOutline {
        EntityOutline::of(self)
    }
}
