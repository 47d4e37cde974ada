//! Printable summary of an entity tree

use super::InflatedEntity;
use puppet_core::{Identity, Vec3};
use serde::Serialize;
use std::fmt::Write;

/// Serializable summary of an entity and its descendants
#[derive(Clone, Debug, Serialize)]
pub struct EntityOutline {
    pub name: String,
    pub identity: Identity,
    pub classes: Vec<String>,
    pub position: Vec3,
    pub rotation: Vec3,
    /// Slots with the attached object's name
    pub objects: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityOutline>,
}

impl EntityOutline {
    pub fn of(entity: &InflatedEntity) -> Self {
        Self {
            name: entity.object_name.clone(),
            identity: entity.identity,
            classes: entity.classes.to_vec(),
            position: entity.position,
            rotation: entity.rotation,
            objects: entity
                .objects()
                .map(|(slot, node)| (slot.to_string(), node.name.clone()))
                .collect(),
            children: entity.children.iter().map(Self::of).collect(),
        }
    }

    /// Indented text tree, one entity per line
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let slots: Vec<&str> = self.objects.iter().map(|(slot, _)| slot.as_str()).collect();
        let _ = writeln!(
            out,
            "{:indent$}{} [{}] pos({}) rot({})",
            "",
            if self.name.is_empty() { "<unnamed>" } else { self.name.as_str() },
            slots.join(","),
            self.position,
            self.rotation,
            indent = depth * 2
        );
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}
