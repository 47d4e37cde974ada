//! Entity templates
//!
//! A template is a pre-authored entity fragment registered under a node name.
//! When a loaded node with that name is inflated, the template's first content
//! element is cloned and used as the entity shell instead of a default one.
//!
//! # Example
//!
//! ```toml
//! [[templates]]
//! name = "RightEye"
//!
//! [[templates.content]]
//! classes = ["eye", "gaze-target"]
//! attributes = { raycastable = "" }
//! ```

use crate::error::{Result, RigError};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One element of template content
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityFragment {
    /// Class list
    #[serde(default)]
    pub classes: Vec<String>,
    /// Attributes in authoring order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    /// Nested fragments
    #[serde(default)]
    pub children: Vec<EntityFragment>,
}

impl EntityFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Nest a fragment
    pub fn with_child(mut self, child: EntityFragment) -> Self {
        self.children.push(child);
        self
    }
}

/// A named template
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    /// Node name this template overrides
    pub name: String,
    /// Content elements; only the first one is used
    #[serde(default)]
    pub content: Vec<EntityFragment>,
}

impl EntityTemplate {
    /// Create a template with no content
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Vec::new(),
        }
    }

    /// Append a content element
    pub fn with_content(mut self, fragment: EntityFragment) -> Self {
        self.content.push(fragment);
        self
    }

    /// The element cloned into new entities, if there is any content
    pub fn first_element(&self) -> Option<&EntityFragment> {
        self.content.first()
    }
}

/// Lookup from node name to template
///
/// Injected into the inflator so it never queries a live document.
pub trait TemplateSource {
    /// Template registered for `name`, if any
    fn lookup(&self, name: &str) -> Option<&EntityTemplate>;

    /// Check if a template is registered for `name`
    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// Source with no templates at all
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTemplates;

impl TemplateSource for NoTemplates {
    fn lookup(&self, _name: &str) -> Option<&EntityTemplate> {
        None
    }
}

impl TemplateSource for FxHashMap<String, EntityTemplate> {
    fn lookup(&self, name: &str) -> Option<&EntityTemplate> {
        self.get(name)
    }
}

impl TemplateSource for std::collections::HashMap<String, EntityTemplate> {
    fn lookup(&self, name: &str) -> Option<&EntityTemplate> {
        self.get(name)
    }
}

/// Registry of templates keyed by node name
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    templates: FxHashMap<String, EntityTemplate>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, rejecting two templates for the same name
    pub fn from_templates(templates: impl IntoIterator<Item = EntityTemplate>) -> Result<Self> {
        let mut registry = Self::new();
        for template in templates {
            registry.register(template)?;
        }
        Ok(registry)
    }

    /// Register a template
    pub fn register(&mut self, template: EntityTemplate) -> Result<()> {
        if self.templates.contains_key(&template.name) {
            return Err(RigError::DuplicateTemplate(template.name));
        }
        tracing::debug!(
            name = %template.name,
            elements = template.content.len(),
            "registered template"
        );
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Register or replace a template, returning the previous one
    pub fn replace(&mut self, template: EntityTemplate) -> Option<EntityTemplate> {
        self.templates.insert(template.name.clone(), template)
    }

    /// Get template count
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for TemplateRegistry {
    fn lookup(&self, name: &str) -> Option<&EntityTemplate> {
        self.templates.get(name)
    }
}
