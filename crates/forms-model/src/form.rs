//! Form structure: a form is an ordered list of containers (pages), each
//! holding an ordered list of elements.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, FormId};
use crate::settings::ElementSettings;

/// One selectable option of a choice-based element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementChoice {
    /// Stored value. Submitted values are matched against this exactly,
    /// case-sensitive.
    pub value: String,
    /// Label shown to the visitor.
    pub label: String,
}

impl ElementChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One input or display unit within a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Element type slug, resolved against the element type registry.
    pub type_slug: String,
    pub label: String,
    pub required: bool,
    pub settings: ElementSettings,
    /// Choices for choice-based types; empty for everything else.
    pub choices: Vec<ElementChoice>,
}

impl Element {
    pub fn new(id: ElementId, type_slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id,
            type_slug: type_slug.into(),
            label: label.into(),
            required: false,
            settings: ElementSettings::new(),
            choices: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_settings(mut self, settings: ElementSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_choices(mut self, choices: Vec<ElementChoice>) -> Self {
        self.choices = choices;
        self
    }

    /// True if `value` matches one of this element's choice values exactly.
    pub fn has_choice(&self, value: &str) -> bool {
        self.choices.iter().any(|choice| choice.value == value)
    }
}

/// One page/step of a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub label: String,
    pub elements: Vec<Element>,
}

impl Container {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }
}

/// A multi-page form definition.
///
/// `gate_order` and `action_order` list the slugs of enabled checks and
/// post-completion actions in evaluation order. Slugs that resolve to
/// nothing at run time are skipped with a warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub title: String,
    pub containers: Vec<Container>,
    pub gate_order: Vec<String>,
    pub action_order: Vec<String>,
}

impl Form {
    pub fn new(id: FormId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            containers: Vec::new(),
            gate_order: Vec::new(),
            action_order: Vec::new(),
        }
    }

    pub fn with_containers(mut self, containers: Vec<Container>) -> Self {
        self.containers = containers;
        self
    }

    pub fn with_gate_order(mut self, slugs: Vec<String>) -> Self {
        self.gate_order = slugs;
        self
    }

    pub fn with_action_order(mut self, slugs: Vec<String>) -> Self {
        self.action_order = slugs;
        self
    }

    /// Look up an element anywhere in the form by id.
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.containers
            .iter()
            .flat_map(|container| container.elements.iter())
            .find(|element| element.id == *id)
    }

    /// All elements across all containers, in form order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.containers
            .iter()
            .flat_map(|container| container.elements.iter())
    }
}
