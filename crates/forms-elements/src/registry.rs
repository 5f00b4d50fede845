//! Element type registry.
//!
//! Maps a type slug to its [`ElementType`] implementation. Unresolvable slugs
//! fall back to a no-op placeholder so a stale form definition degrades to a
//! blank element instead of crashing the pipeline.

use std::collections::HashMap;
use std::sync::OnceLock;

use forms_model::{Element, FieldValue, RawValue, Submission, ValidationError};

use crate::element_type::ElementType;
use crate::variants::{
    Checkbox, Dropdown, FileUpload, MultipleChoice, NumericRange, OneChoice, StaticContent,
    TextArea, TextField,
};

/// Placeholder for unresolvable type slugs: not an input, skip-validated,
/// renders nothing.
struct Placeholder;

impl ElementType for Placeholder {
    fn slug(&self) -> &'static str {
        "*"
    }

    fn description(&self) -> &'static str {
        "Placeholder for unresolvable element types"
    }

    fn is_input(&self) -> bool {
        false
    }

    fn validate(
        &self,
        _raw: &RawValue,
        _element: &Element,
        _submission: &Submission,
    ) -> Result<FieldValue, ValidationError> {
        Ok(FieldValue::Empty)
    }

    fn format_display(&self, _value: &FieldValue, _element: &Element) -> String {
        String::new()
    }
}

/// Registry of element types indexed by slug.
pub struct ElementTypeRegistry {
    types: HashMap<&'static str, Box<dyn ElementType>>,
    placeholder: Box<dyn ElementType>,
}

impl ElementTypeRegistry {
    /// Create an empty registry. Unknown slugs resolve to the placeholder.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            placeholder: Box::new(Placeholder),
        }
    }

    /// Register an element type under its slug, replacing any previous
    /// registration.
    pub fn register(&mut self, element_type: Box<dyn ElementType>) {
        self.types.insert(element_type.slug(), element_type);
    }

    /// Resolve a slug, or `None` when nothing is registered under it.
    pub fn resolve(&self, slug: &str) -> Option<&dyn ElementType> {
        self.types.get(slug).map(Box::as_ref)
    }

    /// Resolve a slug, falling back to the no-op placeholder. The fallback
    /// is logged once per call site occurrence since it usually points at a
    /// form referencing a type that was unregistered.
    pub fn get(&self, slug: &str) -> &dyn ElementType {
        match self.types.get(slug) {
            Some(element_type) => element_type.as_ref(),
            None => {
                tracing::warn!(slug, "unresolvable element type, using placeholder");
                self.placeholder.as_ref()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered slugs, unordered.
    pub fn slugs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }
}

impl Default for ElementTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TextField));
        registry.register(Box::new(TextArea));
        registry.register(Box::new(OneChoice));
        registry.register(Box::new(MultipleChoice));
        registry.register(Box::new(Dropdown));
        registry.register(Box::new(Checkbox));
        registry.register(Box::new(FileUpload));
        registry.register(Box::new(NumericRange));
        registry.register(Box::new(StaticContent));
        registry
    }
}

/// Shared registry with all built-in element types, built once.
pub fn default_registry() -> &'static ElementTypeRegistry {
    static REGISTRY: OnceLock<ElementTypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ElementTypeRegistry::default)
}
