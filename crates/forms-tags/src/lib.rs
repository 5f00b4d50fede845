//! Template tag engine.
//!
//! Replaces `{tagname}` placeholders with the result of a registered
//! resolver. A [`TagHandler`] declares a fixed, ordered parameter-kind
//! signature that every call to [`TagHandler::process`] must satisfy; a
//! count or kind mismatch returns the input unchanged rather than partially
//! substituted. Resolution is lazy: only tags literally present in the input
//! are invoked, each at most once per call. Unknown placeholders are left
//! verbatim.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use forms_model::{Form, Submission};

#[derive(Debug, Error)]
pub enum TagError {
    /// Tag names are ASCII alphanumeric/underscore identifiers.
    #[error("invalid tag name: {0:?}")]
    InvalidName(String),
    #[error("tag already registered: {0:?}")]
    Duplicate(String),
}

/// Kind of one resolver parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagArgKind {
    Form,
    Submission,
    Text,
}

/// One argument passed to `process`, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub enum TagArg<'a> {
    Form(&'a Form),
    Submission(&'a Submission),
    Text(&'a str),
}

impl TagArg<'_> {
    pub fn kind(&self) -> TagArgKind {
        match self {
            TagArg::Form(_) => TagArgKind::Form,
            TagArg::Submission(_) => TagArgKind::Submission,
            TagArg::Text(_) => TagArgKind::Text,
        }
    }
}

type Resolver = Box<dyn Fn(&[TagArg<'_>]) -> String + Send + Sync>;

/// A registered tag: group label for UI categorization, description, and the
/// resolver callback.
pub struct TemplateTag {
    pub group: String,
    pub description: String,
    resolver: Resolver,
}

/// A set of tags sharing one resolver signature.
pub struct TagHandler {
    signature: Vec<TagArgKind>,
    tags: BTreeMap<String, TemplateTag>,
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl TagHandler {
    /// Create a handler whose tags' resolvers all accept `signature`.
    pub fn new(signature: Vec<TagArgKind>) -> Self {
        Self {
            signature,
            tags: BTreeMap::new(),
        }
    }

    /// Register a tag. Names are unique within one handler.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        group: impl Into<String>,
        description: impl Into<String>,
        resolver: F,
    ) -> Result<(), TagError>
    where
        F: Fn(&[TagArg<'_>]) -> String + Send + Sync + 'static,
    {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(TagError::InvalidName(name));
        }
        if self.tags.contains_key(&name) {
            return Err(TagError::Duplicate(name));
        }
        self.tags.insert(
            name,
            TemplateTag {
                group: group.into(),
                description: description.into(),
                resolver: Box::new(resolver),
            },
        );
        Ok(())
    }

    /// Registered tags with their metadata, for builder UIs.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &TemplateTag)> {
        self.tags.iter().map(|(name, tag)| (name.as_str(), tag))
    }

    fn signature_matches(&self, args: &[TagArg<'_>]) -> bool {
        args.len() == self.signature.len()
            && args
                .iter()
                .zip(&self.signature)
                .all(|(arg, kind)| arg.kind() == *kind)
    }

    /// Substitute every registered `{tag}` present in `content`.
    ///
    /// Returns `content` unchanged when it contains no `{`, when the argument
    /// signature does not match, or when no placeholder matches a registered
    /// tag. Unknown placeholders stay verbatim.
    pub fn process(&self, content: &str, args: &[TagArg<'_>]) -> String {
        if !content.contains('{') {
            return content.to_string();
        }
        if !self.signature_matches(args) {
            tracing::debug!(
                expected = self.signature.len(),
                got = args.len(),
                "template tag argument signature mismatch, content left unsubstituted"
            );
            return content.to_string();
        }

        // Expensive resolvers run at most once per distinct tag.
        let mut resolved: HashMap<&str, String> = HashMap::new();
        let mut output = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(open) = rest.find('{') {
            output.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            match after_open.find('}') {
                Some(close) if is_valid_name(&after_open[..close]) => {
                    let name = &after_open[..close];
                    match self.tags.get_key_value(name) {
                        Some((key, tag)) => {
                            let value = resolved
                                .entry(key.as_str())
                                .or_insert_with(|| (tag.resolver)(args));
                            output.push_str(value);
                        }
                        // Unknown placeholder: keep it verbatim.
                        None => {
                            output.push('{');
                            output.push_str(name);
                            output.push('}');
                        }
                    }
                    rest = &after_open[close + 1..];
                }
                // No closing brace or not an identifier: literal brace.
                _ => {
                    output.push('{');
                    rest = after_open;
                }
            }
        }
        output.push_str(rest);
        output
    }
}
