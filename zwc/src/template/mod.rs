pub mod render;

pub use render::{ArgTransform, RenderIssue, Rendered};

use std::collections::BTreeMap;
use std::fmt;

/// How a slot directive encodes the argument it substitutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// `%`: next argument, HTML-escaped.
    Html,
    /// `%=`: next argument, URL-encoded.
    Url,
    /// `%%`: previous argument through the rule's transform, HTML-escaped.
    PreviousHtml,
    /// `%%=`: previous argument through the rule's transform, URL-encoded.
    PreviousUrl,
}

impl SlotKind {
    /// Whether this slot advances the argument cursor.
    pub fn consumes(self) -> bool {
        matches!(self, SlotKind::Html | SlotKind::Url)
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SlotKind::Html => "HTML",
            SlotKind::Url => "URL",
            SlotKind::PreviousHtml => "modified HTML",
            SlotKind::PreviousUrl => "modified URL",
        };
        f.write_str(label)
    }
}

/// One line of a template body.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateLine {
    /// Copied verbatim.
    Literal(String),
    /// Replaced by an encoded argument. Any text after the directive prefix
    /// is discarded.
    Slot(SlotKind),
}

impl TemplateLine {
    fn parse(line: &str) -> Self {
        // Longest prefix first: `%%=` must not be read as `%%` or `%`.
        if line.starts_with("%%=") {
            TemplateLine::Slot(SlotKind::PreviousUrl)
        } else if line.starts_with("%%") {
            TemplateLine::Slot(SlotKind::PreviousHtml)
        } else if line.starts_with("%=") {
            TemplateLine::Slot(SlotKind::Url)
        } else if line.starts_with('%') {
            TemplateLine::Slot(SlotKind::Html)
        } else {
            TemplateLine::Literal(line.to_string())
        }
    }
}

/// A numbered template fragment.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: u32,
    /// Where the template came from (file name, or a label in tests).
    pub name: String,
    pub lines: Vec<TemplateLine>,
    /// The comment-free body, used when a template is inserted unrendered.
    text: String,
}

impl Template {
    /// Build a template from its file contents. Lines starting with `#` are
    /// comments and never reach the body.
    pub fn parse(id: u32, name: impl Into<String>, source: &str) -> Self {
        let kept: Vec<&str> = source
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .filter(|l| !l.starts_with('#'))
            .collect();
        Template {
            id,
            name: name.into(),
            lines: kept.iter().map(|l| TemplateLine::parse(l)).collect(),
            text: kept.join("\n"),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Run-scoped, read-only mapping from template id to template.
///
/// Built once by whoever discovers the template files, then shared by
/// reference with every compilation.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: BTreeMap<u32, Template>,
}

impl TemplateStore {
    pub fn new() -> Self {
        TemplateStore::default()
    }

    /// Add a template, returning the one it replaced under the same id.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.id, template)
    }

    pub fn get(&self, id: u32) -> Option<&Template> {
        self.templates.get(&id)
    }

    /// Templates in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<Template> for TemplateStore {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        let mut store = TemplateStore::new();
        for template in iter {
            store.insert(template);
        }
        store
    }
}
