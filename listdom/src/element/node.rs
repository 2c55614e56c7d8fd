use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Content, Fragment};
use crate::transitions::Transitions;
use crate::types::Style;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

#[derive(Debug, Clone)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: String,

    // Content
    pub content: Content,

    // Visual
    pub style: Style,
    pub transitions: Transitions,

    /// Data attributes, addressable through `[name=value]` locator keys.
    pub data: BTreeMap<String, String>,
}

impl Element {
    /// Create an element with the given tag name and a generated ID.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            id: generate_id(&tag),
            tag,
            content: Content::None,
            style: Style::default(),
            transitions: Transitions::default(),
            data: BTreeMap::new(),
        }
    }

    pub fn ul() -> Self {
        Self::new("ul")
    }

    pub fn li() -> Self {
        Self::new("li")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // Content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    /// Append a child. Replaces any text content.
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(Fragment::new(child)),
            _ => self.content = Content::Children(vec![Fragment::new(child)]),
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        for child in children {
            self = self.child(child);
        }
        self
    }

    // Visual
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.style = self.style.opacity(opacity);
        self
    }

    pub fn transitions(mut self, transitions: Transitions) -> Self {
        self.transitions = transitions;
        self
    }

    // Data
    pub fn data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Text content of this element and all of its descendants.
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::None => String::new(),
            Content::Text(text) => text.clone(),
            Content::Children(children) => children
                .iter()
                .map(|child| child.read(|el| el.text_content()))
                .collect(),
        }
    }
}

/// Renders the element as markup, e.g. `<li id="7" data-kind="fruit">Item</li>`.
///
/// Opacity is only written when it differs from fully opaque.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} id=\"{}\"", self.tag, self.id)?;
        for (name, value) in &self.data {
            write!(f, " data-{name}=\"{value}\"")?;
        }
        if self.style.opacity < 1.0 {
            write!(f, " style=\"opacity: {:.2}\"", self.style.opacity)?;
        }
        write!(f, ">")?;
        match &self.content {
            Content::None => {}
            Content::Text(text) => write!(f, "{text}")?,
            Content::Children(children) => {
                for child in children {
                    write!(f, "{child}")?;
                }
            }
        }
        write!(f, "</{}>", self.tag)
    }
}
