//! Rendering surfaces: where fragments are attached, found and detached.

use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::element::{Content, Element, Fragment};

/// Addresses an element below a surface root.
///
/// Written as `#id` for element IDs and `[name=value]` for data attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocatorKey {
    Id(String),
    Data { name: String, value: String },
}

impl LocatorKey {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn data(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Data {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn parse(selector: &str) -> Result<Self, LocatorParseError> {
        selector.parse()
    }
}

impl fmt::Display for LocatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Data { name, value } => write!(f, "[{name}={value}]"),
        }
    }
}

/// Error returned when a selector string is not a valid [`LocatorKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector {selector:?}: {reason}")]
pub struct LocatorParseError {
    pub selector: String,
    pub reason: &'static str,
}

impl FromStr for LocatorKey {
    type Err = LocatorParseError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        let error = |reason| LocatorParseError {
            selector: selector.to_string(),
            reason,
        };
        let trimmed = selector.trim();

        if let Some(id) = trimmed.strip_prefix('#') {
            if id.is_empty() {
                return Err(error("empty id"));
            }
            return Ok(Self::Id(id.to_string()));
        }

        if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let (name, value) = inner.split_once('=').ok_or_else(|| error("missing '='"))?;
            let name = name.trim().trim_start_matches("data-");
            let value = value.trim().trim_matches('"');
            if name.is_empty() {
                return Err(error("empty attribute name"));
            }
            return Ok(Self::data(name, value));
        }

        Err(error("expected '#id' or '[name=value]'"))
    }
}

/// A root element that list items are attached to.
///
/// Implementations own the attached fragments. All methods are synchronous
/// and must not call back into the caller.
pub trait Surface: Send + Sync {
    /// The root element items are attached under.
    fn root(&self) -> Fragment;

    /// Attach `fragment` as the last child of the root.
    fn append(&self, fragment: &Fragment);

    /// Detach every child of the root.
    fn clear(&self);

    /// Find the first descendant of the root addressed by `key`.
    fn find(&self, key: &LocatorKey) -> Option<Fragment>;

    /// Detach `fragment` wherever it sits below the root.
    ///
    /// Returns false if it was not attached.
    fn remove(&self, fragment: &Fragment) -> bool;
}

/// In-memory [`Surface`] backed by an element tree.
#[derive(Debug, Clone)]
pub struct ElementSurface {
    root: Fragment,
}

impl ElementSurface {
    /// Create a surface whose root is `root`. Existing children are kept.
    pub fn new(root: Element) -> Self {
        Self {
            root: Fragment::new(root),
        }
    }

    /// Surface rooted at an empty `<ul>`.
    pub fn list() -> Self {
        Self::new(Element::ul())
    }

    /// Number of direct children of the root.
    pub fn len(&self) -> usize {
        self.root.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// IDs of the root's direct children, in order.
    pub fn child_ids(&self) -> Vec<String> {
        self.root.children().iter().map(Fragment::id).collect()
    }

    /// Markup of the whole tree.
    pub fn render(&self) -> String {
        self.root.to_string()
    }
}

impl Surface for ElementSurface {
    fn root(&self) -> Fragment {
        self.root.clone()
    }

    fn append(&self, fragment: &Fragment) {
        trace!("append {}", fragment.id());
        self.root.update(|root| match &mut root.content {
            Content::Children(children) => children.push(fragment.clone()),
            content => *content = Content::Children(vec![fragment.clone()]),
        });
    }

    fn clear(&self) {
        trace!("clear {}", self.root.id());
        self.root.update(|root| root.content = Content::None);
    }

    fn find(&self, key: &LocatorKey) -> Option<Fragment> {
        find_descendant(&self.root, key)
    }

    fn remove(&self, fragment: &Fragment) -> bool {
        let removed = detach(&self.root, fragment);
        if removed {
            trace!("remove {}", fragment.id());
        }
        removed
    }
}

fn find_descendant(parent: &Fragment, key: &LocatorKey) -> Option<Fragment> {
    for child in parent.children() {
        if child.matches(key) {
            return Some(child);
        }
        if let Some(found) = find_descendant(&child, key) {
            return Some(found);
        }
    }
    None
}

fn detach(parent: &Fragment, target: &Fragment) -> bool {
    let removed = parent.update(|el| match &mut el.content {
        Content::Children(children) => {
            let before = children.len();
            children.retain(|child| !child.ptr_eq(target));
            children.len() != before
        }
        _ => false,
    });
    if removed {
        return true;
    }
    parent.children().iter().any(|child| detach(child, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_selectors() {
        assert_eq!(LocatorKey::parse("#7").unwrap(), LocatorKey::id("7"));
        assert_eq!(LocatorKey::parse(" #apple ").unwrap(), LocatorKey::id("apple"));
        assert!(LocatorKey::parse("#").is_err());
    }

    #[test]
    fn parses_data_selectors() {
        assert_eq!(
            LocatorKey::parse("[data-key=\"3\"]").unwrap(),
            LocatorKey::data("key", "3")
        );
        assert_eq!(LocatorKey::parse("[kind=fruit]").unwrap(), LocatorKey::data("kind", "fruit"));
        assert!(LocatorKey::parse("[kind]").is_err());
        assert!(LocatorKey::parse("li").is_err());
    }
}
