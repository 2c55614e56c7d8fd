use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::{Content, Element};
use crate::surface::LocatorKey;

/// Shared handle to an element in (or on its way to) an element tree.
///
/// Cloning a fragment is cheap and yields a handle to the same element, so
/// a fragment can be mutated by whoever holds it (e.g. an animation) after
/// it has been attached to a parent.
///
/// At most one animation drives a fragment at a time; see
/// [`Fragment::begin_animation`].
#[derive(Debug, Clone)]
pub struct Fragment {
    inner: Arc<RwLock<Element>>,
    animation: Arc<AtomicU64>,
}

impl Fragment {
    pub fn new(element: Element) -> Self {
        Self {
            inner: Arc::new(RwLock::new(element)),
            animation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run `f` with shared access to the element.
    pub fn read<T>(&self, f: impl FnOnce(&Element) -> T) -> T {
        let guard = self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// Run `f` with exclusive access to the element.
    pub fn update<T>(&self, f: impl FnOnce(&mut Element) -> T) -> T {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn id(&self) -> String {
        self.read(|el| el.id.clone())
    }

    pub fn opacity(&self) -> f32 {
        self.read(|el| el.style.opacity)
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.update(|el| el.style = el.style.opacity(opacity));
    }

    /// Take over the element's animation and return its token. Animations
    /// started earlier lose their token and must stop touching the element.
    pub fn begin_animation(&self) -> u64 {
        self.animation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Returns true while `token` belongs to the newest animation.
    pub fn owns_animation(&self, token: u64) -> bool {
        self.animation.load(Ordering::Acquire) == token
    }

    /// Direct children, or an empty list for leaf elements.
    pub fn children(&self) -> Vec<Fragment> {
        self.read(|el| match &el.content {
            Content::Children(children) => children.clone(),
            _ => Vec::new(),
        })
    }

    /// Returns true if both handles point at the same element.
    pub fn ptr_eq(&self, other: &Fragment) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns true if this element is addressed by `key`.
    pub fn matches(&self, key: &LocatorKey) -> bool {
        self.read(|el| match key {
            LocatorKey::Id(id) => el.id == *id,
            LocatorKey::Data { name, value } => el.data.get(name) == Some(value),
        })
    }
}

impl From<Element> for Fragment {
    fn from(element: Element) -> Self {
        Self::new(element)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|el| write!(f, "{el}"))
    }
}
