//! Keeps a list element on a [`Surface`] synchronized with an observable
//! collection of records.
//!
//! A [`ListView`] subscribes to a [`Collection`] and turns every `Added`,
//! `Removed` and `Reset` notification into exactly one operation on the
//! surface. Each operation is bracketed by lifecycle hooks ([`Moment`]s)
//! that may suspend it, e.g. to animate an item in or out.

pub mod collection;
pub mod config;
pub mod error;
pub mod hooks;
pub mod record;
pub mod template;
pub mod view;

mod sequencer;

pub use collection::{Change, Collection, Listener, Subscription, VecCollection};
pub use config::{ListConfig, ListConfigBuilder, ListOptions, ResetOrdering};
pub use error::{ConfigError, HookError, ListError, TemplateError};
pub use hooks::{Completion, Hook, HookTable, Moment, MomentArgs};
pub use record::{Model, Record, RecordId};
pub use template::{Markup, Template};
pub use view::ListView;

pub use listdom::{Element, ElementSurface, Fragment, LocatorKey, Surface};

pub mod prelude {
    pub use crate::collection::{Change, Collection, VecCollection};
    pub use crate::config::{ListConfig, ListOptions, ResetOrdering};
    pub use crate::error::{HookError, ListError, TemplateError};
    pub use crate::hooks::{Hook, Moment, MomentArgs};
    pub use crate::record::{Model, Record, RecordId};
    pub use crate::template::Template;
    pub use crate::view::ListView;
    pub use listdom::{Element, ElementSurface, Fragment, LocatorKey, Surface};
}
