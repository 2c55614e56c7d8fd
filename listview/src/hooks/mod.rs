//! Lifecycle hooks ("moments") around list mutations.
//!
//! Every add, remove and reset runs a before-hook, which the operation waits
//! on, and an after-hook, which it does not. Hooks are stored in a
//! [`HookTable`] keyed by [`Moment`]; moments without a hook complete
//! immediately.

mod fade;

pub use fade::fade_to;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use listdom::Fragment;
use log::trace;

use crate::config::ListOptions;
use crate::error::{ConfigError, HookError};

/// Resolves when a hook has finished.
pub type Completion = BoxFuture<'static, Result<(), HookError>>;

/// The six points at which a list operation can be intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Moment {
    BeforeAdd,
    AfterAdd,
    BeforeRemove,
    AfterRemove,
    BeforeReset,
    AfterReset,
}

impl Moment {
    pub const ALL: [Moment; 6] = [
        Moment::BeforeAdd,
        Moment::AfterAdd,
        Moment::BeforeRemove,
        Moment::AfterRemove,
        Moment::BeforeReset,
        Moment::AfterReset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Moment::BeforeAdd => "beforeAdd",
            Moment::AfterAdd => "afterAdd",
            Moment::BeforeRemove => "beforeRemove",
            Moment::AfterRemove => "afterRemove",
            Moment::BeforeReset => "beforeReset",
            Moment::AfterReset => "afterReset",
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Moment {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Moment::ALL
            .into_iter()
            .find(|moment| moment.name() == name)
            .ok_or_else(|| ConfigError::UnknownHook(name.to_string()))
    }
}

/// What a hook is given, depending on the moment it runs at.
#[derive(Debug, Clone)]
pub enum MomentArgs<R> {
    /// `beforeAdd` (fragment not yet attached) and `afterAdd`.
    Add { record: R, fragment: Fragment },
    /// `beforeRemove`. The fragment is absent when no rendered item matched.
    Remove {
        record: R,
        fragment: Option<Fragment>,
    },
    /// `afterRemove`.
    AfterRemove { record: R },
    /// `beforeReset`, before the root is cleared.
    BeforeReset { models: Arc<[R]>, root: Fragment },
    /// `afterReset`.
    AfterReset { models: Arc<[R]> },
}

impl<R> MomentArgs<R> {
    /// The record the operation is about, for add and remove moments.
    pub fn record(&self) -> Option<&R> {
        match self {
            Self::Add { record, .. }
            | Self::Remove { record, .. }
            | Self::AfterRemove { record } => Some(record),
            Self::BeforeReset { .. } | Self::AfterReset { .. } => None,
        }
    }

    /// The item fragment, or the root for `beforeReset`.
    pub fn fragment(&self) -> Option<&Fragment> {
        match self {
            Self::Add { fragment, .. } => Some(fragment),
            Self::Remove { fragment, .. } => fragment.as_ref(),
            Self::BeforeReset { root, .. } => Some(root),
            Self::AfterRemove { .. } | Self::AfterReset { .. } => None,
        }
    }

    /// The collection's models, for reset moments.
    pub fn models(&self) -> Option<&[R]> {
        match self {
            Self::BeforeReset { models, .. } | Self::AfterReset { models } => {
                Some(models.as_ref())
            }
            _ => None,
        }
    }
}

/// A lifecycle hook.
///
/// Asynchronous hooks ([`Hook::new`]) suspend the operation until their
/// future resolves; synchronous hooks ([`Hook::sync`]) complete with their
/// return value.
pub struct Hook<R> {
    f: Arc<dyn Fn(MomentArgs<R>) -> Completion + Send + Sync>,
}

impl<R> Clone for Hook<R> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<R> fmt::Debug for Hook<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

impl<R: Send + 'static> Hook<R> {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(MomentArgs<R>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |args| f(args).boxed()),
        }
    }

    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(MomentArgs<R>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(move |args| future::ready(f(args)).boxed()),
        }
    }

    /// A hook that does nothing. Use it to switch off a default hook.
    pub fn noop() -> Self {
        Self::sync(|_| Ok(()))
    }

    pub fn call(&self, args: MomentArgs<R>) -> Completion {
        (self.f)(args)
    }
}

/// Hooks by moment.
///
/// # Example
///
/// ```
/// use listview::{Hook, HookTable, Model, Moment};
///
/// let overrides: HookTable<Model> = HookTable::new()
///     .with(Moment::AfterAdd, Hook::noop())
///     .with_named("afterRemove", Hook::noop())
///     .unwrap();
/// assert!(overrides.contains(Moment::AfterRemove));
/// assert!("afterDelete".parse::<Moment>().is_err());
/// ```
pub struct HookTable<R> {
    hooks: HashMap<Moment, Hook<R>>,
}

impl<R> Clone for HookTable<R> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
        }
    }
}

impl<R> Default for HookTable<R> {
    fn default() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }
}

impl<R> fmt::Debug for HookTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut moments: Vec<_> = self.hooks.keys().collect();
        moments.sort();
        f.debug_set().entries(moments).finish()
    }
}

impl<R: Send + 'static> HookTable<R> {
    /// An empty table: every moment completes immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock hooks: items start transparent, fade in once appended and
    /// fade out before they are detached.
    pub fn defaults(options: &ListOptions) -> Self {
        let fade = options.fade;
        Self::new()
            .with(
                Moment::BeforeAdd,
                Hook::sync(|args: MomentArgs<R>| {
                    if let Some(fragment) = args.fragment() {
                        fragment.set_opacity(0.0);
                    }
                    Ok(())
                }),
            )
            .with(
                Moment::AfterAdd,
                Hook::new(move |args: MomentArgs<R>| {
                    let fragment = args.fragment().cloned();
                    async move {
                        if let Some(fragment) = fragment {
                            fade_to(fragment, 1.0, fade).await;
                        }
                        Ok(())
                    }
                }),
            )
            .with(
                Moment::BeforeRemove,
                Hook::new(move |args: MomentArgs<R>| {
                    let fragment = args.fragment().cloned();
                    async move {
                        if let Some(fragment) = fragment {
                            fade_to(fragment, 0.0, fade).await;
                        }
                        Ok(())
                    }
                }),
            )
    }

    /// Set the hook for `moment`, replacing any previous one.
    pub fn with(mut self, moment: Moment, hook: Hook<R>) -> Self {
        self.hooks.insert(moment, hook);
        self
    }

    /// Set a hook by its lifecycle name, e.g. `"beforeAdd"`.
    pub fn with_named(self, name: &str, hook: Hook<R>) -> Result<Self, ConfigError> {
        let moment = name.parse()?;
        Ok(self.with(moment, hook))
    }

    /// Layer this table over `base`: hooks set here win, moments left unset
    /// keep `base`'s hook. `base` is not modified.
    pub fn merged_over(&self, base: &HookTable<R>) -> Self {
        let mut merged = base.clone();
        merged
            .hooks
            .extend(self.hooks.iter().map(|(moment, hook)| (*moment, hook.clone())));
        merged
    }

    pub fn get(&self, moment: Moment) -> Option<&Hook<R>> {
        self.hooks.get(&moment)
    }

    pub fn contains(&self, moment: Moment) -> bool {
        self.hooks.contains_key(&moment)
    }

    /// Invoke the hook for `moment`. Moments without a hook complete
    /// immediately with success.
    pub fn run(&self, moment: Moment, args: MomentArgs<R>) -> Completion {
        match self.hooks.get(&moment) {
            Some(hook) => {
                trace!("running {moment} hook");
                hook.call(args)
            }
            None => future::ready(Ok(())).boxed(),
        }
    }
}
