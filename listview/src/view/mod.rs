//! The list view: binds a collection to a surface.

mod ops;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use listdom::{LocatorKey, Surface};
use log::{debug, warn};
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use crate::collection::{Change, Collection, Subscription};
use crate::config::ListConfig;
use crate::error::{ConfigError, ListError};
use crate::hooks::{Moment, MomentArgs};
use crate::record::Record;
use crate::sequencer::{Sequencer, Signal};

/// Keeps a surface's children in step with a collection.
///
/// Every collection notification starts exactly one operation, in the order
/// the notifications arrive. Operations run as tasks on the tokio runtime
/// the view was created in, so their suspended phases (templates,
/// before-hooks) may overlap; appends still happen in notification order.
///
/// The view stops listening when dropped or [detached](ListView::detach).
/// Operations already started run to completion.
///
/// # Example
///
/// ```
/// use listview::{ElementSurface, ListConfig, ListView, Model, Template, VecCollection};
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() -> Result<(), listview::ConfigError> {
/// let fruits = VecCollection::new(vec![Model::with_id(1), Model::with_id(2)]);
/// let surface = ElementSurface::list();
/// let view = ListView::new(
///     ListConfig::builder(Template::item_id()).build(),
///     &fruits,
///     surface.clone(),
/// )?;
///
/// view.settled().await;
/// assert_eq!(surface.child_ids(), vec!["1", "2"]);
/// # Ok(())
/// # }
/// ```
pub struct ListView<R> {
    inner: Arc<Inner<R>>,
    subscription: Option<Subscription>,
}

struct PendingAdd {
    token: u64,
    settled: Signal,
}

pub(crate) struct Inner<R> {
    config: ListConfig<R>,
    surface: Arc<dyn Surface>,
    sequencer: Sequencer,
    /// Adds not yet appended (or abandoned), by locator key.
    pending_adds: DashMap<LocatorKey, PendingAdd>,
    next_token: AtomicU64,
    tasks: TaskTracker,
    runtime: Handle,
}

impl<R: Record> ListView<R> {
    /// Bind `collection` to `surface` and render the collection's current
    /// records, as if it had just been reset.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new<C, S>(config: ListConfig<R>, collection: &C, surface: S) -> Result<Self, ConfigError>
    where
        C: Collection<Record = R> + ?Sized,
        S: Surface + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        // Closed for good: `wait` resolves whenever nothing is running, and
        // spawning keeps working.
        let tasks = TaskTracker::new();
        tasks.close();
        let inner = Arc::new(Inner {
            config,
            surface: Arc::new(surface),
            sequencer: Sequencer::default(),
            pending_adds: DashMap::new(),
            next_token: AtomicU64::new(0),
            tasks,
            runtime,
        });

        let listener = Arc::downgrade(&inner);
        let subscription = collection.subscribe(Arc::new(move |change: &Change<R>| {
            if let Some(inner) = listener.upgrade() {
                inner.dispatch(change.clone());
            }
        }));

        debug!("list view attached");
        inner.dispatch(Change::Reset(collection.models()));

        Ok(Self {
            inner,
            subscription: Some(subscription),
        })
    }

    pub fn config(&self) -> &ListConfig<R> {
        &self.inner.config
    }

    pub fn surface(&self) -> &dyn Surface {
        self.inner.surface.as_ref()
    }

    /// Returns true while the view receives collection notifications.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop listening to the collection. Running operations are not cancelled.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            debug!("list view detached");
        }
    }

    /// Number of operations and after-hooks still running.
    pub fn pending(&self) -> usize {
        self.inner.tasks.len()
    }

    /// Wait until every operation and after-hook started so far, and any
    /// they start in turn, has finished.
    ///
    /// Never resolves while a hook or template never does.
    pub async fn settled(&self) {
        self.inner.tasks.wait().await;
    }
}

impl<R> fmt::Debug for ListView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListView")
            .field("attached", &self.subscription.is_some())
            .field("pending", &self.inner.tasks.len())
            .finish_non_exhaustive()
    }
}

impl<R: Record> Inner<R> {
    /// Route a notification to its operation.
    fn dispatch(self: &Arc<Self>, change: Change<R>) {
        match change {
            Change::Added(record) => self.start_add(record, None),
            Change::Removed(record) => self.start_remove(record),
            Change::Reset(models) => self.start_reset(models),
        }
    }

    fn spawn<F>(self: &Arc<Self>, operation: &'static str, future: F)
    where
        F: Future<Output = Result<(), ListError>> + Send + 'static,
    {
        let this = Arc::clone(self);
        self.tasks.spawn_on(
            async move {
                if let Err(error) = future.await {
                    this.report(operation, &error);
                }
            },
            &self.runtime,
        );
    }

    /// Run an after-hook without making anyone wait for it.
    fn spawn_after_hook(self: &Arc<Self>, moment: Moment, args: MomentArgs<R>) {
        let completion = self.config.hooks().run(moment, args);
        self.spawn(moment.name(), async move {
            completion
                .await
                .map_err(|source| ListError::hook(moment, source))
        });
    }

    fn report(&self, operation: &str, error: &ListError) {
        match error {
            ListError::LocatorMiss { .. } => debug!("{operation}: {error}"),
            _ => warn!("{operation} failed: {error}"),
        }
        if let Some(handler) = self.config.error_handler() {
            handler(error);
        }
    }

    fn track_pending(&self, key: LocatorKey, settled: Signal) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.pending_adds.insert(key, PendingAdd { token, settled });
        token
    }

    fn untrack_pending(&self, key: &LocatorKey, token: u64) {
        self.pending_adds
            .remove_if(key, |_, pending| pending.token == token);
    }

    fn pending_add(&self, key: &LocatorKey) -> Option<Signal> {
        self.pending_adds
            .get(key)
            .map(|pending| pending.settled.clone())
    }
}
