//! Add, remove and reset operations.

use std::sync::Arc;

use listdom::{Fragment, LocatorKey};
use log::{debug, trace};

use super::Inner;
use crate::config::ResetOrdering;
use crate::error::ListError;
use crate::hooks::{Moment, MomentArgs};
use crate::record::{Record, describe};
use crate::sequencer::{Signal, Slot};

impl<R: Record> Inner<R> {
    /// Start adding `record`. The append slot is claimed now so appends keep
    /// notification order. `reset` is the signal of the reset this add
    /// re-populates, if it must wait for one.
    pub(super) fn start_add(self: &Arc<Self>, record: R, reset: Option<Signal>) {
        let slot = self.sequencer.claim();
        let pending = self
            .config
            .item_selector(&record)
            .map(|key| {
                let token = self.track_pending(key.clone(), slot.signal());
                (key, token)
            });

        let this = Arc::clone(self);
        self.spawn("add", async move {
            let result = this.add(record, slot, reset).await;
            if let Some((key, token)) = pending {
                this.untrack_pending(&key, token);
            }
            result
        });
    }

    async fn add(
        self: &Arc<Self>,
        record: R,
        mut slot: Slot,
        reset: Option<Signal>,
    ) -> Result<(), ListError> {
        let prepared = self.render(&record).await;

        // Even a failed add settles only after its predecessors, so later
        // appends cannot overtake earlier ones.
        slot.ready().await;
        let fragment = prepared?;

        if let Some(reset) = reset
            && !reset.wait().await
        {
            return Err(ListError::ResetAborted {
                record: describe(&record),
            });
        }

        self.surface.append(&fragment);
        slot.complete();
        debug!("add: appended {}", describe(&record));

        self.spawn_after_hook(Moment::AfterAdd, MomentArgs::Add { record, fragment });
        Ok(())
    }

    /// Template the record and run `beforeAdd` on the unattached fragment.
    async fn render(&self, record: &R) -> Result<Fragment, ListError> {
        let data = self.config.item_data(record);
        let markup = self
            .config
            .item_template()
            .render(data)
            .await
            .map_err(|source| ListError::Template {
                record: describe(record),
                source,
            })?;
        let fragment = Fragment::new(markup);

        self.config
            .hooks()
            .run(
                Moment::BeforeAdd,
                MomentArgs::Add {
                    record: record.clone(),
                    fragment: fragment.clone(),
                },
            )
            .await
            .map_err(|source| ListError::hook(Moment::BeforeAdd, source))?;

        Ok(fragment)
    }

    /// Start removing `record`. If its add is still in flight, the removal
    /// waits for it so the item cannot be appended after being removed.
    pub(super) fn start_remove(self: &Arc<Self>, record: R) {
        let key = self.config.item_selector(&record);
        let pending = key.as_ref().and_then(|key| self.pending_add(key));

        let this = Arc::clone(self);
        self.spawn("remove", async move { this.remove(record, key, pending).await });
    }

    async fn remove(
        self: &Arc<Self>,
        record: R,
        key: Option<LocatorKey>,
        pending: Option<Signal>,
    ) -> Result<(), ListError> {
        if let Some(pending) = pending {
            trace!("remove: waiting for pending add of {}", describe(&record));
            pending.wait().await;
        }

        let fragment = key.as_ref().and_then(|key| self.surface.find(key));

        self.config
            .hooks()
            .run(
                Moment::BeforeRemove,
                MomentArgs::Remove {
                    record: record.clone(),
                    fragment: fragment.clone(),
                },
            )
            .await
            .map_err(|source| ListError::hook(Moment::BeforeRemove, source))?;

        if let Some(fragment) = &fragment {
            self.surface.remove(fragment);
            debug!("remove: detached {}", describe(&record));
        }

        self.spawn_after_hook(
            Moment::AfterRemove,
            MomentArgs::AfterRemove {
                record: record.clone(),
            },
        );

        match fragment {
            Some(_) => Ok(()),
            None => Err(ListError::LocatorMiss {
                record: describe(&record),
                selector: key.map_or_else(|| "<none>".to_string(), |key| key.to_string()),
            }),
        }
    }

    /// Start a reset: clear the root, then add every model in order.
    pub(super) fn start_reset(self: &Arc<Self>, models: Vec<R>) {
        let models: Arc<[R]> = models.into();
        let slot = match self.config.options().reset_ordering {
            ResetOrdering::Sequenced => Some(self.sequencer.claim()),
            ResetOrdering::Concurrent => None,
        };
        let gate = slot.as_ref().map(Slot::signal);

        let this = Arc::clone(self);
        let snapshot = Arc::clone(&models);
        self.spawn("reset", async move { this.reset(snapshot, slot).await });

        for record in models.iter() {
            self.start_add(record.clone(), gate.clone());
        }
    }

    async fn reset(
        self: &Arc<Self>,
        models: Arc<[R]>,
        mut slot: Option<Slot>,
    ) -> Result<(), ListError> {
        let before = self
            .config
            .hooks()
            .run(
                Moment::BeforeReset,
                MomentArgs::BeforeReset {
                    models: Arc::clone(&models),
                    root: self.surface.root(),
                },
            )
            .await;

        if let Some(slot) = slot.as_mut() {
            slot.ready().await;
        }
        before.map_err(|source| ListError::hook(Moment::BeforeReset, source))?;

        self.surface.clear();
        if let Some(slot) = slot {
            slot.complete();
        }
        debug!("reset: cleared, re-rendering {} record(s)", models.len());

        self.spawn_after_hook(Moment::AfterReset, MomentArgs::AfterReset { models });
        Ok(())
    }
}
