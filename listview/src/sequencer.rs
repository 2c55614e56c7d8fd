//! Orders surface mutations by notification order.
//!
//! Each mutation claims a [`Slot`] synchronously when its notification
//! arrives. The operation may then suspend freely (templates, hooks), but it
//! only touches the surface once every earlier slot has settled.

use std::sync::Mutex;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::Shared;

/// Resolves when a slot settles.
#[derive(Clone)]
pub(crate) struct Signal {
    rx: Shared<oneshot::Receiver<()>>,
}

impl Signal {
    /// Wait for the slot to settle. Returns true if it completed its
    /// mutation, false if it was abandoned.
    pub(crate) async fn wait(self) -> bool {
        self.rx.await.is_ok()
    }
}

/// A claimed position in the mutation order.
///
/// Dropping a slot without [`Slot::complete`] abandons it; later slots still
/// proceed.
pub(crate) struct Slot {
    previous: Option<Signal>,
    done: oneshot::Sender<()>,
    signal: Signal,
}

impl Slot {
    /// Signal of this slot, for operations that depend on its outcome.
    pub(crate) fn signal(&self) -> Signal {
        self.signal.clone()
    }

    /// Wait until every earlier slot has settled.
    pub(crate) async fn ready(&mut self) {
        if let Some(previous) = self.previous.take() {
            previous.wait().await;
        }
    }

    /// Mark the mutation as done.
    pub(crate) fn complete(self) {
        let _ = self.done.send(());
    }
}

#[derive(Default)]
pub(crate) struct Sequencer {
    tail: Mutex<Option<Signal>>,
}

impl Sequencer {
    pub(crate) fn claim(&self) -> Slot {
        let (done, rx) = oneshot::channel();
        let signal = Signal { rx: rx.shared() };
        let previous = self
            .tail
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(signal.clone());
        Slot {
            previous,
            done,
            signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[tokio::test]
    async fn slots_complete_in_claim_order() {
        let sequencer = Sequencer::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut first = sequencer.claim();
        let mut second = sequencer.claim();

        let log = Arc::clone(&order);
        let late = tokio::spawn(async move {
            second.ready().await;
            log.lock().unwrap().push(2);
            second.complete();
        });
        tokio::task::yield_now().await;
        assert!(order.lock().unwrap().is_empty());

        first.ready().await;
        order.lock().unwrap().push(1);
        first.complete();
        late.await.unwrap();

        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn abandoned_slot_releases_successors() {
        let sequencer = Sequencer::default();
        let first = sequencer.claim();
        let signal = first.signal();
        let mut second = sequencer.claim();

        drop(first);
        second.ready().await;

        assert!(!signal.wait().await);
    }

    #[tokio::test]
    async fn completed_slot_reports_success() {
        let sequencer = Sequencer::default();
        let slot = sequencer.claim();
        let signal = slot.signal();

        slot.complete();

        assert!(signal.wait().await);
    }
}
