#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use listview::prelude::*;
use listview::{HookTable, ListConfigBuilder};

pub fn model(id: i64) -> Model {
    Model::with_id(id)
}

pub fn models(ids: &[i64]) -> Vec<Model> {
    ids.iter().copied().map(model).collect()
}

pub fn builder() -> ListConfigBuilder<Model> {
    ListConfig::builder(Template::item_id())
}

/// A builder whose default fades are instant.
pub fn instant_builder() -> ListConfigBuilder<Model> {
    builder().options(ListOptions::new().with_fade(Duration::ZERO, Default::default()))
}

/// Collects every error a view reports.
#[derive(Clone, Default)]
pub struct Errors(Arc<Mutex<Vec<ListError>>>);

impl Errors {
    pub fn attach(&self, builder: ListConfigBuilder<Model>) -> ListConfigBuilder<Model> {
        let sink = Arc::clone(&self.0);
        builder.on_error(move |error| sink.lock().unwrap().push(error.clone()))
    }

    pub fn take(&self) -> Vec<ListError> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Hooks that log "<moment> <record id>" for every moment ("*" for resets).
pub fn recording_hooks(log: &Arc<Mutex<Vec<String>>>) -> HookTable<Model> {
    let mut table = HookTable::new();
    for moment in Moment::ALL {
        let log = Arc::clone(log);
        table = table.with(
            moment,
            Hook::sync(move |args: MomentArgs<Model>| {
                let subject = args
                    .record()
                    .and_then(Record::id)
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "*".to_string());
                log.lock().unwrap().push(format!("{moment} {subject}"));
                Ok(())
            }),
        );
    }
    table
}

pub fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}
