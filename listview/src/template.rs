//! Item templates: turn item data into markup.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use listdom::Element;
use serde_json::Value;

use crate::error::TemplateError;
use crate::record::RecordId;

/// What a template produces: an unattached element tree.
pub type Markup = Element;

type TemplateFn = dyn Fn(Value) -> BoxFuture<'static, Result<Markup, TemplateError>> + Send + Sync;

/// Renders item data to markup, possibly asynchronously.
#[derive(Clone)]
pub struct Template {
    f: Arc<TemplateFn>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Template(..)")
    }
}

impl Template {
    /// An asynchronous template. The add operation waits for its result.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Markup, TemplateError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |data| f(data).boxed()),
        }
    }

    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Markup, TemplateError> + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(move |data| future::ready(f(&data)).boxed()),
        }
    }

    /// `<li id="{id}">Item id: {id}</li>`, failing when the data has no `id`.
    pub fn item_id() -> Self {
        Self::sync(|data| {
            let id = data
                .get("id")
                .and_then(RecordId::from_value)
                .ok_or_else(|| TemplateError::new("item data has no id"))?;
            Ok(Element::li().id(id.as_str()).text(format!("Item id: {id}")))
        })
    }

    pub fn render(&self, data: Value) -> BoxFuture<'static, Result<Markup, TemplateError>> {
        (self.f)(data)
    }
}
