//! List view configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use listdom::{Easing, LocatorKey, TransitionConfig};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ConfigError, ListError};
use crate::hooks::{Hook, HookTable, Moment};
use crate::record::Record;
use crate::template::Template;

/// Projects a record to the data handed to the item template.
pub type ItemData<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// Maps a record to the key of its rendered item. `None` means the record
/// cannot be located.
pub type ItemSelector<R> = Arc<dyn Fn(&R) -> Option<LocatorKey> + Send + Sync>;

/// Receives every operation failure.
pub type ErrorHandler = Arc<dyn Fn(&ListError) + Send + Sync>;

/// How a reset's clear step is ordered against its re-population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetOrdering {
    /// Re-populated items are appended only after `beforeReset` resolved and
    /// the root was cleared. If `beforeReset` fails they are not appended.
    #[default]
    Sequenced,
    /// Re-population starts right away, without waiting for `beforeReset`.
    /// A slow `beforeReset` can clear items that were already re-appended.
    Concurrent,
}

/// Tunables for a list view.
///
/// Can be deserialized, with the fade duration given in milliseconds:
///
/// ```
/// use std::time::Duration;
/// use listview::{ListOptions, ResetOrdering};
///
/// let options: ListOptions = serde_json::from_str(
///     r#"{"reset_ordering": "concurrent", "fade": {"duration_ms": 250, "easing": "ease_out"}}"#,
/// ).unwrap();
/// assert_eq!(options.reset_ordering, ResetOrdering::Concurrent);
/// assert_eq!(options.fade.duration, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    /// Default: `Sequenced`
    pub reset_ordering: ResetOrdering,

    /// Transition used by the default fade-in / fade-out hooks.
    ///
    /// Default: 400ms, ease-in-out
    #[serde(deserialize_with = "fade_from_millis")]
    pub fade: TransitionConfig,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            reset_ordering: ResetOrdering::Sequenced,
            fade: TransitionConfig::new(Duration::from_millis(400), Easing::EaseInOut),
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reset_ordering(mut self, ordering: ResetOrdering) -> Self {
        self.reset_ordering = ordering;
        self
    }

    pub fn with_fade(mut self, duration: Duration, easing: Easing) -> Self {
        self.fade = TransitionConfig::new(duration, easing);
        self
    }
}

fn fade_from_millis<'de, D>(deserializer: D) -> Result<TransitionConfig, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Fade {
        duration_ms: u64,
        #[serde(default)]
        easing: Easing,
    }

    let fade = Fade::deserialize(deserializer)?;
    Ok(TransitionConfig::new(
        Duration::from_millis(fade.duration_ms),
        fade.easing,
    ))
}

/// Selector of a record's rendered item when none is configured: `#<id>`.
pub fn default_selector<R: Record>(record: &R) -> Option<LocatorKey> {
    record.id().map(|id| LocatorKey::id(id.as_str()))
}

/// Immutable configuration of a list view.
///
/// # Example
///
/// ```
/// use listview::{Hook, ListConfig, Model, Moment, Template};
///
/// let config: ListConfig<Model> = ListConfig::builder(Template::item_id())
///     .hook(Moment::AfterAdd, Hook::noop())
///     .build();
/// assert!(config.hooks().contains(Moment::BeforeAdd));
/// ```
pub struct ListConfig<R> {
    item_data: ItemData<R>,
    item_template: Template,
    item_selector: ItemSelector<R>,
    hooks: HookTable<R>,
    options: ListOptions,
    error_handler: Option<ErrorHandler>,
}

impl<R> fmt::Debug for ListConfig<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConfig")
            .field("item_template", &self.item_template)
            .field("hooks", &self.hooks)
            .field("options", &self.options)
            .field("error_handler", &self.error_handler.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: Record> ListConfig<R> {
    /// Start building a configuration around the required item template.
    pub fn builder(item_template: Template) -> ListConfigBuilder<R> {
        ListConfigBuilder::new(item_template)
    }

    pub fn item_data(&self, record: &R) -> Value {
        (self.item_data)(record)
    }

    pub fn item_template(&self) -> &Template {
        &self.item_template
    }

    pub fn item_selector(&self, record: &R) -> Option<LocatorKey> {
        (self.item_selector)(record)
    }

    /// The effective hooks: defaults with the caller's overrides applied.
    pub fn hooks(&self) -> &HookTable<R> {
        &self.hooks
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub(crate) fn error_handler(&self) -> Option<&ErrorHandler> {
        self.error_handler.as_ref()
    }
}

/// Builder for [`ListConfig`].
pub struct ListConfigBuilder<R> {
    item_data: Option<ItemData<R>>,
    item_template: Template,
    item_selector: Option<ItemSelector<R>>,
    overrides: HookTable<R>,
    defaults: bool,
    options: ListOptions,
    error_handler: Option<ErrorHandler>,
}

impl<R: Record> ListConfigBuilder<R> {
    fn new(item_template: Template) -> Self {
        Self {
            item_data: None,
            item_template,
            item_selector: None,
            overrides: HookTable::new(),
            defaults: true,
            options: ListOptions::default(),
            error_handler: None,
        }
    }

    /// Project records before templating. Defaults to `Record::attributes`.
    pub fn item_data<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.item_data = Some(Arc::new(f));
        self
    }

    /// Locate rendered items. Defaults to `#<id>`.
    pub fn item_selector<F>(mut self, f: F) -> Self
    where
        F: Fn(&R) -> Option<LocatorKey> + Send + Sync + 'static,
    {
        self.item_selector = Some(Arc::new(f));
        self
    }

    /// Override the hook for one moment.
    pub fn hook(mut self, moment: Moment, hook: Hook<R>) -> Self {
        self.overrides = self.overrides.with(moment, hook);
        self
    }

    /// Override a hook by lifecycle name. Unknown names are rejected.
    pub fn hook_named(mut self, name: &str, hook: Hook<R>) -> Result<Self, ConfigError> {
        self.overrides = self.overrides.with_named(name, hook)?;
        Ok(self)
    }

    /// Override several hooks at once.
    pub fn hooks(mut self, overrides: HookTable<R>) -> Self {
        self.overrides = overrides.merged_over(&self.overrides);
        self
    }

    /// Start from an empty hook table instead of the default fades.
    pub fn without_default_hooks(mut self) -> Self {
        self.defaults = false;
        self
    }

    pub fn options(mut self, options: ListOptions) -> Self {
        self.options = options;
        self
    }

    /// Called with every operation failure, after it has been logged.
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ListError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> ListConfig<R> {
        let base = if self.defaults {
            HookTable::defaults(&self.options)
        } else {
            HookTable::new()
        };

        ListConfig {
            item_data: self
                .item_data
                .unwrap_or_else(|| Arc::new(|record: &R| record.attributes())),
            item_template: self.item_template,
            item_selector: self
                .item_selector
                .unwrap_or_else(|| Arc::new(default_selector::<R>)),
            hooks: self.overrides.merged_over(&base),
            options: self.options,
            error_handler: self.error_handler,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::record::Model;

    #[test]
    fn default_selector_uses_id() {
        let key = default_selector(&Model::with_id(7)).unwrap();
        assert_eq!(key, LocatorKey::id("7"));
        assert_eq!(key.to_string(), "#7");
        assert_eq!(default_selector(&Model::new()), None);
    }

    #[test]
    fn default_item_data_is_attributes() {
        let config: ListConfig<Model> = ListConfig::builder(Template::item_id()).build();
        let record = Model::with_id(1).set("name", "apple");
        assert_eq!(config.item_data(&record), json!({"id": 1, "name": "apple"}));
    }

    #[test]
    fn custom_bindings_replace_defaults() {
        let config: ListConfig<Model> = ListConfig::builder(Template::item_id())
            .item_data(|record: &Model| json!({ "id": record.get("sku").cloned() }))
            .item_selector(|record: &Model| {
                record
                    .get("sku")
                    .and_then(Value::as_str)
                    .map(|sku| LocatorKey::data("sku", sku))
            })
            .build();
        let record = Model::with_id(1).set("sku", "A-1");

        assert_eq!(config.item_data(&record), json!({"id": "A-1"}));
        assert_eq!(config.item_selector(&record), Some(LocatorKey::data("sku", "A-1")));
    }

    #[test]
    fn unknown_hook_name_is_rejected() {
        let result = ListConfig::<Model>::builder(Template::item_id())
            .hook_named("beforeDestroy", Hook::noop());
        assert!(matches!(result, Err(ConfigError::UnknownHook(name)) if name == "beforeDestroy"));
    }

    #[test]
    fn without_default_hooks_leaves_table_empty() {
        let config = ListConfig::<Model>::builder(Template::item_id())
            .without_default_hooks()
            .hook(Moment::AfterReset, Hook::noop())
            .build();
        for moment in Moment::ALL {
            assert_eq!(config.hooks().contains(moment), moment == Moment::AfterReset);
        }
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ListOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ListOptions::default());

        let options: ListOptions =
            serde_json::from_str(r#"{"fade": {"duration_ms": 0}}"#).unwrap();
        assert_eq!(options.fade, TransitionConfig::instant());
    }
}
