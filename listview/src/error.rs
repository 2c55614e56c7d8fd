//! Error types

use thiserror::Error;

use crate::hooks::Moment;

/// A lifecycle hook failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    pub message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The item template failed to produce markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TemplateError {
    pub message: String,
}

impl TemplateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of a single list operation.
///
/// These never stop the view; they are logged and passed to the
/// `on_error` callback, and the view keeps processing notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// The template failed; the record was not appended.
    #[error("template failed for record {record}: {source}")]
    Template {
        record: String,
        #[source]
        source: TemplateError,
    },

    /// A hook failed. For before-hooks the operation stopped at that point.
    #[error("{moment} hook failed: {source}")]
    Hook {
        moment: Moment,
        #[source]
        source: HookError,
    },

    /// No rendered item matched the record. Hooks still ran.
    #[error("no rendered item for record {record} (selector {selector})")]
    LocatorMiss { record: String, selector: String },

    /// The reset this item was re-populating failed, so it was not appended.
    #[error("reset aborted before record {record} was re-rendered")]
    ResetAborted { record: String },
}

impl ListError {
    pub fn hook(moment: Moment, source: HookError) -> Self {
        Self::Hook { moment, source }
    }
}

/// Errors raised while building a list configuration or view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown hook name: {0}")]
    UnknownHook(String),

    #[error("list views must be created inside a tokio runtime")]
    NoRuntime,
}
