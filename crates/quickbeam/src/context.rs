//! Evaluation context configuration

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::module::ModuleRegistry;

/// Default ceiling on nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Default blocking timeout for channel send/receive, in milliseconds.
pub const DEFAULT_CHANNEL_TIMEOUT_MS: u64 = 5000;

/// Runtime tunables, loadable from JSON.
///
/// Missing fields fall back to their defaults:
///
/// ```
/// use quickbeam::RuntimeConfig;
///
/// let config = RuntimeConfig::from_json(r#"{ "max_call_depth": 64 }"#).unwrap();
/// assert_eq!(config.max_call_depth, 64);
/// assert_eq!(config.channel_timeout_ms, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum call depth (stack overflow protection)
    pub max_call_depth: usize,

    /// How long a blocking channel operation waits before failing
    pub channel_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            channel_timeout_ms: DEFAULT_CHANNEL_TIMEOUT_MS,
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration document.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

/// Configuration and shared state for evaluation.
///
/// This is passed through all evaluation calls and cloned into every
/// spawned task. Everything it shares is read-only or internally
/// synchronized.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum call depth (stack overflow protection)
    pub max_call_depth: usize,

    /// Blocking timeout captured by channels created under this context
    pub channel_timeout: Duration,

    /// Module loader used by `import`, if the host installed one
    pub modules: Option<Arc<ModuleRegistry>>,

    /// Modules whose programs are running under this context, outermost
    /// first. Travels into spawned tasks with the rest of the context.
    pub(crate) loading: Arc<Vec<String>>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Create a context from loaded configuration.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            max_call_depth: config.max_call_depth,
            channel_timeout: Duration::from_millis(config.channel_timeout_ms),
            modules: None,
            loading: Arc::default(),
        }
    }

    /// Install a module registry (builder pattern).
    pub fn with_modules(mut self, modules: Arc<ModuleRegistry>) -> Self {
        self.modules = Some(modules);
        self
    }

    /// Override the channel timeout (builder pattern).
    pub fn with_channel_timeout(mut self, timeout: Duration) -> Self {
        self.channel_timeout = timeout;
        self
    }

    /// Whether module `name` is being loaded by this context or one of
    /// the contexts it was derived from.
    pub fn is_loading(&self, name: &str) -> bool {
        self.loading.iter().any(|module| module == name)
    }

    /// The context a module's own program runs under.
    pub(crate) fn entering_module(&self, name: &str) -> Self {
        let mut loading = Vec::clone(&self.loading);
        loading.push(name.to_string());
        Self {
            loading: Arc::new(loading),
            ..self.clone()
        }
    }
}
