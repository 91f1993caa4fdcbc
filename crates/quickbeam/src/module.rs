//! Module loading
//!
//! The runtime does no source I/O and has no parser. An embedder supplies a
//! [`ModuleSource`] that reads module text and a [`SourceTranslator`] that
//! turns it into expressions; the [`ModuleRegistry`] runs the result in a
//! fresh environment and keeps the exports.
//!
//! A module exports a binding through `export`, which stores the value a
//! second time under `__export_<name>`. Exported functions are rebound to
//! the module's final bindings, so they keep seeing the module's private
//! state wherever they are called. Loaded modules are cached by name for
//! the lifetime of the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Context as _;
use dashmap::DashMap;
use indexmap::IndexMap;
use tracing::debug;

use crate::ast::Expr;
use crate::evaluator::run_program;
use crate::{Environment, EvalContext, EvalError, Value};

/// Prefix of the bindings a module exports.
pub const EXPORT_PREFIX: &str = "__export_";

/// Reads the source text of a module.
pub trait ModuleSource: Send + Sync {
    /// Return the text of module `name`.
    fn read(&self, name: &str) -> anyhow::Result<String>;
}

/// Turns module source text into a program.
pub trait SourceTranslator: Send + Sync {
    /// Translate `source` into top-level expressions.
    fn translate(&self, source: &str) -> anyhow::Result<Vec<Expr>>;
}

/// A loaded module.
#[derive(Debug, Clone)]
pub struct Module {
    /// Name it was loaded under
    pub name: String,

    /// Exported bindings, ordered by name
    pub exports: IndexMap<String, Value>,
}

impl Module {
    /// Look up one export.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.exports.get(name)
    }
}

/// Loads and caches modules.
pub struct ModuleRegistry {
    source: Box<dyn ModuleSource>,
    translator: Box<dyn SourceTranslator>,
    cache: DashMap<String, Arc<Module>>,
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("loaded", &self.loaded_names())
            .finish()
    }
}

impl ModuleRegistry {
    /// Create a registry over the embedder's source and translator.
    pub fn new(
        source: impl ModuleSource + 'static,
        translator: impl SourceTranslator + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            translator: Box::new(translator),
            cache: DashMap::new(),
        }
    }

    /// Load module `name`, or return the cached copy.
    ///
    /// # Errors
    ///
    /// `EvalError::Module` if the source cannot be read or translated, if
    /// the module imports itself (directly, through others, or from a task
    /// it spawns), or if its
    /// program fails.
    pub fn load(&self, name: &str, ctx: &EvalContext) -> Result<Arc<Module>, EvalError> {
        if let Some(module) = self.cache.get(name) {
            return Ok(Arc::clone(module.value()));
        }

        if ctx.is_loading(name) {
            return Err(module_error(name, "circular import"));
        }

        let module = Arc::new(self.load_uncached(name, &ctx.entering_module(name))?);
        debug!(module = name, exports = module.exports.len(), "module loaded");
        // A concurrent load of the same name may have won; keep its copy.
        let cached = Arc::clone(self.cache.entry(name.to_string()).or_insert(module).value());
        Ok(cached)
    }

    fn load_uncached(&self, name: &str, ctx: &EvalContext) -> Result<Module, EvalError> {
        let program = self
            .read_program(name)
            .map_err(|err| module_error(name, format!("{err:#}")))?;

        let mut env = Environment::with_max_call_depth(ctx.max_call_depth);
        env.load_prelude();
        run_program(&program, &mut env, ctx).map_err(|err| module_error(name, err.to_string()))?;

        let home = env.flatten();
        let mut exports: Vec<(String, Value)> = home
            .iter()
            .filter_map(|(binding, value)| {
                binding
                    .strip_prefix(EXPORT_PREFIX)
                    .map(|export| (export.to_string(), rehome(value, &home)))
            })
            .collect();
        exports.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Module {
            name: name.to_string(),
            exports: exports.into_iter().collect(),
        })
    }

    fn read_program(&self, name: &str) -> anyhow::Result<Vec<Expr>> {
        let source = self
            .source
            .read(name)
            .with_context(|| format!("failed to read module `{name}`"))?;
        self.translator
            .translate(&source)
            .with_context(|| format!("failed to translate module `{name}`"))
    }

    /// Whether `name` has been loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Names of every cached module, sorted.
    pub fn loaded_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cache.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }
}

fn rehome(value: &Value, home: &HashMap<String, Value>) -> Value {
    match value {
        Value::Callable(f) => f.rebind(home).unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

fn module_error(module: &str, message: impl Into<String>) -> EvalError {
    EvalError::Module {
        module: module.to_string(),
        message: message.into(),
    }
}
