//! Runtime environment managing variable and function bindings

mod frame;
mod prelude;

pub use frame::{CallGuard, ScopeGuard};

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::DEFAULT_MAX_CALL_DEPTH;
use crate::error::EnvironmentError;
use crate::value::{BuiltinFn, Value};

/// A single variable or function binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The bound value
    pub value: Value,

    /// Whether reassignment is rejected
    pub constant: bool,
}

/// One lexical scope.
pub type Frame = HashMap<String, Binding>;

/// The runtime environment managing variable and function bindings.
///
/// A chain of frames, innermost last. Each frame's parent is the frame
/// below it and the bottom frame is the root, so the chain can never
/// form a cycle. Lookup walks from the innermost frame outward.
///
/// # Example
///
/// ```
/// use quickbeam::{Environment, Value};
///
/// let mut env = Environment::new();
///
/// // Global scope
/// env.define("x", Value::Int(1));
///
/// // Enter a new scope
/// env.push_frame();
/// env.define("y", Value::Int(2));
/// env.define("x", Value::Int(10)); // Shadows outer x
///
/// assert_eq!(env.get("x"), Ok(&Value::Int(10))); // Gets inner x
/// assert_eq!(env.get("y"), Ok(&Value::Int(2)));
///
/// // Exit scope
/// env.pop_frame().unwrap();
///
/// assert_eq!(env.get("x"), Ok(&Value::Int(1))); // Back to outer x
/// assert!(env.get("y").is_err()); // y is gone
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    /// Scope chain, root first
    frames: Vec<Frame>,

    /// Current call depth (for recursion limiting)
    call_depth: usize,

    /// Maximum allowed call depth
    max_call_depth: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new empty environment.
    pub fn new() -> Self {
        Self::with_max_call_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    /// Create an environment with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            frames: vec![Frame::new()],
            call_depth: 0,
            max_call_depth: max_depth,
        }
    }

    /// Create an isolated environment whose root holds a copy of `snapshot`.
    ///
    /// Used by tasks: nothing in the result is shared with the environment
    /// the snapshot was taken from.
    pub fn from_snapshot(snapshot: HashMap<String, Value>, max_depth: usize) -> Self {
        let root = snapshot
            .into_iter()
            .map(|(name, value)| {
                (
                    name,
                    Binding {
                        value,
                        constant: false,
                    },
                )
            })
            .collect();
        Self {
            frames: vec![root],
            call_depth: 0,
            max_call_depth: max_depth,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Frame Management (Scope Entry/Exit)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a new scope (push a frame).
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Exit the current scope (pop a frame).
    ///
    /// # Errors
    ///
    /// `RootFramePop` if only the root frame is left; the environment is
    /// unchanged in that case.
    pub fn pop_frame(&mut self) -> Result<(), EnvironmentError> {
        if self.frames.len() <= 1 {
            return Err(EnvironmentError::RootFramePop);
        }
        self.frames.pop();
        Ok(())
    }

    /// Get the current scope depth (number of frames).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if we're at global scope.
    pub fn is_global_scope(&self) -> bool {
        self.frames.len() == 1
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking (Stack Overflow Protection)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a function: bump the call depth and push its frame.
    ///
    /// # Errors
    ///
    /// `RecursionLimitExceeded` when the call would exceed the ceiling.
    /// Neither the depth nor the frames change on failure.
    pub fn push_function_frame(&mut self) -> Result<(), EnvironmentError> {
        if self.call_depth >= self.max_call_depth {
            return Err(EnvironmentError::RecursionLimitExceeded {
                depth: self.call_depth,
                max: self.max_call_depth,
            });
        }
        self.call_depth += 1;
        self.push_frame();
        Ok(())
    }

    /// Leave a function: pop its frame and drop the call depth.
    pub fn pop_function_frame(&mut self) -> Result<(), EnvironmentError> {
        self.pop_frame()?;
        self.call_depth = self.call_depth.saturating_sub(1);
        Ok(())
    }

    /// Get current call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Get the call depth ceiling.
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    fn current_frame(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::new());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Bind `name` in the innermost frame, replacing any binding of the
    /// same name in that frame.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.current_frame().insert(
            name.into(),
            Binding {
                value,
                constant: false,
            },
        );
    }

    /// Bind a constant in the innermost frame.
    pub fn define_constant(&mut self, name: impl Into<String>, value: Value) {
        self.current_frame().insert(
            name.into(),
            Binding {
                value,
                constant: true,
            },
        );
    }

    /// Register a built-in function.
    pub fn define_builtin(&mut self, builtin: BuiltinFn) {
        let name = builtin.name.clone();
        self.define(name, Value::Callable(Arc::new(builtin)));
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding and return the full Binding struct.
    pub fn get_binding(&self, name: &str) -> Option<&Binding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Look up a value by name, innermost frame first.
    pub fn get(&self, name: &str) -> Result<&Value, EnvironmentError> {
        self.get_binding(name)
            .map(|b| &b.value)
            .ok_or_else(|| EnvironmentError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Check if a binding exists anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.get_binding(name).is_some()
    }

    /// Check if a binding exists in the current (innermost) scope only.
    pub fn contains_in_current_scope(&self, name: &str) -> bool {
        self.frames
            .last()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Assignment (Mutation)
    // ═══════════════════════════════════════════════════════════════════

    /// Assign a new value to the nearest existing binding of `name`.
    ///
    /// # Errors
    ///
    /// - `UndefinedVariable` if the binding doesn't exist
    /// - `ConstantAssignment` if the nearest binding is a constant
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        let binding = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
            .ok_or_else(|| EnvironmentError::UndefinedVariable {
                name: name.to_string(),
            })?;

        if binding.constant {
            return Err(EnvironmentError::ConstantAssignment {
                name: name.to_string(),
            });
        }
        binding.value = value;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Every visible binding as a value copy, innermost binding winning.
    pub fn flatten(&self) -> HashMap<String, Value> {
        let mut all = HashMap::new();
        for frame in &self.frames {
            for (name, binding) in frame {
                all.insert(name.clone(), binding.value.clone());
            }
        }
        all
    }

    /// Get all binding names in the current scope.
    pub fn names_in_current_scope(&self) -> Vec<&str> {
        self.frames
            .last()
            .map(|frame| frame.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default()
    }

    /// Get the number of bindings across all frames.
    pub fn len(&self) -> usize {
        self.frames.iter().map(|f| f.len()).sum()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
