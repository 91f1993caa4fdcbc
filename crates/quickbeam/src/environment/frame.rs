//! RAII guards for automatic frame cleanup

use super::Environment;
use crate::error::EnvironmentError;

/// RAII guard that automatically pops a frame when dropped.
///
/// # Example
///
/// ```
/// use quickbeam::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.define("x", Value::Int(1));
///
/// {
///     let mut guard = env.scope_guard();
///     guard.define("y", Value::Int(2));
///     // y is visible here
/// }
/// // guard dropped, frame popped, y is gone
/// assert!(!env.contains("y"));
/// assert!(env.contains("x"));
/// ```
pub struct ScopeGuard<'a> {
    env: &'a mut Environment,
}

/// RAII guard for a function call: holds one frame and one unit of call
/// depth, releasing both on drop.
pub struct CallGuard<'a> {
    env: &'a mut Environment,
}

impl Environment {
    /// Create a scope guard that pushes a frame now and pops it on drop.
    pub fn scope_guard(&mut self) -> ScopeGuard<'_> {
        self.push_frame();
        ScopeGuard { env: self }
    }

    /// Enter a function call, returning a guard that leaves it on drop.
    ///
    /// # Errors
    ///
    /// `RecursionLimitExceeded` if the ceiling is reached; nothing is
    /// pushed in that case.
    pub fn call_guard(&mut self) -> Result<CallGuard<'_>, EnvironmentError> {
        self.push_function_frame()?;
        Ok(CallGuard { env: self })
    }
}

impl<'a> Drop for ScopeGuard<'a> {
    fn drop(&mut self) {
        // The guard pushed this frame, so it is never the root.
        let _ = self.env.pop_frame();
    }
}

impl<'a> Drop for CallGuard<'a> {
    fn drop(&mut self) {
        let _ = self.env.pop_function_frame();
    }
}

impl<'a> std::ops::Deref for ScopeGuard<'a> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl<'a> std::ops::DerefMut for ScopeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

impl<'a> std::ops::Deref for CallGuard<'a> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl<'a> std::ops::DerefMut for CallGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}
