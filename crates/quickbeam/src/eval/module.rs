//! `export` and `import` evaluation

use indexmap::IndexMap;

use super::{ControlFlow, Evaluate};
use crate::ast::{Expr, ImportSpec};
use crate::module::EXPORT_PREFIX;
use crate::{Environment, EvalContext, EvalError, Value};

/// `export declaration`
///
/// Runs the declaration, then records the value now bound to `name` as an
/// export. The declaration's own result is passed through.
pub fn eval_export(
    name: &str,
    declaration: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let flow = declaration.eval(env, ctx)?;
    if let Some(binding) = env.get_binding(name) {
        let value = binding.value.clone();
        env.define(format!("{EXPORT_PREFIX}{name}"), value);
    }
    Ok(flow)
}

/// `import module`, `import { a, b } from module`, `import * as m from module`
pub fn eval_import(
    module: &str,
    spec: &ImportSpec,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let registry = ctx.modules.as_ref().ok_or_else(|| EvalError::Module {
        module: module.to_string(),
        message: "no module loader installed".to_string(),
    })?;
    let loaded = registry.load(module, ctx)?;

    match spec {
        ImportSpec::All => {
            for (name, value) in &loaded.exports {
                env.define(name.clone(), value.clone());
            }
        }
        ImportSpec::Items(items) => {
            for item in items {
                let value = loaded.get(item).ok_or_else(|| EvalError::Module {
                    module: module.to_string(),
                    message: format!("module does not export `{item}`"),
                })?;
                env.define(item.clone(), value.clone());
            }
        }
        ImportSpec::Alias(alias) => {
            let fields: IndexMap<String, Value> = loaded.exports.clone();
            env.define(alias.clone(), Value::object(fields));
        }
    }

    Ok(ControlFlow::nil())
}
