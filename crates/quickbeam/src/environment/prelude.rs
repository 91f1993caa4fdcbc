//! Standard prelude with built-in functions

use std::sync::Arc;

use super::Environment;
use crate::error::{type_name, ErrorCode, ErrorKind, StructuredError};
use crate::eval::call::call_value;
use crate::task::{Channel, ChannelError, Promise};
use crate::value::{BuiltinFn, Value};
use crate::{EvalContext, EvalError};

impl Environment {
    /// Create an environment with standard built-in functions.
    pub fn with_prelude() -> Self {
        let mut env = Self::new();
        env.load_prelude();
        env
    }

    /// Load the standard prelude into this environment.
    pub fn load_prelude(&mut self) {
        // Printing
        self.define_builtin(BuiltinFn::new("print", -1, builtin_print));
        self.define_builtin(BuiltinFn::new("println", -1, builtin_println));

        // Inspection and conversion
        self.define_builtin(BuiltinFn::new("len", 1, builtin_len));
        self.define_builtin(BuiltinFn::new("type_of", 1, builtin_type_of));
        self.define_builtin(BuiltinFn::new("str", 1, |args, _, _| {
            Ok(Value::string(args[0].to_text()))
        }));
        self.define_builtin(BuiltinFn::new("int", 1, |args, _, _| {
            Ok(Value::Int(args[0].to_int()))
        }));
        self.define_builtin(BuiltinFn::new("float", 1, |args, _, _| {
            Ok(Value::Float(args[0].to_float()))
        }));

        // Higher-order
        self.define_builtin(BuiltinFn::new("map", 2, builtin_map));
        self.define_builtin(BuiltinFn::new("filter", 2, builtin_filter));
        self.define_builtin(BuiltinFn::new("reduce", 3, builtin_reduce));

        // Channels
        self.define_builtin(BuiltinFn::new("channel", -1, builtin_channel));
        self.define_builtin(BuiltinFn::new("send", 2, |args, _, _| {
            channel_arg("send", &args[0])?.send(args[1].clone())?;
            Ok(Value::Nil)
        }));
        self.define_builtin(BuiltinFn::new("receive", 1, |args, _, _| {
            Ok(channel_arg("receive", &args[0])?.recv()?)
        }));
        self.define_builtin(BuiltinFn::new("try_send", 2, |args, _, _| {
            let sent = channel_arg("try_send", &args[0])?.try_send(args[1].clone());
            Ok(Value::Bool(sent.is_ok()))
        }));
        self.define_builtin(BuiltinFn::new("try_receive", 1, builtin_try_receive));
        self.define_builtin(BuiltinFn::new("close", 1, |args, _, _| {
            channel_arg("close", &args[0])?.close();
            Ok(Value::Nil)
        }));
        self.define_builtin(BuiltinFn::new("drain", 1, builtin_drain));
        self.define_builtin(BuiltinFn::new("range", 1, builtin_range));
        self.define_builtin(BuiltinFn::new("cap", 1, |args, _, _| {
            Ok(Value::from(channel_arg("cap", &args[0])?.capacity()))
        }));

        // Results
        self.define_builtin(BuiltinFn::new("Ok", 1, |args, _, _| Ok(Value::ok(args[0].clone()))));
        self.define_builtin(BuiltinFn::new("Err", 1, |args, _, _| {
            Ok(Value::err(args[0].clone()))
        }));
        self.define_builtin(BuiltinFn::new("is_ok", 1, |args, _, _| {
            Ok(Value::Bool(result_arg("is_ok", &args[0])?.is_ok()))
        }));
        self.define_builtin(BuiltinFn::new("is_err", 1, |args, _, _| {
            Ok(Value::Bool(result_arg("is_err", &args[0])?.is_err()))
        }));
        self.define_builtin(BuiltinFn::new("unwrap", 1, builtin_unwrap));
        self.define_builtin(BuiltinFn::new("unwrap_or", 2, |args, _, _| {
            match result_arg("unwrap_or", &args[0])? {
                Ok(value) => Ok(value.clone()),
                Err(_) => Ok(args[1].clone()),
            }
        }));

        // Promises
        self.define_builtin(BuiltinFn::new("all", 1, |args, _, _| {
            let items = array_arg("all", &args[0])?.to_vec();
            Ok(Value::Promise(Promise::all(items)))
        }));
        self.define_builtin(BuiltinFn::new("any", 1, |args, _, _| {
            let items = array_arg("any", &args[0])?.to_vec();
            Ok(Value::Promise(Promise::any(items)))
        }));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Argument helpers
// ═══════════════════════════════════════════════════════════════════════

fn expected(function: &str, what: &str, got: &Value) -> EvalError {
    EvalError::builtin(
        function,
        format!("expected {what}, got `{}`", type_name(got)),
    )
}

fn channel_arg<'a>(function: &str, value: &'a Value) -> Result<&'a Arc<Channel>, EvalError> {
    value
        .as_channel()
        .ok_or_else(|| expected(function, "a channel", value))
}

fn array_arg<'a>(function: &str, value: &'a Value) -> Result<&'a [Value], EvalError> {
    value
        .as_array()
        .ok_or_else(|| expected(function, "an array", value))
}

fn result_arg<'a>(
    function: &str,
    value: &'a Value,
) -> Result<&'a std::result::Result<Value, Value>, EvalError> {
    match value {
        Value::Result(result) => Ok(&**result),
        other => Err(expected(function, "a result", other)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn builtin_print(
    args: &[Value],
    _env: &mut Environment,
    _ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let line = args
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    print!("{line}");
    Ok(Value::Nil)
}

fn builtin_println(
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    builtin_print(args, env, ctx)?;
    println!();
    Ok(Value::Nil)
}

fn builtin_len(
    args: &[Value],
    _env: &mut Environment,
    _ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let len = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(items) | Value::Tuple(items) => items.len(),
        Value::Object(fields) => fields.len(),
        Value::Channel(channel) => channel.len(),
        other => return Err(expected("len", "a string, array, object or channel", other)),
    };
    Ok(Value::from(len))
}

fn builtin_type_of(
    args: &[Value],
    _env: &mut Environment,
    _ctx: &EvalContext,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Struct(s) => Ok(Value::string(s.type_name.as_str())),
        other => Ok(Value::string(type_name(other))),
    }
}

fn builtin_map(
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let items = array_arg("map", &args[0])?;
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(call_value(&args[1], vec![item.clone()], env, ctx)?);
    }
    Ok(Value::array(mapped))
}

fn builtin_filter(
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let items = array_arg("filter", &args[0])?;
    let mut kept = Vec::new();
    for item in items {
        if call_value(&args[1], vec![item.clone()], env, ctx)?.is_truthy() {
            kept.push(item.clone());
        }
    }
    Ok(Value::array(kept))
}

/// `reduce(array, fn(acc, item), initial)`
fn builtin_reduce(
    args: &[Value],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let items = array_arg("reduce", &args[0])?;
    let mut acc = args[2].clone();
    for item in items {
        acc = call_value(&args[1], vec![acc, item.clone()], env, ctx)?;
    }
    Ok(acc)
}

/// `channel()` is a rendezvous channel, `channel(n)` buffers `n` values.
fn builtin_channel(
    args: &[Value],
    _env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let capacity = match args {
        [] => 0,
        [Value::Int(n)] if *n >= 0 => *n as usize,
        [Value::Int(n)] => {
            return Err(EvalError::builtin(
                "channel",
                format!("capacity must not be negative, got {n}"),
            ))
        }
        [other] => return Err(expected("channel", "an int capacity", other)),
        _ => {
            return Err(EvalError::ArgumentCount {
                name: "channel".to_string(),
                expected: 1,
                got: args.len(),
            })
        }
    };
    Ok(Value::Channel(Arc::new(Channel::new(
        capacity,
        ctx.channel_timeout,
    ))))
}

/// Non-blocking receive reported as a result value instead of an error.
fn builtin_try_receive(
    args: &[Value],
    _env: &mut Environment,
    _ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let channel = channel_arg("try_receive", &args[0])?;
    match channel.try_recv() {
        Ok(value) => Ok(Value::ok(value)),
        Err(err) => {
            let code = match err {
                ChannelError::Empty => ErrorCode::EmptyContainer,
                _ => ErrorCode::InvalidOperation,
            };
            Ok(StructuredError::new(ErrorKind::Runtime, code, err.to_string())
                .with_context("try_receive")
                .into_err_value())
        }
    }
}

/// Take every value currently buffered, without waiting.
fn builtin_drain(
    args: &[Value],
    _env: &mut Environment,
    _ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let channel = channel_arg("drain", &args[0])?;
    let mut drained = Vec::new();
    while let Ok(value) = channel.try_recv() {
        drained.push(value);
    }
    Ok(Value::array(drained))
}

/// Receive until the channel is closed and drained.
fn builtin_range(
    args: &[Value],
    _env: &mut Environment,
    _ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let channel = channel_arg("range", &args[0])?;
    let mut received = Vec::new();
    loop {
        match channel.recv() {
            Ok(value) => received.push(value),
            Err(ChannelError::Closed) => return Ok(Value::array(received)),
            Err(err) => return Err(err.into()),
        }
    }
}

fn builtin_unwrap(
    args: &[Value],
    _env: &mut Environment,
    _ctx: &EvalContext,
) -> Result<Value, EvalError> {
    match result_arg("unwrap", &args[0])? {
        Ok(value) => Ok(value.clone()),
        Err(reason) => Err(EvalError::builtin(
            "unwrap",
            format!("called on an error value: {reason:?}"),
        )),
    }
}
