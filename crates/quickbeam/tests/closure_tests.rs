//! Tests for functions, closures and the call protocol

use pretty_assertions::assert_eq;
use quickbeam::ast::{BinaryOp, Expr, Param, TypeName};
use quickbeam::*;

fn run(program: Vec<Expr>) -> Result<Value> {
    Interpreter::new().run(&program)
}

fn add(left: Expr, right: Expr) -> Expr {
    Expr::binary(BinaryOp::Add, left, right)
}

// ═══════════════════════════════════════════════════════════════════════
// Capture
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_capture_is_independent_of_later_writes() {
    let result = run(vec![
        Expr::let_("x", Expr::int(1)),
        Expr::let_("get_x", Expr::closure(vec![], Expr::ident("x"))),
        Expr::assign("x", Expr::int(2)),
        Expr::call(Expr::ident("get_x"), vec![]),
    ]);
    assert_eq!(result, Ok(Value::Int(1)));
}

#[test]
fn test_writes_inside_closure_stay_inside() {
    let result = run(vec![
        Expr::let_("count", Expr::int(0)),
        Expr::let_(
            "bump",
            Expr::closure(
                vec![],
                Expr::body(vec![
                    Expr::assign("count", add(Expr::ident("count"), Expr::int(1))),
                    Expr::return_(Expr::ident("count")),
                ]),
            ),
        ),
        Expr::call(Expr::ident("bump"), vec![]),
        Expr::call(Expr::ident("bump"), vec![]),
        Expr::ident("count"),
    ]);
    assert_eq!(result, Ok(Value::Int(0)));
}

#[test]
fn test_closure_returned_from_function_keeps_argument() {
    // fn make_adder(n) { return fn(x) { x + n } }
    let result = run(vec![
        Expr::function(
            "make_adder",
            vec![Param::new("n")],
            Expr::body(vec![Expr::return_(Expr::closure(
                vec![Param::new("x")],
                add(Expr::ident("x"), Expr::ident("n")),
            ))]),
        ),
        Expr::let_(
            "add5",
            Expr::call(Expr::ident("make_adder"), vec![Expr::int(5)]),
        ),
        Expr::let_(
            "add10",
            Expr::call(Expr::ident("make_adder"), vec![Expr::int(10)]),
        ),
        add(
            Expr::call(Expr::ident("add5"), vec![Expr::int(1)]),
            Expr::call(Expr::ident("add10"), vec![Expr::int(1)]),
        ),
    ]);
    assert_eq!(result, Ok(Value::Int(17)));
}

#[test]
fn test_hoisting_allows_forward_calls() {
    let result = run(vec![
        Expr::call(Expr::ident("later"), vec![]),
        Expr::function("later", vec![], Expr::string("hoisted")),
    ]);
    assert_eq!(result, Ok(Value::string("hoisted")));
}

// ═══════════════════════════════════════════════════════════════════════
// Arguments
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_too_many_arguments() {
    let result = run(vec![
        Expr::function("one", vec![Param::new("a")], Expr::ident("a")),
        Expr::call(Expr::ident("one"), vec![Expr::int(1), Expr::int(2)]),
    ]);
    assert_eq!(
        result,
        Err(EvalError::ArgumentCount {
            name: "one".to_string(),
            expected: 1,
            got: 2,
        })
    );
}

#[test]
fn test_missing_required_argument() {
    let result = run(vec![
        Expr::function(
            "pair",
            vec![Param::new("a"), Param::new("b")],
            Expr::ident("a"),
        ),
        Expr::call(Expr::ident("pair"), vec![Expr::int(1)]),
    ]);
    assert_eq!(
        result,
        Err(EvalError::MissingArgument {
            name: "pair".to_string(),
            param: "b".to_string(),
        })
    );
}

#[test]
fn test_defaults_fill_missing_arguments() {
    let greet = Expr::function(
        "greet",
        vec![
            Param::new("name"),
            Param::new("greeting").with_default(Expr::string("hello")),
        ],
        add(
            add(Expr::ident("greeting"), Expr::string(", ")),
            Expr::ident("name"),
        ),
    );
    let result = run(vec![
        greet,
        Expr::let_("a", Expr::call(Expr::ident("greet"), vec![Expr::string("ann")])),
        Expr::let_(
            "b",
            Expr::call(
                Expr::ident("greet"),
                vec![Expr::string("bob"), Expr::string("hi")],
            ),
        ),
        Expr::Array(vec![Expr::ident("a"), Expr::ident("b")]),
    ]);
    assert_eq!(
        result,
        Ok(Value::array(vec![
            Value::string("hello, ann"),
            Value::string("hi, bob"),
        ]))
    );
}

#[test]
fn test_calling_a_non_function() {
    let result = run(vec![
        Expr::let_("n", Expr::int(3)),
        Expr::call(Expr::ident("n"), vec![]),
    ]);
    assert_eq!(
        result,
        Err(EvalError::NotCallable {
            type_name: "int".to_string()
        })
    );
}

#[test]
fn test_typed_function_checks_arguments() {
    let def = Expr::Function(quickbeam::ast::FunctionDef {
        name: "double".to_string(),
        params: std::sync::Arc::new(vec![Param::new("n").with_type(TypeName::Int)]),
        body: std::sync::Arc::new(add(Expr::ident("n"), Expr::ident("n"))),
        return_type: Some(TypeName::Int),
    });
    let mut interpreter = Interpreter::new();
    interpreter.run(&[def]).unwrap();

    assert_eq!(
        interpreter.run(&[Expr::call(Expr::ident("double"), vec![Expr::int(4)])]),
        Ok(Value::Int(8))
    );
    let err = interpreter
        .run(&[Expr::call(Expr::ident("double"), vec![Expr::string("x")])])
        .unwrap_err();
    assert!(matches!(err, EvalError::TypeError { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Recursion
// ═══════════════════════════════════════════════════════════════════════

fn factorial() -> Expr {
    // fn fact(n) { if n <= 1 { return 1 }; return n * fact(n - 1) }
    Expr::function(
        "fact",
        vec![Param::new("n")],
        Expr::body(vec![
            Expr::if_(
                Expr::binary(BinaryOp::Le, Expr::ident("n"), Expr::int(1)),
                vec![Expr::return_(Expr::int(1))],
                None,
            ),
            Expr::return_(Expr::binary(
                BinaryOp::Mul,
                Expr::ident("n"),
                Expr::call(
                    Expr::ident("fact"),
                    vec![Expr::binary(BinaryOp::Sub, Expr::ident("n"), Expr::int(1))],
                ),
            )),
        ]),
    )
}

#[test]
fn test_recursion() {
    let result = run(vec![
        factorial(),
        Expr::call(Expr::ident("fact"), vec![Expr::int(10)]),
    ]);
    assert_eq!(result, Ok(Value::Int(3_628_800)));
}

#[test]
fn test_recursion_ceiling_without_state_corruption() {
    let mut interpreter = Interpreter::new();
    let runaway = Expr::function(
        "runaway",
        vec![Param::new("n")],
        Expr::body(vec![Expr::return_(Expr::call(
            Expr::ident("runaway"),
            vec![add(Expr::ident("n"), Expr::int(1))],
        ))]),
    );

    let err = interpreter
        .run(&[
            runaway,
            Expr::call(Expr::ident("runaway"), vec![Expr::int(0)]),
        ])
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::RecursionLimitExceeded {
            depth: 1000,
            max: 1000
        }
    );
    assert_eq!(interpreter.env().call_depth(), 0);
    assert_eq!(interpreter.env().depth(), 1);

    // The interpreter is still usable afterwards.
    interpreter.run(&[factorial()]).unwrap();
    assert_eq!(
        interpreter.run(&[Expr::call(Expr::ident("fact"), vec![Expr::int(5)])]),
        Ok(Value::Int(120))
    );
}

#[test]
fn test_custom_ceiling() {
    let mut interpreter = Interpreter::with_context(EvalContext::with_max_call_depth(10));
    let result = interpreter.run(&[
        factorial(),
        Expr::call(Expr::ident("fact"), vec![Expr::int(20)]),
    ]);
    assert_eq!(
        result,
        Err(EvalError::RecursionLimitExceeded { depth: 10, max: 10 })
    );
}
