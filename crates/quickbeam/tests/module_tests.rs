//! Tests for module loading, export and import

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail};
use pretty_assertions::assert_eq;
use quickbeam::ast::{BinaryOp, Expr, ImportSpec, Param};
use quickbeam::*;

/// Serves module text from memory and counts reads.
#[derive(Clone, Default)]
struct MemorySource {
    files: Arc<HashMap<String, String>>,
    reads: Arc<AtomicUsize>,
}

impl ModuleSource for MemorySource {
    fn read(&self, name: &str) -> anyhow::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("no file named `{name}`"))
    }
}

/// Maps a source text to a prebuilt program.
struct Prebuilt(HashMap<String, Vec<Expr>>);

impl SourceTranslator for Prebuilt {
    fn translate(&self, source: &str) -> anyhow::Result<Vec<Expr>> {
        match self.0.get(source) {
            Some(program) => Ok(program.clone()),
            None => bail!("syntax error in `{source}`"),
        }
    }
}

fn export(name: &str, declaration: Expr) -> Expr {
    Expr::Export {
        name: name.to_string(),
        declaration: Box::new(declaration),
    }
}

fn import(module: &str, spec: ImportSpec) -> Expr {
    Expr::Import {
        module: module.to_string(),
        spec,
    }
}

/// A `math` module exporting `PI` and `square`, plus a private helper.
fn setup() -> (Arc<ModuleRegistry>, MemorySource) {
    let math = vec![
        export("PI", Expr::const_("PI", Expr::float(3.14))),
        Expr::let_("private_helper", Expr::int(1)),
        export(
            "square",
            Expr::function(
                "square",
                vec![Param::new("n")],
                Expr::binary(BinaryOp::Mul, Expr::ident("n"), Expr::ident("n")),
            ),
        ),
    ];
    let broken = vec![Expr::ident("missing_in_module")];

    let source = MemorySource {
        files: Arc::new(HashMap::from([
            ("math".to_string(), "math source".to_string()),
            ("broken".to_string(), "broken source".to_string()),
            ("garbled".to_string(), "???".to_string()),
        ])),
        reads: Arc::default(),
    };
    let translator = Prebuilt(HashMap::from([
        ("math source".to_string(), math),
        ("broken source".to_string(), broken),
    ]));
    (
        Arc::new(ModuleRegistry::new(source.clone(), translator)),
        source,
    )
}

fn interpreter(registry: &Arc<ModuleRegistry>) -> Interpreter {
    Interpreter::with_context(EvalContext::new().with_modules(Arc::clone(registry)))
}

// ═══════════════════════════════════════════════════════════════════════
// Import forms
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_import_all() {
    let (registry, _) = setup();
    let result = interpreter(&registry).run(&[
        import("math", ImportSpec::All),
        Expr::call(Expr::ident("square"), vec![Expr::ident("PI")]),
    ]);
    let Ok(Value::Float(area)) = result else {
        panic!("expected a float, got {result:?}");
    };
    assert!((area - 9.8596).abs() < 1e-9);
}

#[test]
fn test_import_items() {
    let (registry, _) = setup();
    let mut interpreter = interpreter(&registry);
    let result = interpreter.run(&[
        import("math", ImportSpec::Items(vec!["square".to_string()])),
        Expr::call(Expr::ident("square"), vec![Expr::int(6)]),
    ]);
    assert_eq!(result, Ok(Value::Int(36)));
    assert!(!interpreter.env().contains("PI"));
}

#[test]
fn test_import_alias() {
    let (registry, _) = setup();
    let result = interpreter(&registry).run(&[
        import("math", ImportSpec::Alias("m".to_string())),
        Expr::field(Expr::ident("m"), "PI"),
    ]);
    assert_eq!(result, Ok(Value::Float(3.14)));
}

#[test]
fn test_private_bindings_are_not_exported() {
    let (registry, _) = setup();
    let module = registry.load("math", &EvalContext::new()).unwrap();
    let names: Vec<&str> = module.exports.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["PI", "square"]);
}

#[test]
fn test_missing_item() {
    let (registry, _) = setup();
    let result = interpreter(&registry).run(&[import(
        "math",
        ImportSpec::Items(vec!["tau".to_string()]),
    )]);
    assert_eq!(
        result,
        Err(EvalError::Module {
            module: "math".to_string(),
            message: "module does not export `tau`".to_string(),
        })
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_modules_are_cached() {
    let (registry, source) = setup();
    let mut interpreter = interpreter(&registry);
    interpreter.run(&[import("math", ImportSpec::All)]).unwrap();
    interpreter
        .run(&[import("math", ImportSpec::Alias("again".to_string()))])
        .unwrap();

    assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    assert_eq!(registry.loaded_names(), vec!["math".to_string()]);
}

#[test]
fn test_load_failures_are_module_errors() {
    let (registry, _) = setup();
    let ctx = EvalContext::new();

    for name in ["absent", "garbled", "broken"] {
        match registry.load(name, &ctx) {
            Err(EvalError::Module { module, .. }) => assert_eq!(module, name),
            other => panic!("expected a module error for `{name}`, got {other:?}"),
        }
        assert!(!registry.is_loaded(name));
    }
}

#[test]
fn test_module_runs_in_its_own_environment() {
    let (registry, _) = setup();
    let mut interpreter = interpreter(&registry);
    interpreter
        .run(&[Expr::let_("private_helper", Expr::string("mine"))])
        .unwrap();
    interpreter.run(&[import("math", ImportSpec::All)]).unwrap();
    assert_eq!(
        interpreter.run(&[Expr::ident("private_helper")]),
        Ok(Value::string("mine"))
    );
}

#[test]
fn test_import_without_loader() {
    let result = Interpreter::new().run(&[import("math", ImportSpec::All)]);
    assert!(matches!(result, Err(EvalError::Module { .. })));
}

// ═══════════════════════════════════════════════════════════════════════
// Module-private state
// ═══════════════════════════════════════════════════════════════════════

/// `let secret = 7; fn doubled() { secret * 2 }`
/// `export fn get() { secret }; export fn reveal() { doubled() }`
fn vault() -> Arc<ModuleRegistry> {
    let program = vec![
        Expr::let_("secret", Expr::int(7)),
        Expr::function(
            "doubled",
            vec![],
            Expr::binary(BinaryOp::Mul, Expr::ident("secret"), Expr::int(2)),
        ),
        export("get", Expr::function("get", vec![], Expr::ident("secret"))),
        export(
            "reveal",
            Expr::function("reveal", vec![], Expr::call(Expr::ident("doubled"), vec![])),
        ),
    ];
    let source = MemorySource {
        files: Arc::new(HashMap::from([(
            "vault".to_string(),
            "vault source".to_string(),
        )])),
        reads: Arc::default(),
    };
    let translator = Prebuilt(HashMap::from([("vault source".to_string(), program)]));
    Arc::new(ModuleRegistry::new(source, translator))
}

#[test]
fn test_exported_function_reads_private_binding() {
    let registry = vault();
    let mut interpreter = interpreter(&registry);
    let result = interpreter.run(&[
        import("vault", ImportSpec::All),
        Expr::call(Expr::ident("get"), vec![]),
    ]);
    assert_eq!(result, Ok(Value::Int(7)));
    assert!(!interpreter.env().contains("secret"));
}

#[test]
fn test_exported_function_ignores_importer_binding() {
    let registry = vault();
    let result = interpreter(&registry).run(&[
        Expr::let_("secret", Expr::string("importer's")),
        import("vault", ImportSpec::All),
        Expr::Array(vec![
            Expr::call(Expr::ident("get"), vec![]),
            Expr::call(Expr::ident("reveal"), vec![]),
            Expr::ident("secret"),
        ]),
    ]);
    assert_eq!(
        result,
        Ok(Value::array(vec![
            Value::Int(7),
            Value::Int(14),
            Value::string("importer's"),
        ]))
    );
}

#[test]
fn test_aliased_function_reads_private_binding() {
    let registry = vault();
    let result = interpreter(&registry).run(&[
        import("vault", ImportSpec::Alias("v".to_string())),
        Expr::call(Expr::field(Expr::ident("v"), "get"), vec![]),
    ]);
    assert_eq!(result, Ok(Value::Int(7)));
}
