use super::*;
use clap::Parser;
use tyres_solver::{ChainOp, SymbolPath};

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::parse_from(std::iter::once("tyres").chain(argv.iter().copied()))
}

fn sample_program() -> ProgramDump {
    let mut dump = ProgramDump::default();
    dump.add_function(
        "foo",
        Type::returning(Type::call(SymbolPath::method("Foo", "bar"))),
    )
    .add_method(
        "Foo",
        "bar",
        Type::returning(Type::reference(
            SymbolPath::method("Foo", "self"),
            vec![ChainOp::CallResult, ChainOp::MemberCall("two".into())],
        )),
    )
    .add_method("Foo", "self", Type::returning(Type::object("Foo")))
    .add_method("Foo", "two", Type::returning(Type::int(2)))
    .add_method("Bar", "rec", Type::returning(Type::union(vec![
        Type::call(SymbolPath::method("Bar", "rec")),
        Type::int(1),
    ])));
    dump
}

fn run_on(dump: ProgramDump, args: &CliArgs) -> Result<Vec<ResolvedSymbol>> {
    let mut program = ProgramTypes::with_options(dump.into_graph(), resolver_options(args));
    resolve_selected(&mut program, args)
}

fn lines(symbols: &[ResolvedSymbol]) -> Vec<String> {
    symbols
        .iter()
        .map(|symbol| format!("{}: {}", symbol.path, symbol.rendered))
        .collect()
}

#[test]
fn test_default_selection_is_every_symbol_in_order() {
    let resolved = run_on(sample_program(), &args(&["dump.json"])).expect("resolves");
    assert_eq!(
        lines(&resolved),
        [
            "foo: (): int(2)",
            "Foo::bar: (): int(2)",
            "Foo::self: (): Foo",
            "Foo::two: (): int(2)",
            "Bar::rec: (): unknown|int(1)",
        ]
    );
}

#[test]
fn test_filters_select_functions_then_classes() {
    let cli = args(&[
        "dump.json",
        "--class",
        "Bar",
        "--function",
        "foo",
        "--function",
        "missing",
        "--class",
        "Nope",
    ]);
    let resolved = run_on(sample_program(), &cli).expect("resolves");
    assert_eq!(
        lines(&resolved),
        ["foo: (): int(2)", "missing: unknown", "Bar::rec: (): unknown|int(1)"]
    );
}

#[test]
fn test_resolver_options_from_limits() {
    assert_eq!(
        resolver_options(&args(&["dump.json"])).profile,
        RecursionProfile::Unbounded
    );
    assert_eq!(
        resolver_options(&args(&["dump.json", "--max-depth", "3"])).profile,
        RecursionProfile::Custom {
            max_depth: 3,
            max_iterations: u32::MAX,
        }
    );
    assert_eq!(
        resolver_options(&args(&["dump.json", "--max-iterations", "10"])).profile,
        RecursionProfile::Custom {
            max_depth: u32::MAX,
            max_iterations: 10,
        }
    );
}

#[test]
fn test_budget_abort_is_detectable() {
    let cli = args(&["dump.json", "--function", "foo", "--max-depth", "1"]);
    let err = run_on(sample_program(), &cli).expect_err("budget too small");
    assert!(is_budget_exhausted(&err));
    assert!(format!("{err:#}").starts_with("failed to resolve foo"));
}

#[test]
fn test_other_errors_are_not_budget_aborts() {
    let err = load_dump(Path::new("/nonexistent/tyres/dump.json")).expect_err("missing file");
    assert!(!is_budget_exhausted(&err));
}

#[test]
fn test_text_output() {
    let symbols = vec![
        ResolvedSymbol {
            path: SymbolPath::function("foo"),
            rendered: "(): int(2)".into(),
        },
        ResolvedSymbol {
            path: SymbolPath::method("Foo", "bar"),
            rendered: "(): unknown".into(),
        },
    ];
    assert_eq!(
        format_output(&symbols, OutputFormat::Text).expect("formats"),
        "foo: (): int(2)\nFoo::bar: (): unknown\n"
    );
    assert_eq!(format_output(&[], OutputFormat::Text).expect("formats"), "");
}

#[test]
fn test_json_output_keeps_order() {
    let symbols = vec![
        ResolvedSymbol {
            path: SymbolPath::method("Zed", "a"),
            rendered: "(): int(1)".into(),
        },
        ResolvedSymbol {
            path: SymbolPath::function("alpha"),
            rendered: "(): unknown|unknown".into(),
        },
    ];
    let out = format_output(&symbols, OutputFormat::Json).expect("formats");
    assert_eq!(
        out,
        "{\n  \"Zed::a\": \"(): int(1)\",\n  \"alpha\": \"(): unknown|unknown\"\n}\n"
    );
}
