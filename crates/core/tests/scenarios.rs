use metric_lens_core::complexity::ComplexityRecord;
use metric_lens_core::diagnostics::MalformedKind;
use metric_lens_core::lines::LineKind;
use metric_lens_core::structure::{ScopeKind, TypeKind};
use metric_lens_core::{SourceUnit, UnitReport, analyze};

fn java(text: &str) -> UnitReport {
    analyze(&SourceUnit::new("Scenario.java", text))
}

fn method_record(body: &str) -> ComplexityRecord {
    let report = java(&format!("class S {{\n  void run() {{\n    {body}\n  }}\n}}\n"));
    report
        .scope("run")
        .and_then(|s| s.complexity)
        .expect("run is a callable")
}

#[test]
fn else_if_counts_but_trailing_else_does_not() {
    let record = method_record("if (x > 0) { } else if (x < 0) { } else { }");
    assert_eq!(record.score, 3);
}

#[test]
fn loop_with_short_circuit_condition() {
    let record = method_record("while (a < b || a == c) { }");
    assert_eq!(record.score, 3);
}

#[test]
fn comment_and_blank_line_classification() {
    let report = java("x++; // increment\n// increment\n   \n");
    assert_eq!(
        report.lines,
        [LineKind::Mixed, LineKind::CommentOnly, LineKind::Blank]
    );
}

#[test]
fn stacked_case_labels_each_count() {
    let record = method_record("switch(v){ case 1: case 2: doX(); break; default: doY(); }");
    assert_eq!(record.breakdown.cases, 2);
    assert_eq!(record.score, 3);
}

#[test]
fn unterminated_block_comment_keeps_earlier_lines() {
    let text = "int a;\n\n// note\nint b; /* never\nclosed\n";
    let report = java(text);
    let start = text.find("/*").unwrap();
    let flags: Vec<_> = report.flags.iter().map(|f| (f.kind, f.offset)).collect();
    assert_eq!(flags, [(MalformedKind::UnterminatedComment, start)]);
    assert_eq!(
        report.lines,
        [
            LineKind::CodeOnly,
            LineKind::Blank,
            LineKind::CommentOnly,
            LineKind::Mixed,
            LineKind::CommentOnly
        ]
    );
}

#[test]
fn unreachable_boolean_case_still_counts() {
    let record = method_record(
        "switch (true) { case (number < 10): a(); break; case (number >= 10 || number < 20): b(); break; default: c(); }",
    );
    assert_eq!(record.breakdown.cases, 2);
    assert_eq!(record.breakdown.logical_ors, 1);
    assert_eq!(record.score, 4);
}

#[test]
fn body_less_record_is_a_type_without_methods() {
    let report = analyze(&SourceUnit::new("Point.cs", "namespace Geo;\npublic record Point(int X, int Y);\n"));
    let point = report.scope("Point").expect("record scope");
    assert_eq!(point.kind, ScopeKind::Type);
    assert_eq!(point.type_kind, Some(TypeKind::Record));
    assert_eq!(report.functions, 0);
}

#[test]
fn compact_constructor_is_a_method_of_its_record() {
    let text = "record Range(int lo, int hi) {\n  Range {\n    if (lo > hi) throw new IllegalArgumentException();\n  }\n}\n";
    let report = java(text);
    let ctor = report
        .callables()
        .next()
        .expect("compact constructor");
    assert_eq!(ctor.kind, ScopeKind::Method);
    assert_eq!(ctor.name, "Range");
    assert_eq!(ctor.complexity.map(|c| c.score), Some(2));
    let parent = ctor.parent.and_then(|p| report.tree.get(p));
    assert_eq!(parent.map(|p| p.name.as_str()), Some("Range"));
}

#[test]
fn initializer_blocks_are_callables() {
    let text = "class Config {\n  static int n;\n  static {\n    for (int i = 0; i < 3; i++) n += i;\n  }\n  {\n    n = n > 0 ? n : 1;\n  }\n}\n";
    let report = java(text);
    let kinds: Vec<_> = report
        .callables()
        .map(|s| (s.kind, s.complexity.map(|c| c.score)))
        .collect();
    assert_eq!(
        kinds,
        [
            (ScopeKind::Initializer, Some(2)),
            (ScopeKind::Initializer, Some(2))
        ]
    );
}

#[test]
fn stray_closing_brace_is_flagged() {
    let report = java("class A { }\n}\n");
    assert_eq!(report.flags.len(), 1);
    assert_eq!(report.flags[0].kind, MalformedKind::UnbalancedScope);
    assert_eq!(report.flags[0].offset, 12);
}

fn scopes(report: &UnitReport) -> Vec<(ScopeKind, &str, Option<u32>)> {
    report
        .scopes
        .iter()
        .map(|s| (s.kind, s.name.as_str(), s.complexity.map(|c| c.score)))
        .collect()
}

#[test]
fn include_before_namespace_keeps_its_functions() {
    let text = "#include <vector>\n\nnamespace helper { int f(int a) { if (a) return 1; return 0; } }";
    let report = analyze(&SourceUnit::new("helper.cpp", text));
    assert_eq!(scopes(&report), [(ScopeKind::Method, "f", Some(2))]);
    assert!(report.flags.is_empty());
    assert_eq!(report.metrics.total_lines, 3);
}

#[test]
fn macro_definition_does_not_name_the_next_function() {
    let text = "#define SQ(x) ((x) * (x))\nint main() {\n  return SQ(2) > 3 ? 1 : 0;\n}\n";
    let report = analyze(&SourceUnit::new("main.c", text));
    assert_eq!(scopes(&report), [(ScopeKind::Method, "main", Some(2))]);
}

#[test]
fn extern_c_block_is_transparent() {
    let text = "#ifdef __cplusplus\nextern \"C\" {\n#endif\nint add(int a, int b) { return a + b; }\n#ifdef __cplusplus\n}\n#endif\n";
    let report = analyze(&SourceUnit::new("api.cpp", text));
    assert_eq!(scopes(&report), [(ScopeKind::Method, "add", Some(1))]);
    assert!(report.flags.is_empty());
}

#[test]
fn cpp_header_by_default() {
    let report = analyze(&SourceUnit::new("x.h", "class A { public: int f() { return 1; } };"));
    assert_eq!(report.language, metric_lens_core::language::Language::Cpp);
    assert_eq!((report.classes, report.functions, report.complexity), (1, 1, 1));
}

#[test]
fn csharp_top_level_and_class_functions() {
    let text = "FunctionsAndMethods obj = new FunctionsAndMethods();\nDel d = obj.testFunction1;\n\nvoid testMethod() {}\n\nint outOfScope() {\n    return 3;\n}\n\npublic class FunctionsAndMethods {\n\n    private string hello;\n\n    public FunctionsAndMethods() {\n        hello = \"hello\";\n    }\n\n    public int testFunction1(int x, int y) {\n        return 1;\n    }\n\n    int testFunction2(int x, int y) {\n        return 1;\n    }\n\n    private int testFunction3() {\n        return 1;\n    }\n\n    public static void staticMethod() {}\n\n}\n\npublic delegate int Del(int x, int y);\n";
    let report = analyze(&SourceUnit::new("functions-and-methods.cs", text));
    let names: Vec<_> = report.callables().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "testMethod",
            "outOfScope",
            "FunctionsAndMethods",
            "testFunction1",
            "testFunction2",
            "testFunction3",
            "staticMethod",
        ]
    );
    assert_eq!(report.classes, 1);
    assert_eq!(report.complexity, 7);
}

#[test]
fn unclosed_paren_makes_the_record_partial() {
    let report = java("class A { void f() { if (a && b { } } }");
    let record = report.scope("f").and_then(|s| s.complexity).expect("f is a callable");
    assert!(record.partial);
    assert_eq!(record.score, 3);
    let flags: Vec<_> = report.flags.iter().map(|f| (f.kind, f.offset)).collect();
    assert_eq!(flags, [(MalformedKind::UnbalancedScope, 24)]);
    assert!(!report.scope("A").is_some_and(|s| s.unterminated));
}

#[test]
fn regex_literal_is_not_a_comment() {
    let text = "function f(s) {\n  return /[/*]/.test(s) ? 1 : 0;\n}\n";
    let report = analyze(&SourceUnit::new("re.js", text));
    assert!(report.flags.is_empty());
    assert_eq!(report.metrics.comment_only_lines + report.metrics.mixed_lines, 0);
    assert_eq!(scopes(&report), [(ScopeKind::Method, "f", Some(2))]);
}
