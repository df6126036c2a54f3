use std::path::Path;

use codeowl_core::semantic::parser::TreeSitterParser;
use codeowl_core::semantic::{AnalysisError, FunctionKind, GrammarRegistry, Language, TypeKind};
use codeowl_core::SemanticAnalyzer;
use tempfile::TempDir;

/// One top-level function named `f` per language.
const SINGLE_FUNCTION: &[(&str, &str)] = &[
    ("f.py", "def f():\n    return 1\n"),
    ("f.js", "function f() {\n  return 1;\n}\n"),
    ("f.ts", "function f(): number {\n  return 1;\n}\n"),
    ("f.go", "package main\n\nfunc f() int {\n\treturn 1\n}\n"),
    ("f.rs", "fn f() -> i32 {\n    1\n}\n"),
];

#[test]
fn test_single_function_every_language() {
    let analyzer = SemanticAnalyzer::new();
    for (file, source) in SINGLE_FUNCTION {
        let record = analyzer
            .analyze_source(Path::new(file), source.as_bytes().to_vec())
            .unwrap();
        assert_eq!(record.functions.len(), 1, "{file}");
        let f = &record.functions[0];
        assert_eq!(f.name, "f", "{file}");
        assert_eq!(f.kind, FunctionKind::Function, "{file}");
        assert!(f.start_line <= f.end_line, "{file}");
    }
}

#[test]
fn test_empty_file_every_language() {
    let analyzer = SemanticAnalyzer::new();
    for language in Language::ALL {
        let path = format!("empty.{}", language.extension());
        let record = analyzer.analyze_source(Path::new(&path), Vec::new()).unwrap();
        assert_eq!(record.language, language);
        assert!(record.functions.is_empty(), "{path}");
        assert!(record.classes.is_empty(), "{path}");
        assert!(record.imports.is_empty(), "{path}");
        assert!(record.is_empty(), "{path}");
    }
}

#[test]
fn test_root_text_round_trip() {
    let registry = GrammarRegistry::new();
    let samples = [
        (Language::Python, "def f():\n    return 1"),
        (Language::JavaScript, "function f() { return 1; }"),
        (Language::TypeScript, "const x: number = 1;"),
        (Language::Go, "package main\n\nfunc f() {}"),
        (Language::Rust, "fn f() {}"),
        (Language::Python, "\n\ndef f():\n    return 1\n\n"),
        (Language::JavaScript, "  function f() {}\n\n"),
        (Language::Go, "\npackage main\n"),
        (Language::Rust, "\n  fn f() {}\n\n"),
        (Language::TypeScript, "   \n"),
    ];
    for (language, source) in samples {
        let parsed = TreeSitterParser::for_language(&registry, language)
            .unwrap()
            .parse_bytes(Path::new("sample"), source.as_bytes().to_vec())
            .unwrap();
        assert_eq!(parsed.node_text(&parsed.root()), source, "{language}");
    }
}

#[test]
fn test_go_receiver_verbatim() {
    let record = SemanticAnalyzer::new()
        .analyze_source(
            Path::new("t.go"),
            b"package p\n\ntype T struct{}\n\nfunc (r *T) M() {}\n".to_vec(),
        )
        .unwrap();
    let m = &record.functions[0];
    assert_eq!(m.name, "M");
    assert_eq!(m.kind, FunctionKind::Method);
    assert!(m.receiver.as_deref().unwrap().contains("(r *T)"));
    assert_eq!(record.classes[0].kind, TypeKind::Struct);
}

#[test]
fn test_rust_impl_kinds() {
    let record = SemanticAnalyzer::new()
        .analyze_source(
            Path::new("lib.rs"),
            b"struct Type;\ntrait Trait {}\nimpl Trait for Type { }\nimpl Type { }\n".to_vec(),
        )
        .unwrap();
    let kinds: Vec<(&str, TypeKind)> = record
        .classes
        .iter()
        .map(|c| (c.name.as_str(), c.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("Type", TypeKind::Struct),
            ("Trait", TypeKind::Trait),
            ("Trait for Type", TypeKind::TraitImpl),
            ("Type", TypeKind::Impl),
        ]
    );
}

#[test]
fn test_python_from_import_module_only() {
    let record = SemanticAnalyzer::new()
        .analyze_source(Path::new("m.py"), b"from a.b import c\n".to_vec())
        .unwrap();
    assert_eq!(record.imports, vec!["a.b"]);
}

#[test]
fn test_nested_functions_are_independent() {
    let analyzer = SemanticAnalyzer::new();
    let samples: [(&str, &[u8]); 3] = [
        ("n.py", b"def outer():\n    def inner():\n        pass\n    return inner\n"),
        ("n.js", b"function outer() {\n  function inner() {}\n  return inner;\n}\n"),
        ("n.rs", b"fn outer() {\n    fn inner() {}\n    inner();\n}\n"),
    ];
    for (file, source) in samples {
        let record = analyzer.analyze_source(Path::new(file), source.to_vec()).unwrap();
        assert_eq!(record.function_names(), vec!["outer", "inner"], "{file}");
        assert!(record.functions.iter().all(|f| f.kind == FunctionKind::Function));
        // inner lies within outer
        assert!(record.functions[1].start_line > record.functions[0].start_line);
        assert!(record.functions[1].end_line < record.functions[0].end_line);
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("service.ts");
    std::fs::write(
        &path,
        r#"import { Client } from "./client";

export class Service {
  constructor(private client: Client) {}

  async fetch(id: string) {
    return this.client.get(id);
  }
}
"#,
    )
    .unwrap();

    let analyzer = SemanticAnalyzer::new();
    let first = analyzer.analyze(&path).unwrap();
    let second = analyzer.analyze(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.imports, vec!["./client"]);
    assert_eq!(first.class_names(), vec!["Service"]);
    assert_eq!(first.function_names(), vec!["constructor", "fetch"]);
    assert_eq!(first.functions[1].receiver.as_deref(), Some("Service"));
}

#[test]
fn test_unsupported_extension() {
    let err = SemanticAnalyzer::new()
        .analyze_source(Path::new("notes.xyz"), b"anything".to_vec())
        .unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedLanguage(ref ext) if ext == "xyz"));
    assert_eq!(err.kind(), "unsupported_language");
}

#[test]
fn test_invalid_utf8_fails_the_file() {
    let err = SemanticAnalyzer::new()
        .analyze_source(Path::new("bad.go"), vec![b'p', b'a', 0xc3, 0x28])
        .unwrap_err();
    assert!(matches!(err, AnalysisError::TextDecode { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = SemanticAnalyzer::new()
        .analyze(&dir.path().join("gone.py"))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Io { .. }));
}

#[test]
fn test_record_serializes_lowercase_tags() {
    let record = SemanticAnalyzer::new()
        .analyze_source(Path::new("c.py"), b"class C:\n    def m(self):\n        pass\n".to_vec())
        .unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["language"], "python");
    assert_eq!(json["functions"][0]["kind"], "method");
    assert_eq!(json["functions"][0]["receiver"], "C");
    assert_eq!(json["classes"][0]["kind"], "class");
}
