// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::path::PathBuf;
use classlr_bin::run;

struct Output {
    code: i32,
    out: String,
    err: String,
}

fn exec(args: &[&str]) -> Output {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let all_args = std::iter::once("classlr").chain(args.iter().copied()).collect::<Vec<_>>();
    let code = run(all_args, &mut out, &mut err);
    Output { code, out: String::from_utf8_lossy(&out).to_string(), err: String::from_utf8_lossy(&err).to_string() }
}

/// Writes a source in the temporary directory and returns its path.
fn source_file(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("classlr_cli_{}_{name}.txt", std::process::id()));
    std::fs::write(&path, text).expect("cannot write temporary file");
    path
}

fn exec_source(name: &str, text: &str, options: &[&str]) -> Output {
    let path = source_file(name, text);
    let path_str = path.to_string_lossy().to_string();
    let mut args = options.to_vec();
    args.push(&path_str);
    let output = exec(&args);
    let _ = std::fs::remove_file(&path);
    output
}

#[test]
fn usage_errors() {
    let output = exec(&[]);
    assert_eq!(output.code, 1);
    assert!(output.err.contains("Usage"), "{}", output.err);
    assert_eq!(exec(&["a.txt", "b.txt"]).code, 1);
    assert_eq!(exec(&["--unknown", "a.txt"]).code, 1);
    let output = exec(&["--help"]);
    assert_eq!(output.code, 0);
    assert!(output.out.contains("--max-depth"));
}

#[test]
fn missing_file() {
    let output = exec(&["/nonexistent/dir/file.txt"]);
    assert_eq!(output.code, 1);
    assert!(output.err.starts_with("cannot read '/nonexistent/dir/file.txt'"), "{}", output.err);
    assert!(output.out.is_empty());
}

#[test]
fn success() {
    let output = exec_source("success", "class A { public: integer x; }", &[]);
    assert_eq!(output.code, 0, "{}", output.err);
    let lines = output.out.lines().collect::<Vec<_>>();
    assert!(lines[0].starts_with(&format!("classlr {}: parsing ", env!("CARGO_PKG_VERSION"))));
    assert_eq!(&lines[1..], ["success", "class A", "    public field x: integer"]);
    assert!(output.err.is_empty());
}

#[test]
fn options() {
    let output = exec_source("options", "x := a + b * c;", &["--tree", "--no-dump"]);
    assert_eq!(output.code, 0, "{}", output.err);
    let lines = output.out.lines().skip(1).collect::<Vec<_>>();
    assert_eq!(lines, ["success", "(assign_stmt x := (expr a + (expr b * c)) ;)"]);
}

#[test]
fn syntax_errors() {
    let output = exec_source("syntax", "class A { integer @ x; float y; }\nclass B { func f() { } ", &[]);
    assert_eq!(output.code, 2);
    assert!(output.out.lines().any(|l| l == "failure"));
    // the symbols are still dumped
    assert!(output.out.contains("class A\n    private field y: float\nclass B (unclosed)"), "{}", output.out);
    assert!(output.err.contains("ERROR  : syntax error: found input '@' instead of "), "{}", output.err);
    assert!(output.err.ends_with("2 error(s)\n"), "{}", output.err);

    let output = exec_source("irrecoverable", "x := 1", &[]);
    assert_eq!(output.code, 2);
    assert!(output.out.lines().any(|l| l == "failure"));
    assert!(output.err.contains("irrecoverable error"), "{}", output.err);
}

#[test]
fn stack_exhausted() {
    let text = format!("{}1{};", "(".repeat(50), ")".repeat(50));
    let output = exec_source("deep", &text, &["--max-depth", "10"]);
    assert_eq!(output.code, 3);
    assert!(output.out.lines().any(|l| l == "failure"));
    assert!(output.err.contains("parser stack exhausted (limit of 10 entries)"), "{}", output.err);
    assert_eq!(exec_source("not_deep", &text, &[]).code, 0);
}
