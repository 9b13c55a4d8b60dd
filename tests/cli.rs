use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn get_decree_binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_decree"));
    command.arg("--color").arg("never");
    command
}

fn run_with_stdin(mut command: Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn decree");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input.as_bytes())
        .expect("Failed to write to stdin");
    child.wait_with_output().expect("Failed to wait for decree")
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("decree-cli-{}-{}", std::process::id(), name))
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_decree"))
        .arg("--version")
        .output()
        .expect("Failed to execute decree");

    assert!(output.status.success(), "Version flag should succeed");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("decree"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_eval_runs_program() {
    let output = get_decree_binary()
        .arg("-e")
        .arg("decree add(a, b) { yield a inherit b; } print(add(2, 3));")
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "5\n");
    assert!(stderr_of(&output).is_empty());
}

#[test]
fn test_file_argument() {
    let path = scratch_path("program.dcr");
    fs::write(&path, "march (i devote 1; i <= 3; i devote i inherit 1) { print(\"round \", i); }\n").unwrap();

    let output = get_decree_binary().arg(&path).output().expect("Failed to execute decree");
    fs::remove_file(&path).ok();

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "round 1\nround 2\nround 3\n");
}

#[test]
fn test_missing_file_is_bad_input() {
    let output = get_decree_binary()
        .arg(scratch_path("does-not-exist.dcr"))
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Failed to read"));
}

#[test]
fn test_program_from_stdin() {
    let output = run_with_stdin(get_decree_binary(), "print(\"from \" unir \"stdin\");\n");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "from stdin\n");
}

#[test]
fn test_inquire_reads_stdin_after_eval_program() {
    let mut command = get_decree_binary();
    command.arg("-e").arg("n devote inquire(\"n? \"); print(n forge 2);");
    let output = run_with_stdin(command, "21\n");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "n? 42\n");
}

#[test]
fn test_syntax_error_exit_code() {
    let output = get_decree_binary()
        .arg("-e")
        .arg("print(1);\nprint(;")
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).is_empty());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("error[E0101]"), "{}", stderr);
    assert!(stderr.contains("<eval>:2:"), "{}", stderr);
}

#[test]
fn test_runtime_error_exit_code() {
    let output = get_decree_binary()
        .arg("-e")
        .arg("print(\"before\"); print(1 cleave 0);")
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_of(&output), "before\n");
    assert!(stderr_of(&output).contains("error[E0205]: division by zero"));
}

#[test]
fn test_top_level_yield_warns_but_succeeds() {
    let output = get_decree_binary()
        .arg("-e")
        .arg("print(1); yield 2; print(3);")
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "1\n");
    assert!(stderr_of(&output).contains("warning[W0301]"));
}

#[test]
fn test_tokens_dump() {
    let output = get_decree_binary()
        .arg("--tokens")
        .arg("-e")
        .arg("gold devote \"coin\";")
        .output()
        .expect("Failed to execute decree");

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "1:IDENTIFIER gold\n1:ASSIGN devote\n1:STRING \"coin\"\n1:SEMICOLON ;\n"
    );
}

#[test]
fn test_tokens_dump_as_json() {
    let output = get_decree_binary()
        .args(["--tokens", "--json", "-e", "x devote 5;"])
        .output()
        .expect("Failed to execute decree");

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let tokens = parsed.as_array().expect("token array");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[2]["kind"], "NUMBER");
    assert_eq!(tokens[2]["value"], 5);
    assert_eq!(tokens[1]["text"], "devote");
}

#[test]
fn test_ast_dump() {
    let output = get_decree_binary()
        .args(["--ast", "-e", "x devote 1 inherit 2;"])
        .output()
        .expect("Failed to execute decree");

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "Program\n\
         └── Assignment: devote x\n\
         \u{20}   └── BinaryOp: inherit\n\
         \u{20}       ├── Literal: 1\n\
         \u{20}       └── Literal: 2\n"
    );
}

#[test]
fn test_ast_dump_as_json() {
    let output = get_decree_binary()
        .args(["--ast", "--json", "-e", "print(1);"])
        .output()
        .expect("Failed to execute decree");

    assert!(output.status.success());
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(tree["label"], "Program");
    assert_eq!(tree["children"][0]["label"], "Print");
    assert_eq!(tree["children"][0]["children"][0]["label"], "Literal: 1");
}

#[test]
fn test_ast_dump_of_invalid_program_fails() {
    let output = get_decree_binary()
        .args(["--ast", "-e", "judge (1 {"])
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_deeply_nested_program_is_rejected() {
    let program = format!("print({}1{});", "(".repeat(3000), ")".repeat(3000));
    let output = get_decree_binary()
        .args(["-e", program.as_str()])
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("error[E0104]"), "{}", stderr_of(&output));
}

#[test]
fn test_json_requires_a_dump() {
    let output = get_decree_binary()
        .args(["--json", "-e", "print(1);"])
        .output()
        .expect("Failed to execute decree");

    assert!(!output.status.success());
}

#[test]
fn test_seed_makes_runs_repeatable() {
    let program = "gold devote 1000; parias(gold); army devote 10; conquistar(\"Leon\", army, 10); print(gold, \" \", army);";
    let run = || {
        get_decree_binary()
            .args(["--seed", "1492", "-e", program])
            .output()
            .expect("Failed to execute decree")
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_max_depth_flag() {
    let output = get_decree_binary()
        .args(["--max-depth", "5", "-e", "decree dig(n) { yield dig(n inherit 1); } dig(0);"])
        .output()
        .expect("Failed to execute decree");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("maximum call depth of 5 exceeded"));
}

#[test]
fn test_log_file_copies_output() {
    let log = scratch_path("run.log");
    let output = get_decree_binary()
        .arg("--log")
        .arg(&log)
        .args(["-e", "print(\"logged\"); print(2);"])
        .output()
        .expect("Failed to execute decree");

    assert!(output.status.success());
    let contents = fs::read_to_string(&log).expect("log file should exist");
    fs::remove_file(&log).ok();
    assert_eq!(contents, "logged\n2\n");
}

#[test]
fn test_interactive_entries_are_independent_by_default() {
    let mut command = get_decree_binary();
    command.arg("-i");
    let output = run_with_stdin(command, "x devote 2;\nprint(x);\n");

    assert!(output.status.success());
    assert!(stderr_of(&output).contains("undefined variable `x`"));
}

#[test]
fn test_interactive_persist_keeps_state() {
    let mut command = get_decree_binary();
    command.args(["-i", "--persist"]);
    let output = run_with_stdin(
        command,
        "decree triple(n) {\n  yield n forge 3;\n}\nx devote 4;\nprint(triple(x));\nexit\nprint(\"never\");\n",
    );

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("decree> "), "{}", stdout);
    assert!(stdout.contains("...> "), "{}", stdout);
    assert!(stdout.contains("12\n"), "{}", stdout);
    assert!(!stdout.contains("never"), "{}", stdout);
}

#[test]
fn test_completion_script() {
    let output = Command::new(env!("CARGO_BIN_EXE_decree"))
        .args(["complete", "bash"])
        .output()
        .expect("Failed to execute decree");

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("decree"));
}
