mod common;

use common::{output, report, run};
use decree::interpreter::{Outcome, RunStatus};
use decree::Value;

#[test]
fn test_judge_and_exile() {
    let source = "x devote 7;\n\
                  judge (x > 5) { print(\"big\"); } exile { print(\"small\"); }\n\
                  judge (x < 5) { print(\"tiny\"); }";
    assert_eq!(output(source), "big\n");
}

#[test]
fn test_judge_truthiness() {
    assert_eq!(output("judge (0) { print(1); } exile { print(2); }"), "2\n");
    assert_eq!(output("judge (\"\") { print(1); } exile { print(2); }"), "2\n");
    assert_eq!(output("judge (\"no\") { print(1); } exile { print(2); }"), "1\n");
    assert_eq!(output("judge (0.0) { print(1); } exile { print(2); }"), "2\n");
}

#[test]
fn test_vigil_counts() {
    let source = "i devote 0;\n\
                  total devote 0;\n\
                  vigil (i < 5) {\n\
                      i devote i inherit 1;\n\
                      total devote total inherit i;\n\
                  }\n\
                  print(i, \" \", total);";
    assert_eq!(output(source), "5 15\n");
}

#[test]
fn test_vigil_never_entered() {
    assert_eq!(output("vigil (0) { print(\"never\"); } print(\"after\");"), "after\n");
}

#[test]
fn test_march_runs_update_after_body() {
    let source = "march (i devote 0; i < 3; i devote i inherit 1) { print(i); }\n\
                  print(\"end \", i);";
    assert_eq!(output(source), "0\n1\n2\nend 3\n");
}

#[test]
fn test_march_with_false_condition_runs_only_init() {
    assert_eq!(output("march (i devote 10; i < 3; i devote i inherit 1) { print(i); } print(i);"), "10\n");
}

#[test]
fn test_nested_loops() {
    let source = "march (i devote 1; i <= 2; i devote i inherit 1) {\n\
                      march (j devote 1; j <= 2; j devote j inherit 1) {\n\
                          print(i, \"x\", j, \"=\", i forge j);\n\
                      }\n\
                  }";
    assert_eq!(output(source), "1x1=1\n1x2=2\n2x1=2\n2x2=4\n");
}

#[test]
fn test_block_bindings_leak_into_enclosing_frame() {
    let source = "judge (1) { inside devote \"visible\"; }\n\
                  vigil (0) { never devote 1; }\n\
                  print(inside);";
    assert_eq!(output(source), "visible\n");
}

#[test]
fn test_yield_from_nested_loops_leaves_the_decree() {
    let source = "decree find(target) {\n\
                      march (i devote 0; i < 10; i devote i inherit 1) {\n\
                          march (j devote 0; j < 10; j devote j inherit 1) {\n\
                              judge (i forge j == target) { yield i; }\n\
                          }\n\
                      }\n\
                      yield \"none\";\n\
                  }\n\
                  print(find(12));\n\
                  print(find(1000));";
    assert_eq!(output(source), "2\nnone\n");
}

#[test]
fn test_top_level_yield_ends_the_program() {
    let (result, output) = run("print(\"before\");\nyield 3;\nprint(\"after\");");
    assert_eq!(result, Ok(Outcome::TopLevelYield(Value::Int(3))));
    assert_eq!(output, "before\n");
}

#[test]
fn test_top_level_yield_inside_loop() {
    let (result, output) = run("vigil (1) { print(\"once\"); yield; }");
    assert_eq!(result, Ok(Outcome::TopLevelYield(Value::Void)));
    assert_eq!(output, "once\n");
}

#[test]
fn test_top_level_yield_is_a_warning() {
    let (report, _) = report("yield \"early\";");
    assert_eq!(report.status, RunStatus::Yielded(Value::string("early")));
    assert!(!report.is_failure());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code.as_deref(), Some("W0301"));
    assert!(!report.diagnostics[0].is_error());
}
