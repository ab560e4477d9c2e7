use std::process::Command;

fn eval_ok(expr: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_dust"))
        .args(["-e", expr])
        .output()
        .expect("failed to run dust");
    assert!(
        output.status.success(),
        "dust exited with error for input '{expr}': {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .expect("non-utf8 output")
        .trim()
        .to_string()
}

fn eval_fail(expr: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_dust"))
        .args(["-e", expr])
        .output()
        .expect("failed to run dust");
    assert!(
        !output.status.success(),
        "expected dust to fail for input '{expr}'"
    );
    String::from_utf8(output.stderr)
        .expect("non-utf8 output")
        .trim()
        .to_string()
}

#[test]
fn precedence() {
    assert_eq!(eval_ok("2+3*4"), "14");
    assert_eq!(eval_ok("(2+3)*4"), "20");
}

#[test]
fn power_is_left_associative() {
    assert_eq!(eval_ok("2^3^2"), "64");
}

#[test]
fn division_and_remainder() {
    assert_eq!(eval_ok("10/4"), "2.5");
    assert_eq!(eval_ok("7%3"), "1");
}

#[test]
fn builtin_functions() {
    assert_eq!(eval_ok("SQRT(16)"), "4");
    assert_eq!(eval_ok("ABS(-5)"), "5");
    assert_eq!(eval_ok("ceil(2.1)"), "3");
}

#[test]
fn unary_minus() {
    assert_eq!(eval_ok("-(2+3)"), "-5");
}

#[test]
fn unknown_function_fails() {
    assert!(eval_fail("FROB(2)").contains("unknown function 'FROB'"));
}

#[test]
fn unbalanced_parentheses_fail() {
    assert!(eval_fail("(1+2").contains("unbalanced parentheses"));
}

#[test]
fn plain_number_is_not_math() {
    assert!(eval_fail("42").contains("not a math expression"));
}

#[test]
fn empty_expression_fails() {
    assert!(eval_fail("").contains("no expression present"));
}
