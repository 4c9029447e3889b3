use std::process::Command;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn zwc(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_zwc"))
        .args(args)
        .output()
        .expect("failed to run zwc")
}

#[test]
fn all_fixtures_pass() {
    let output = zwc(&["--no-color", "test", FIXTURES]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "fixture run failed:\n{}", stderr);
    assert!(stderr.contains("test result: ok."), "{}", stderr);
}

#[test]
fn category_filter_limits_the_run() {
    let output = zwc(&["--no-color", "test", FIXTURES, "--category", "warnings"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{}", stderr);
    assert!(stderr.contains("2 passed, 0 failed"), "{}", stderr);
}

#[test]
fn failing_fixture_sets_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrong.test.zwc");
    std::fs::write(&path, "---\nexpect_body = \"nope\"\n---\nactual text\n").unwrap();

    let output = zwc(&["--no-color", "test", path.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("body mismatch"), "{}", stderr);
}

#[test]
fn page_command_prints_body_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let templates = dir.path().join("templates");
    std::fs::create_dir(&templates).unwrap();
    std::fs::write(templates.join("051_h1.html"), "<h1>\n%\n</h1>").unwrap();
    let page = dir.path().join("hello.zwc");
    std::fs::write(&page, "# Hi\n").unwrap();

    let output = zwc(&[
        "--no-color",
        "page",
        page.to_str().unwrap(),
        "--templates",
        templates.to_str().unwrap(),
        "--body-only",
    ]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "\n<div id=\"content\" class=\"container\"><h1>Hi</h1>\n</div>\n"
    );
}
