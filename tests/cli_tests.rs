mod common;

use common::TestResult;
use common::fixtures::catalog;
use std::io::Write;
use std::process::Command;

fn nodepath() -> Command {
    Command::new(env!("CARGO_BIN_EXE_nodepath"))
}

#[test]
fn test_prints_selected_nodes() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "{}", catalog())?;

    let output = nodepath()
        .arg("//item[@price > 20]")
        .arg(file.path())
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![r#"item id="saw" price=30 stock=false"#, r#"item id="hose" price=22"#]
    );
    Ok(())
}

#[test]
fn test_usage_error_exits_with_one() -> TestResult {
    let output = nodepath().arg("//item").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("Usage"));
    Ok(())
}

#[test]
fn test_bad_selector_fails() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "{}", catalog())?;
    let output = nodepath().arg("//item[").arg(file.path()).output()?;
    assert!(!output.status.success());
    Ok(())
}
