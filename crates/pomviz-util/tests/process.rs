use pomviz_util::process::CommandBuilder;

#[cfg(unix)]
#[test]
fn test_builder_simple_command() {
    let output = CommandBuilder::new("echo").arg("hello").exec().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "hello");
}

#[cfg(unix)]
#[test]
fn test_builder_multiple_args() {
    let output = CommandBuilder::new("echo")
        .args(["one", "two", "three"])
        .exec()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "one two three");
}

#[cfg(unix)]
#[test]
fn test_builder_reports_nonzero_exit() {
    let output = CommandBuilder::new("sh")
        .args(["-c", "echo broken >&2; exit 3"])
        .exec()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "broken");
}

#[test]
fn test_builder_nonexistent_program() {
    let result = CommandBuilder::new("nonexistent_program_xyz_123").exec();
    assert!(result.is_err());
}

#[test]
fn test_command_line_rendering() {
    let cmd = CommandBuilder::new("dot")
        .arg("-Tpng")
        .args(["graph.dot", "-o", "graph.png"]);
    assert_eq!(cmd.command_line(), "dot -Tpng graph.dot -o graph.png");
}
