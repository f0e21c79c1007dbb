mod common;

use common::run_instareport;

#[test]
fn help_shows_usage() {
    let output = run_instareport(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "--help should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("batch"));
    assert!(stdout.contains("serve"));
}

#[test]
fn version_shows_version() {
    let output = run_instareport(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("instareport "));
}

#[test]
fn completions_bash_outputs_script() {
    let output = run_instareport(&["completions", "bash"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains("instareport"),
        "expected completion output to reference command name\nstdout:\n{}",
        stdout
    );
}

#[test]
fn config_show_works() {
    let output = run_instareport(&["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "config show should succeed\nstdout:\n{}\nstderr:\n{}",
        stdout,
        stderr
    );
    assert!(stdout.contains("[general]"));
    assert!(stdout.contains("[storage]"));
    assert!(stdout.contains("instareview-reports"));
}

#[test]
fn config_path_returns_valid_path() {
    let output = run_instareport(&["config", "path"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("config.toml"));
}

#[test]
fn generate_requires_company_id() {
    let output = run_instareport(&["generate"]);

    assert!(
        !output.status.success(),
        "generate without --company-id should fail"
    );
}

#[test]
fn generate_fails_fast_without_configured_api() {
    let output = run_instareport(&["generate", "--company-id", "acme-01"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !output.status.success(),
        "generate should fail when no reviews URL is configured"
    );
    assert!(
        stderr.contains("Reviews API URL is missing"),
        "expected configuration error, got:\n{}",
        stderr
    );
}

#[test]
fn generate_rejects_from_without_to() {
    let output = run_instareport(&["generate", "--company-id", "acme-01", "--from", "2025-09-08"]);

    assert!(
        !output.status.success(),
        "--from without --to should be rejected by argument parsing"
    );
}
