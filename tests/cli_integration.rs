//! Integration tests for the `mdtext` binary.

use std::path::PathBuf;
use std::process::{Command, Output};

fn mdtext_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mdtext"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(mdtext_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .current_dir(fixture(""))
        .output()
        .expect("failed to run mdtext")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn render_plain_text() {
    let guide = fixture("guide.md");
    let output = run(&["render", guide.to_str().unwrap(), "--format", "plain"]);

    assert!(output.status.success(), "mdtext render should succeed");
    assert_eq!(stdout(&output), "Guide\n\nSee install and home.\n\n Welcome\nfriend\n");
}

#[test]
fn render_json_resolves_links_against_base_url() {
    let guide = fixture("guide.md");
    let output = run(&[
        "render",
        guide.to_str().unwrap(),
        "--format",
        "json",
        "--base-url",
        "https://example.org/docs/",
    ]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(
        out.contains("https://example.org/docs/install.md"),
        "relative link should resolve: {out}"
    );
    assert!(out.contains("\"underline\": true"));
}

#[test]
fn config_file_supplies_base_url() {
    let guide = fixture("guide.md");
    let config = fixture("site-config.json");
    let output = run(&[
        "render",
        guide.to_str().unwrap(),
        "--format",
        "json",
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("https://docs.example.org/v1/install.md"));
}

#[test]
fn invalid_base_url_fails() {
    let guide = fixture("guide.md");
    let output = run(&["render", guide.to_str().unwrap(), "--base-url", "not a url"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a url"));
}

#[test]
fn rewrite_applies_selected_rules() {
    let guide = fixture("guide.md");
    let output = run(&[
        "rewrite",
        guide.to_str().unwrap(),
        "--drop-images",
        "--unwrap-links",
        "--drop-html",
    ]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("# Guide\n\nSee install and home.\n"));
    assert!(!out.contains("logo"));
    assert!(!out.contains("<div>"));
    assert!(!out.contains("<br>"));
}

#[test]
fn rewrite_json_round_trips_through_render() {
    let guide = fixture("guide.md");
    let output = run(&["rewrite", guide.to_str().unwrap(), "--unwrap-links", "--format", "json"]);
    assert!(output.status.success());

    let tree = std::env::temp_dir().join("mdtext-cli-tree.json");
    std::fs::write(&tree, &output.stdout).unwrap();

    let rendered = run(&["render", tree.to_str().unwrap(), "--format", "plain"]);
    assert!(rendered.status.success());
    assert!(stdout(&rendered).starts_with("Guide\n\nSee install and home."));

    let _ = std::fs::remove_file(&tree);
}

#[test]
fn links_walks_directories_for_markdown_only() {
    let docs = fixture("docs");
    let output = run(&["links", docs.to_str().unwrap(), "--quiet"]);

    assert!(output.status.success());
    let out = stdout(&output);
    let destinations: Vec<&str> = out.lines().filter_map(|line| line.rsplit(": ").next()).collect();
    assert_eq!(destinations, vec!["/top", "chapter-2.html"]);
}

#[test]
fn links_reads_explicit_files_regardless_of_extension() {
    let notes = fixture("docs/notes.txt");
    let output = run(&["links", notes.to_str().unwrap(), "--quiet"]);

    assert!(output.status.success());
    assert!(stdout(&output).ends_with(": /ignored\n"));
}

#[test]
fn validate_ok() {
    let guide = fixture("guide.md");
    let output = run(&["validate", guide.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("OK"));
}

#[test]
fn validate_reports_errors_and_exits_nonzero() {
    let invalid = fixture("invalid.json");
    let output = run(&["validate", invalid.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("error: [V010]"), "heading level error expected: {out}");
    assert!(out.contains("warning: [V040]"), "empty link warning expected: {out}");
}

#[test]
fn missing_file_is_reported() {
    let output = run(&["render", "does-not-exist.md"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read 'does-not-exist.md'"));
}
