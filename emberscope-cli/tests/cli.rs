//! End-to-end tests for the `emberscope` binary.

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn emberscope() -> Command {
    cargo_bin_cmd!("emberscope")
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "app/components/user-card.js",
        "import Component from '@ember/component';\n\
         import layout from '../templates/components/user-card';\n\
         export default Component.extend({\n  layout,\n  tagName: 'article',\n  name: null,\n});\n",
    );
    write(
        dir.path(),
        "app/templates/components/user-card.hbs",
        "<h2>{{this.name}}</h2>{{#if @showAvatar}}<Avatar @src={{@avatar}} />{{/if}}",
    );
    write(dir.path(), "app/routes/index.js", "export default Route.extend({});");
    dir
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn shows_help() {
    emberscope()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("component"))
        .stdout(predicate::str::contains("graph"));
}

#[test]
fn file_reports_component_meta() {
    let dir = project();
    let path = dir.path().join("app/components/user-card.js");
    let json = stdout_json(
        emberscope()
            .arg("file")
            .arg(&path)
            .arg("--root")
            .arg(dir.path()),
    );
    assert_eq!(json["type"], "component");
    assert_eq!(json["data"]["tagNames"][0], "article");
    let imports = json["resolvedImports"].as_array().unwrap();
    assert_eq!(imports[0]["name"], "@ember/component");
    assert_eq!(imports[0]["isLinkable"], false);
    assert_eq!(imports[1]["isLinkable"], true);
}

#[test]
fn file_reports_template_meta() {
    let dir = project();
    let path = dir.path().join("app/templates/components/user-card.hbs");
    let json = stdout_json(emberscope().arg("file").arg(&path).arg("--root").arg(dir.path()));
    assert_eq!(json["type"], "template");
    assert_eq!(json["data"]["components"], serde_json::json!(["Avatar"]));
    assert!(json.get("resolvedImports").is_none());
}

#[test]
fn missing_file_exits_with_not_found() {
    let dir = project();
    emberscope()
        .arg("file")
        .arg(dir.path().join("nope.js"))
        .arg("--root")
        .arg(dir.path())
        .assert()
        .code(3);
}

#[test]
fn malformed_file_exits_with_parse_failure() {
    let dir = project();
    write(dir.path(), "app/components/bad.hbs", "{{#each items}}");
    emberscope()
        .arg("file")
        .arg(dir.path().join("app/components/bad.hbs"))
        .arg("--root")
        .arg(dir.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unclosed block"));
}

#[test]
fn files_lists_candidates() {
    let dir = project();
    let json = stdout_json(emberscope().arg("files").arg(dir.path()));
    assert_eq!(json["type"], "path");
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[test]
fn files_analyze_reports_partial_success() {
    let dir = project();
    write(dir.path(), "app/components/bad.hbs", "<div>");
    emberscope()
        .args(["-q", "files", "--analyze"])
        .arg(dir.path())
        .assert()
        .code(10)
        .stdout(predicate::str::contains("\"results\""))
        .stdout(predicate::str::contains("bad.hbs"));
}

#[test]
fn component_aggregates_files() {
    let dir = project();
    let json = stdout_json(
        emberscope()
            .args(["component", "--name", "user-card", "--format", "json"])
            .arg(dir.path()),
    );
    assert_eq!(json["name"], "user-card");
    assert_eq!(json["api"]["tagName"], "article");
    assert_eq!(json["hbsComponents"], serde_json::json!(["Avatar"]));
    let props: Vec<_> = json["jsProps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        props,
        vec![
            "avatar = undefined",
            "showAvatar = undefined",
            "layout = layout",
            "name = null",
        ]
    );
}

#[test]
fn component_lists_names_without_name() {
    let dir = project();
    emberscope()
        .arg("component")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("user-card\n"));
}

#[test]
fn unknown_component_exits_with_not_found() {
    let dir = project();
    emberscope()
        .args(["component", "--name", "missing"])
        .arg(dir.path())
        .assert()
        .code(3);
}

#[test]
fn graph_prints_root() {
    let dir = project();
    let json = stdout_json(emberscope().arg("graph").arg(dir.path()));
    assert_eq!(json[0]["name"], "<ROOT>");
    assert_eq!(json[0]["children"][0]["name"], "user-card");
}

#[test]
fn bad_config_exits_with_config_error() {
    let dir = project();
    write(dir.path(), "emberscope.toml", "[graph]\nroot_name = \"\"\n");
    emberscope().arg("graph").arg(dir.path()).assert().code(2);
}

#[test]
fn meta_reads_stdin() {
    let json = stdout_json(
        emberscope()
            .args(["meta", "-"])
            .write_stdin(r#"{"props": ["b = 1"], "properties": ["this.a"]}"#),
    );
    assert_eq!(json["name"], "<COMPONENT_NAME>");
    assert_eq!(json["jsProps"], serde_json::json!(["a = undefined", "b = 1"]));
}

#[test]
fn meta_follows_project_cross_reference_policy() {
    let dir = project();
    write(dir.path(), "emberscope.toml", "[aggregate]\ncross_reference = \"annotate\"\n");
    let json = stdout_json(
        emberscope()
            .args(["meta", "-", "--root"])
            .arg(dir.path())
            .write_stdin(r#"{"paths": ["model.title"]}"#),
    );
    assert_eq!(json["hbsProps"], serde_json::json!(["model.title as used in template"]));
    assert_eq!(
        json["jsProps"],
        serde_json::json!(["model = undefined // (used in template)"])
    );
}

#[test]
fn meta_without_config_rewrites_in_place() {
    let dir = project();
    let json = stdout_json(
        emberscope()
            .args(["meta", "-", "--root"])
            .arg(dir.path())
            .write_stdin(r#"{"paths": ["model.title"]}"#),
    );
    assert_eq!(json["hbsProps"], serde_json::json!(["model.title"]));
    assert_eq!(json["jsProps"], serde_json::json!([]));
}

#[test]
fn meta_rejects_malformed_sheet() {
    emberscope()
        .args(["meta", "-"])
        .write_stdin("{\"props\": 3}")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Invalid merged fact sheet"));
}
