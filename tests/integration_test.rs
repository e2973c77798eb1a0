//! Integration tests for graph-lineage using the library interface

use std::fs;
use std::path::Path;

use graph_lineage::cli::PlaceholderMode;
use graph_lineage::common::ConfigBuilder;
use graph_lineage::config::{BatchConfig, RenderConfig};
use graph_lineage::executors::CommandExecutor;
use graph_lineage::executors::batch::BatchExecutor;
use graph_lineage::executors::render::RenderExecutor;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const UQBAR_FACTS: &str = r#"{
    "name": "uqbar",
    "records": [
        { "name": "uqbar", "kind": "package" },
        { "name": "uqbar.io", "kind": "module" },
        { "name": "uqbar.io.Timer", "kind": "class", "bases": ["builtins.object"] },
        { "name": "uqbar.io.Walker", "kind": "class", "bases": ["uqbar.io.Timer"] }
    ]
}"#;

const CORE_FACTS: &str = r#"
[[records]]
name = "core.Base"
kind = "class"

[[records]]
name = "core.Derived"
kind = "class"
bases = ["core.Base", "abc.ABC"]
style = { color = "red" }
"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_render_json_facts_to_file() {
    let temp = TempDir::new().unwrap();
    let facts = write(temp.path(), "uqbar.json", UQBAR_FACTS);
    let output = temp.path().join("uqbar.dot");

    let config = RenderConfig::builder()
        .with_facts(facts)
        .with_output(Some(output.clone()))
        .build()
        .unwrap();
    RenderExecutor::execute(config).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        concat!(
            "digraph uqbar {\n",
            "    subgraph cluster_uqbar {\n",
            "        graph [label=uqbar];\n",
            "        subgraph \"cluster_uqbar.io\" {\n",
            "            graph [label=io];\n",
            "            \"uqbar.io.Timer\" [label=Timer];\n",
            "            \"uqbar.io.Walker\" [label=Walker];\n",
            "        }\n",
            "    }\n",
            "    \"builtins.object\" [label=object];\n",
            "    \"uqbar.io.Timer\" -> \"builtins.object\";\n",
            "    \"uqbar.io.Walker\" -> \"uqbar.io.Timer\";\n",
            "}\n",
        )
    );
}

#[test]
fn test_render_with_style_file_and_overrides() {
    let temp = TempDir::new().unwrap();
    let facts = write(temp.path(), "core.toml", CORE_FACTS);
    let style = write(
        temp.path(),
        "style.toml",
        "class_labels = false\n\n[node]\nshape = \"box\"\n\n[placeholder]\nstyle = \"dashed\"\n",
    );
    let output = temp.path().join("core.dot");

    let config = RenderConfig::builder()
        .with_facts(facts)
        .with_output(Some(output.clone()))
        .with_style(Some(style))
        .with_placeholders(Some(PlaceholderMode::Shared))
        .with_undirected(true)
        .build()
        .unwrap();
    RenderExecutor::execute(config).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        concat!(
            "graph {\n",
            "    node [shape=box];\n",
            "    \"core.Base\";\n",
            "    \"core.Derived\" [color=red];\n",
            "    \"core.Derived\" -- \"core.Base\";\n",
            "    external [style=dashed];\n",
            "    \"core.Derived\" -- external;\n",
            "}\n",
        )
    );
}

#[test]
fn test_render_with_lineage() {
    let temp = TempDir::new().unwrap();
    let facts = write(
        temp.path(),
        "facts.json",
        r#"{ "records": [
            { "name": "a.One", "kind": "class" },
            { "name": "b.Two", "kind": "class", "bases": ["a.One"] },
            { "name": "c.Three", "kind": "class" }
        ] }"#,
    );
    let output = temp.path().join("out.dot");

    let config = RenderConfig::builder()
        .with_facts(facts)
        .with_output(Some(output.clone()))
        .with_lineage(Some("b".to_string()))
        .build()
        .unwrap();
    RenderExecutor::execute(config).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(predicate::str::contains("\"b.Two\" -> \"a.One\";").eval(&text));
    assert!(predicate::str::contains("c.Three").not().eval(&text));
}

#[test]
fn test_render_reports_invalid_facts() {
    let temp = TempDir::new().unwrap();
    let facts = write(temp.path(), "broken.json", "{ \"records\": [ { \"name\": 1 } ] }");

    let config = RenderConfig::builder()
        .with_facts(facts)
        .with_output(Some(temp.path().join("broken.dot")))
        .build()
        .unwrap();
    let err = RenderExecutor::execute(config).unwrap_err();

    assert!(err.chain().any(|cause| cause.to_string().contains("broken.json")));
    assert!(!temp.path().join("broken.dot").exists());
}

#[test]
fn test_batch_renders_every_fact_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("facts");
    write(&input, "uqbar.json", UQBAR_FACTS);
    write(&input, "nested/core.toml", CORE_FACTS);
    write(&input, "nested/ignored.txt", "not facts");
    let output_dir = temp.path().join("graphs");

    // Directories are searched with the pattern, explicit files are taken as given
    let config = BatchConfig::builder()
        .with_paths(vec![input.clone(), input.join("nested/core.toml")])
        .with_output_dir(output_dir.clone())
        .build()
        .unwrap();
    BatchExecutor::execute(config).unwrap();

    let mut written: Vec<String> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    written.sort();
    assert_eq!(written, vec!["core.dot", "uqbar.dot"]);

    let core = fs::read_to_string(output_dir.join("core.dot")).unwrap();
    assert!(predicate::str::starts_with("digraph {\n").eval(&core));
    assert!(predicate::str::contains("\"abc.ABC\" [label=ABC];").eval(&core));
}

#[test]
fn test_batch_fails_when_a_file_is_invalid() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("facts");
    write(&input, "good.json", UQBAR_FACTS);
    write(&input, "bad.json", "{ not json");
    let output_dir = temp.path().join("graphs");

    let config = BatchConfig::builder()
        .with_paths(vec![input])
        .with_output_dir(output_dir.clone())
        .build()
        .unwrap();

    assert!(BatchExecutor::execute(config).is_err());
    assert!(output_dir.join("good.dot").exists());
    assert!(!output_dir.join("bad.dot").exists());
}

#[test]
fn test_batch_with_no_matches_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    let output_dir = temp.path().join("graphs");

    let config = BatchConfig::builder()
        .with_paths(vec![temp.path().to_path_buf()])
        .with_output_dir(output_dir.clone())
        .build()
        .unwrap();

    BatchExecutor::execute(config).unwrap();
    assert!(!output_dir.exists());
}

#[test]
fn test_style_hints_keep_file_order() {
    let temp = TempDir::new().unwrap();
    let facts = write(
        temp.path(),
        "styled.json",
        r#"{"records": [{"name": "A", "kind": "class", "style": {"shape": "box", "color": "red"}}]}"#,
    );
    let style = write(
        temp.path(),
        "style.toml",
        "[node]\nfontsize = 9\nfontname = \"Arial\"\n",
    );
    let output = temp.path().join("styled.dot");

    let config = RenderConfig::builder()
        .with_facts(facts)
        .with_output(Some(output.clone()))
        .with_style(Some(style))
        .build()
        .unwrap();
    RenderExecutor::execute(config).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        concat!(
            "digraph {\n",
            "    node [fontsize=9, fontname=Arial];\n",
            "    A [shape=box, color=red];\n",
            "}\n",
        )
    );
}
