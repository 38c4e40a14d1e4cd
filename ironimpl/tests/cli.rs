use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shapes.xml")
}

fn ironimpl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ironimpl"));
    cmd.env_remove("IRONIMPL_TYPES")
        .env_remove("IRONIMPL_JAVAC")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_generates_source() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().join("src");

    ironimpl()
        .arg("-t")
        .arg(fixture())
        .arg("com.example.Shape")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("ShapeImpl.java"));

    let text = std::fs::read_to_string(root.join("com/example/ShapeImpl.java"))
        .expect("Failed to read generated source");
    assert_eq!(
        text,
        "package com.example;\n\
         \n\
         public class ShapeImpl implements Shape {\n\
         \n    public double area() {\n        return 0;\n    }\n\
         \n    public boolean isEmpty() {\n        return true;\n    }\n\
         \n    public void reset() {\n    }\n\
         \n    @java.lang.Deprecated(forRemoval=false, since=\"\")\n    public com.example.Shape scale(double factor) throws java.io.IOException {\n        return null;\n    }\n\
         \n    public java.lang.String name() {\n        return null;\n    }\n\
         }\n"
    );
}

#[test]
fn test_regeneration_is_identical() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("com/example/ShapeImpl.java");

    for _ in 0..2 {
        ironimpl()
            .arg("--types")
            .arg(fixture())
            .arg("com.example.Shape")
            .arg(temp_dir.path())
            .assert()
            .success();
    }
    let first = std::fs::read(&path).expect("Failed to read generated source");

    ironimpl()
        .env("IRONIMPL_TYPES", fixture())
        .arg("com.example.Shape")
        .arg(temp_dir.path())
        .assert()
        .success();
    let second = std::fs::read(&path).expect("Failed to read generated source");

    assert_eq!(first, second);
}

#[test]
fn test_abstract_class_skips_final_members() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    ironimpl()
        .arg("-t")
        .arg(fixture())
        .arg("com.example.AbstractTask")
        .arg(temp_dir.path())
        .assert()
        .success();

    let text = std::fs::read_to_string(temp_dir.path().join("com/example/AbstractTaskImpl.java"))
        .expect("Failed to read generated source");
    assert!(text.contains("public class AbstractTaskImpl extends AbstractTask {"));
    assert!(text.contains("public void run()"));
    assert!(!text.contains("id()"));
}

#[test]
fn test_missing_arguments() {
    ironimpl().assert().failure().code(2);

    ironimpl()
        .arg("-t")
        .arg(fixture())
        .arg("com.example.Shape")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_help_and_version() {
    ironimpl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--types"));

    ironimpl().arg("--version").assert().success();
}

#[test]
fn test_unresolvable_type() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    ironimpl()
        .arg("-t")
        .arg(fixture())
        .arg("com.example.Missing")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("type resolution error"));
}

#[test]
fn test_invalid_targets_create_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    for target in ["int", "com.example.Shape[]", "com.example.Point", ""] {
        ironimpl()
            .arg("-t")
            .arg(fixture())
            .arg(target)
            .arg(temp_dir.path())
            .assert()
            .failure()
            .code(4)
            .stderr(predicate::str::contains("invalid target"));
    }

    let entries = std::fs::read_dir(temp_dir.path())
        .expect("Failed to read dir")
        .count();
    assert_eq!(entries, 0);
}

#[test]
fn test_source_root_is_a_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file = temp_dir.path().join("not-a-dir");
    std::fs::write(&file, b"x").expect("Failed to write file");

    ironimpl()
        .arg("-t")
        .arg(fixture())
        .arg("Counter")
        .arg(&file)
        .assert()
        .failure()
        .code(6);
}

#[test]
fn test_library_errors() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    ironimpl()
        .arg("-t")
        .arg(temp_dir.path().join("missing.xml"))
        .arg("Counter")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(9)
        .stderr(predicate::str::contains("type library error"));

    let cyclic = temp_dir.path().join("cyclic.xml");
    std::fs::write(
        &cyclic,
        r#"<typeLibrary>
            <type name="a.A"><extends type="a.B"/></type>
            <type name="a.B"><extends type="a.A"/></type>
        </typeLibrary>"#,
    )
    .expect("Failed to write library");

    ironimpl()
        .arg("-t")
        .arg(&cyclic)
        .arg("a.A")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(9);
}

#[test]
fn test_jar_without_compiler() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let destination = temp_dir.path().join("counter.jar");

    ironimpl()
        .arg("-t")
        .arg(fixture())
        .arg("--javac")
        .arg(temp_dir.path().join("no-such-javac"))
        .arg("--scratch-dir")
        .arg(temp_dir.path())
        .arg("-jar")
        .arg("Counter")
        .arg(&destination)
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("compile error"));

    assert!(!destination.exists());
    // Scratch root removed.
    let entries = std::fs::read_dir(temp_dir.path())
        .expect("Failed to read dir")
        .count();
    assert_eq!(entries, 0);
}

#[test]
fn test_jar_destination_is_a_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    ironimpl()
        .arg("-t")
        .arg(fixture())
        .arg("-jar")
        .arg("Counter")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(6);
}
