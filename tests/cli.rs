//! CLI integration tests for the kittirec binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;

mod common;
use common::write_bmp;

const LABEL_A: &str = "\
Car 0.00 0 1.85 10.00 8.00 30.00 20.00 1.67 1.87 3.69 -16.53 2.39 58.49 1.57
Pedestrian 0.00 0 -0.20 2.00 1.00 6.00 14.00 1.89 0.48 1.20 1.84 1.47 8.41 0.01
";

const LABEL_B: &str = "Cyclist 0.00 3 -1.65 1.00 2.00 9.00 11.00 1.86 0.60 2.02 4.59 1.32 45.84 -1.55\n";

fn create_sample_dataset(root: &Path) {
    write_bmp(&root.join("images/000000.bmp"), 40, 24);
    write_bmp(&root.join("images/000001.bmp"), 32, 32);

    fs::create_dir_all(root.join("labels")).expect("create labels dir");
    fs::write(root.join("labels/000000.txt"), LABEL_A).expect("write label a");
    fs::write(root.join("labels/000001.txt"), LABEL_B).expect("write label b");
}

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("kittirec 0.3.0\n");
}

// Pack subcommand tests

#[test]
fn pack_builds_a_container() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let container = temp.path().join("train.bin");

    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.arg("pack")
        .arg(temp.path().join("images"))
        .arg(temp.path().join("labels"))
        .arg("--output")
        .arg(&container);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Packed 2 record(s)"))
        .stdout(predicates::str::contains("3 box(es)"));

    assert!(container.is_file());
}

#[test]
fn pack_fails_on_missing_label_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    fs::remove_file(temp.path().join("labels/000001.txt")).expect("drop label");

    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.arg("pack")
        .arg(temp.path().join("images"))
        .arg(temp.path().join("labels"))
        .arg("--output")
        .arg(temp.path().join("train.bin"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("No label file found"));
}

// Inspect subcommand tests

#[test]
fn inspect_reports_container_contents() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let container = temp.path().join("train.bin");

    Command::cargo_bin("kittirec")
        .unwrap()
        .arg("pack")
        .arg(temp.path().join("images"))
        .arg(temp.path().join("labels"))
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.arg("inspect").arg(&container);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("records:        2"))
        .stdout(predicates::str::contains("Car"))
        .stdout(predicates::str::contains("Cyclist"));
}

#[test]
fn inspect_json_output_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let container = temp.path().join("train.bin");

    Command::cargo_bin("kittirec")
        .unwrap()
        .arg("pack")
        .arg(temp.path().join("images"))
        .arg(temp.path().join("labels"))
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.args(["inspect"])
        .arg(&container)
        .args(["--output", "json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"records\": 2"))
        .stdout(predicates::str::contains("\"boxes\": 3"));
}

#[test]
fn inspect_rejects_unknown_output_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let container = temp.path().join("train.bin");

    Command::cargo_bin("kittirec")
        .unwrap()
        .arg("pack")
        .arg(temp.path().join("images"))
        .arg(temp.path().join("labels"))
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.args(["inspect"])
        .arg(&container)
        .args(["--output", "xml"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported format"));
}

#[test]
fn inspect_nonexistent_file_fails() {
    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.args(["inspect", "nonexistent.bin"]);
    cmd.assert().failure();
}

// Unpack subcommand tests

#[test]
fn pack_then_unpack_roundtrips_the_dataset() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_sample_dataset(temp.path());
    let container = temp.path().join("train.bin");

    Command::cargo_bin("kittirec")
        .unwrap()
        .arg("pack")
        .arg(temp.path().join("images"))
        .arg(temp.path().join("labels"))
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    let out_images = temp.path().join("out/images");
    let out_labels = temp.path().join("out/labels");
    let mut cmd = Command::cargo_bin("kittirec").unwrap();
    cmd.arg("unpack")
        .arg(&container)
        .arg("--images")
        .arg(&out_images)
        .arg("--labels")
        .arg(&out_labels);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Unpacked 2 record(s)"));

    assert!(out_images.join("000000.jpg").is_file());
    assert!(out_images.join("000001.jpg").is_file());

    let restored_a = fs::read_to_string(out_labels.join("000000.txt")).expect("read label a");
    assert!(restored_a.contains("Car"));
    assert!(restored_a.contains("Pedestrian"));

    let restored_b = fs::read_to_string(out_labels.join("000001.txt")).expect("read label b");
    assert!(restored_b.contains("Cyclist"));
    assert!(restored_b.contains("9.00 11.00"));
}
