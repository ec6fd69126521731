//! Integration tests driving the `vote_cli` binaries as black boxes.
//!
//! Each test writes a tiny fixture model/dataset to a temp directory and
//! checks the binary's stdout and exit code, the same way a CLI smoke test
//! would be run by hand.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

/// A single-feature, two-class stump: `x0 < 0.5` routes to class 0,
/// otherwise class 1.
const STUMP_MODEL: &str = r#"{
    "post_process": "none",
    "trees": [
        {
            "nb_inputs": 1,
            "nb_outputs": 2,
            "left": [1, -1, -1],
            "right": [2, -1, -1],
            "feature": [0, -1, -1],
            "threshold": [0.5, 0.0, 0.0],
            "value": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
        }
    ]
}"#;

fn model_fixture() -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(STUMP_MODEL.as_bytes()).unwrap();
    f
}

#[test]
fn iospace_prints_the_joined_output_envelope() {
    let model = model_fixture();

    Command::cargo_bin("iospace")
        .unwrap()
        .arg(model.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("x0 in"))
        .stdout(predicate::str::contains("y0 in [0, 1]"))
        .stdout(predicate::str::contains("y1 in [0, 1]"));
}

#[test]
fn cardinality_counts_both_leaves_as_mappings() {
    let model = model_fixture();

    Command::cargo_bin("cardinality")
        .unwrap()
        .arg(model.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("cardinality:nb_mappings: 2"));
}

#[test]
fn mappings_prints_one_line_per_mapping() {
    let model = model_fixture();

    let output = Command::cargo_bin("mappings")
        .unwrap()
        .arg(model.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn range_passes_when_both_classes_stay_within_unit_bounds() {
    let model = model_fixture();

    Command::cargo_bin("range")
        .unwrap()
        .args([model.path().to_str().unwrap(), "0", "1", "0", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("range:result: pass"));
}

#[test]
fn range_rejects_a_malformed_bounds_count() {
    let model = model_fixture();

    Command::cargo_bin("range")
        .unwrap()
        .args([model.path().to_str().unwrap(), "0", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 4 min/max arguments"));
}

#[test]
fn accuracy_scores_a_perfectly_separable_dataset() {
    let model = model_fixture();
    let mut dataset = NamedTempFile::new().unwrap();
    writeln!(dataset, "0.0,0\n1.0,1").unwrap();

    Command::cargo_bin("accuracy")
        .unwrap()
        .args([model.path(), dataset.path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("accuracy:score: 1"));
}
