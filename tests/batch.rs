//! Batch conversion tests against a scratch copy of the golden fixtures.

use std::path::{Path, PathBuf};

use nf_ast::ConvertOptions;
use nf_batch::{concat_results, convert_batch, BatchError};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.as_ref().display()))
}

fn expected(id: &str) -> String {
    read(fixtures_dir().join(format!("{id}.expected.js")))
}

/// Copy the fixtures that convert without options into `dir`.
fn stage_inputs(dir: &Path) {
    for id in [
        "basic",
        "magic",
        "strict",
        "nested/magic_remapped",
        "nested/deep/plugin",
    ] {
        let target = dir.join(format!("{id}.input.js"));
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::copy(fixtures_dir().join(format!("{id}.input.js")), target).unwrap();
    }
}

#[test]
fn mirrors_matched_files_into_output_dir() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    stage_inputs(input.path());

    let pattern = format!("{}/**/*.input.js", input.path().display());
    let records = convert_batch(&pattern, Some(output.path()), &ConvertOptions::default()).unwrap();
    assert_eq!(records.len(), 5);

    let out = output.path();
    assert_eq!(read(out.join("basic.input.js")), expected("basic"));
    assert_eq!(read(out.join("strict.input.js")), expected("strict"));
    assert_eq!(
        read(out.join("nested/magic_remapped.input.js")),
        expected("nested/magic_remapped")
    );
    assert_eq!(
        read(out.join("nested/deep/plugin.input.js")),
        expected("nested/deep/plugin")
    );

    for record in &records {
        let written = record.output_path.as_ref().expect("output path recorded");
        assert_eq!(read(written), record.result);
    }
}

#[test]
fn aggregates_results_in_file_order() {
    let input = tempfile::tempdir().unwrap();
    stage_inputs(input.path());

    let pattern = format!("{}/*.input.js", input.path().display());
    let records = convert_batch(&pattern, None, &ConvertOptions::default()).unwrap();

    let names: Vec<_> = records
        .iter()
        .map(|r| r.source_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["basic.input.js", "magic.input.js", "strict.input.js"]);
    assert!(records.iter().all(|r| r.output_path.is_none()));

    let aggregate = concat_results(&records);
    assert_eq!(
        aggregate,
        expected("basic") + &expected("magic") + &expected("strict")
    );
}

#[test]
fn failures_are_collected_after_all_files_run() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    stage_inputs(input.path());
    std::fs::write(
        input.path().join("broken.input.js"),
        "define(function () {});\ndefine(function () {});\n",
    )
    .unwrap();
    std::fs::write(input.path().join("garbage.input.js"), "define([, function (").unwrap();

    let pattern = format!("{}/*.input.js", input.path().display());
    let err = convert_batch(&pattern, Some(output.path()), &ConvertOptions::default()).unwrap_err();

    match err {
        BatchError::Failed { total, failures } => {
            assert_eq!(total, 5);
            let failed: Vec<_> = failures
                .iter()
                .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            assert_eq!(failed, ["broken.input.js", "garbage.input.js"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Siblings of the failed files were still converted and written.
    assert_eq!(read(output.path().join("basic.input.js")), expected("basic"));
    assert!(!output.path().join("broken.input.js").exists());
}

#[test]
fn same_named_files_in_sibling_dirs_keep_separate_outputs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for (dir, dep) in [("a", "alpha"), ("b", "beta")] {
        let target = input.path().join("in").join(dir).join("x.js");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, format!("define(['{dep}'], function (d) {{ return d; }});\n"))
            .unwrap();
    }

    let pattern = format!("{}/in/*/x.js", input.path().display());
    let records = convert_batch(&pattern, Some(output.path()), &ConvertOptions::default()).unwrap();
    assert_eq!(records.len(), 2);

    let written: Vec<_> = records
        .iter()
        .map(|r| r.output_path.clone().expect("output path recorded"))
        .collect();
    assert_ne!(written[0], written[1]);
    assert_eq!(written[0], output.path().join("x.js"));

    assert_eq!(read(&written[0]), "var d = require('alpha'); module.exports = d; \n");
    assert_eq!(read(&written[1]), "var d = require('beta'); module.exports = d; \n");
    for record in &records {
        assert_eq!(read(record.output_path.as_ref().unwrap()), record.result);
    }
}

#[test]
fn empty_match_is_not_an_error() {
    let input = tempfile::tempdir().unwrap();
    let pattern = format!("{}/*.js", input.path().display());
    let records = convert_batch(&pattern, None, &ConvertOptions::default()).unwrap();
    assert!(records.is_empty());
}
