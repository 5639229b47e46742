use std::path::Path;

use nf_ast::ConvertOptions;

use crate::error::BatchError;

/// Read `input`, convert it and, when `output` is given, write the result
/// there, creating missing parent directories. The converted text is
/// returned either way.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<String, BatchError> {
    let source = std::fs::read_to_string(input).map_err(|e| BatchError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;

    let filename = input.display().to_string();
    let converted =
        nf_convert::convert_named(&source, &filename, options).map_err(|e| BatchError::Convert {
            path: input.to_path_buf(),
            source: e,
        })?;

    if let Some(output) = output {
        write_output(output, &converted)?;
        tracing::info!(input = %input.display(), output = %output.display(), "converted");
    } else {
        tracing::info!(input = %input.display(), "converted");
    }

    Ok(converted)
}

fn write_output(output: &Path, contents: &str) -> Result<(), BatchError> {
    let io_err = |e| BatchError::Io {
        path: output.to_path_buf(),
        source: e,
    };
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    std::fs::write(output, contents).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = "define(['jquery'], function ($) {\n  return $.noop;\n});\n";

    #[test]
    fn returns_converted_text_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("basic.js");
        std::fs::write(&input, BASIC).unwrap();

        let out = convert_file(&input, None, &ConvertOptions::default()).unwrap();
        assert_eq!(out, "var $ = require('jquery');\n  module.exports = $.noop;\n\n");
    }

    #[test]
    fn writes_output_into_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("basic.js");
        std::fs::write(&input, BASIC).unwrap();
        let output = dir.path().join("out/nested/deep/basic.js");

        let out = convert_file(&input, Some(&output), &ConvertOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), out);
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing_file.js");
        let output = dir.path().join("missing_out.js");

        let err = convert_file(&input, Some(&output), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, BatchError::Io { ref path, .. } if path == &input));
        assert!(!output.exists());
    }

    #[test]
    fn conversion_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("twice.js");
        std::fs::write(&input, "define(function () {});\ndefine(function () {});\n").unwrap();
        let output = dir.path().join("twice.out.js");

        let err = convert_file(&input, Some(&output), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, BatchError::Convert { .. }));
        assert!(!output.exists());
    }
}
