//! End-to-end lifecycle of the root registry against a custom config path:
//! terminal miss, first init, idempotent no-op, forced reinitialization.
//!
//! Everything lives in one test function because the registry is
//! process-wide state and the steps only make sense in order.

use logroot_core::{create_root, root_registry, RootOptions, SinkInfo, SinkMode};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

fn write_config(path: &Path, logs_dir: &Path, overwrite: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        format!(
            "[Logger Settings]\n\
             FilePath = {}/\n\
             FileName = bootstrap\n\
             Extension = .log\n\
             IncludeTimestamp = FALSE\n\
             Overwrite = {overwrite}\n\
             ConsoleOutput = FALSE\n\
             LogLevel = DEBUG\n",
            logs_dir.display()
        ),
    )
    .unwrap();
}

fn assert_record_shape(line: &str, suffix: &str) {
    assert!(
        line.ends_with(suffix),
        "expected `{line}` to end with `{suffix}`"
    );
    // Timestamp prefix: MM/DD/YYYY hh:mm:ss AM|PM
    let bytes = line.as_bytes();
    assert_eq!(bytes[2], b'/');
    assert_eq!(bytes[5], b'/');
    assert_eq!(bytes[10], b' ');
    assert_eq!(bytes[13], b':');
    assert_eq!(bytes[16], b':');
    assert!(matches!(&line[20..22], "AM" | "PM"), "bad meridiem in `{line}`");
    assert_eq!(line.len(), 22 + 1 + suffix.len());
}

#[test]
fn custom_path_lifecycle() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("Configs").join("Logger.ini");
    let logs_dir = dir.path().join("logs");
    let log_file = logs_dir.join("bootstrap.log");

    // A missing custom path is terminal: no auto-creation, no sinks.
    let missing = PathBuf::from(dir.path().join("nonexistent.ini"));
    let err = create_root(RootOptions {
        config_file_path: Some(missing.clone()),
        ..RootOptions::default()
    })
    .unwrap_err();
    assert_eq!(err.code(), "LB1100");
    assert!(!missing.exists(), "custom paths must never be auto-created");
    assert_eq!(root_registry().handler_count(), 0);

    // First successful init: Overwrite=TRUE means the file sink truncates.
    write_config(&config_path, &logs_dir, "TRUE");
    let first = create_root(RootOptions {
        config_file_path: Some(config_path.clone()),
        ..RootOptions::default()
    })
    .unwrap();
    assert_eq!(first.handler_count(), 1);
    assert_eq!(
        first.sinks(),
        vec![SinkInfo::File {
            path: log_file.clone(),
            mode: SinkMode::Truncate,
        }]
    );

    let worker = first.logger("worker");
    worker.info("first pass");
    let contents = fs::read_to_string(&log_file).unwrap();
    assert_record_shape(
        contents.lines().last().unwrap(),
        "[INFO] [worker]: first pass",
    );

    // Records from the `log` facade share the same sinks.
    log::warn!(target: "facade", "via the facade");
    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("[WARNING] [facade]: via the facade"));

    // Second call without overwrite_root: warned no-op, same handle, same
    // sink set.
    let second = create_root(RootOptions {
        config_file_path: Some(config_path.clone()),
        ..RootOptions::default()
    })
    .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.handler_count(), 1);
    assert_eq!(second.sinks(), first.sinks());

    // The no-op is announced by exactly one warning, routed into the file
    // since handlers already exist.
    let contents = fs::read_to_string(&log_file).unwrap();
    assert_eq!(
        contents
            .matches("ignoring this create_root() call")
            .count(),
        1,
        "idempotent second call must warn exactly once"
    );

    // The deprecated alias forwards and stays idempotent too.
    #[allow(deprecated)]
    let aliased = logroot_core::create_logger(RootOptions {
        config_file_path: Some(config_path.clone()),
        ..RootOptions::default()
    })
    .unwrap();
    assert_eq!(aliased.handler_count(), 1);

    // Forced reinit: the new file sink appends even though Overwrite=TRUE,
    // so this run's history survives.
    let third = create_root(RootOptions {
        config_file_path: Some(config_path.clone()),
        overwrite_root: true,
        ..RootOptions::default()
    })
    .unwrap();
    assert_eq!(
        third.sinks(),
        vec![SinkInfo::File {
            path: log_file.clone(),
            mode: SinkMode::Append,
        }]
    );

    third.logger("worker").info("after reinit");
    let contents = fs::read_to_string(&log_file).unwrap();
    assert!(
        contents.contains("first pass"),
        "forced reinit must not discard records written earlier in this run"
    );
    assert!(contents.contains("after reinit"));

    // The teardown was announced by exactly two warnings, delivered to the
    // old sinks before they were removed.
    assert_eq!(
        contents
            .matches("create_root(overwrite_root = true) was called with 1 handlers")
            .count(),
        1
    );
    assert_eq!(
        contents
            .matches("This is the last message before removing handlers")
            .count(),
        1
    );
}
