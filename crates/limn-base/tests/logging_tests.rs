use limn_base::logging::{FileLogger, LogConfig, StdoutLogger, init_file_logger};
use log::{LevelFilter, Log};
use std::fs;

fn record_at(level: log::Level, line: u32, args: std::fmt::Arguments<'_>, f: impl FnOnce(&log::Record)) {
    let record = log::RecordBuilder::new()
        .level(level)
        .target("test")
        .file(Some("test.rs"))
        .line(Some(line))
        .args(args)
        .build();
    f(&record);
}

#[test]
fn test_stdout_logger_does_not_panic() {
    let logger = StdoutLogger;
    record_at(log::Level::Error, 42, format_args!("stdout message"), |r| logger.log(r));
    logger.flush();
}

#[test]
fn test_file_logger_writes_formatted_line() {
    let test_dir = std::env::temp_dir().join(format!("limn-log-test-{}-write", std::process::id()));
    let _ = fs::remove_dir_all(&test_dir);

    log::set_max_level(LevelFilter::Trace);
    let logger = FileLogger::new(&test_dir).expect("Failed to create FileLogger");
    record_at(log::Level::Error, 100, format_args!("camera denied"), |r| logger.log(r));
    logger.flush();

    let entries: Vec<_> = fs::read_dir(&test_dir)
        .expect("Failed to read test directory")
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(entries.len(), 1, "Should have exactly one log file");

    let content = fs::read_to_string(entries[0].path()).unwrap();
    assert!(content.contains("[ERROR]"));
    assert!(content.contains("thread:"));
    assert!(content.contains("test.rs:100"));
    assert!(content.contains("camera denied"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn test_init_file_logger_invalid_dir_returns_error() {
    let result = init_file_logger("/proc/nonexistent/path", LevelFilter::Info);
    assert!(result.is_err());
}

#[test]
fn test_log_config_level_filter() {
    let config = LogConfig {
        level: Some("warn".to_string()),
        dir: None,
    };
    assert_eq!(config.level_filter(), LevelFilter::Warn);

    let unknown = LogConfig {
        level: Some("loud".to_string()),
        dir: None,
    };
    let expected = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    assert_eq!(unknown.level_filter(), expected);
}

#[test]
fn test_log_config_deserializes_with_defaults() {
    let config: LogConfig = serde_json::from_str(r#"{"dir": "/tmp/limn"}"#).unwrap();
    assert_eq!(config.level, None);
    assert_eq!(config.dir.as_deref(), Some(std::path::Path::new("/tmp/limn")));
}

#[test]
fn test_log_fatal_exits_with_failure() {
    // the macro exits the process, so run it in a child copy of this test binary
    if std::env::var_os("LIMN_LOG_FATAL_CHILD").is_some() {
        limn_base::log_fatal!("camera lost: {}", "/dev/video0");
    }

    let exe = std::env::current_exe().unwrap();
    let output = std::process::Command::new(exe)
        .args(["--exact", "test_log_fatal_exits_with_failure", "--nocapture"])
        .env("LIMN_LOG_FATAL_CHILD", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}
