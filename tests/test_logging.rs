use chatstats::logging;

#[test]
fn test_file_logging() -> anyhow::Result<()> {
    // Create a temporary test directory
    let test_dir = tempfile::tempdir()?;
    let log_dir = test_dir.path().join("logs");

    logging::init_logging(Some(&log_dir), false)?;

    // Write some test logs
    tracing::info!(target: "chatstats", "Test info message");
    tracing::debug!(target: "chatstats", "Test debug message");
    tracing::warn!(target: "chatstats", "Test warning message");

    // Give it a moment to flush
    std::thread::sleep(std::time::Duration::from_millis(100));

    let log_file = log_dir.join(logging::LOG_FILE_NAME);
    assert!(log_file.exists(), "Log file not created");

    let contents = std::fs::read_to_string(&log_file)?;
    assert!(contents.contains("New analysis run"));
    if std::env::var_os("RUST_LOG").is_none() {
        assert!(contents.contains("Test info message"));
        assert!(contents.contains("Test warning message"));
        assert!(!contents.contains("Test debug message"));
    }

    // A second initialization is ignored
    logging::init_logging(Some(&log_dir), true)?;

    Ok(())
}
