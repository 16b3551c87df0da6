// Logging Tests
// Installs the global subscriber, so this binary holds exactly one test

use certnotify::config::LogConfig;
use certnotify::logging;

#[test]
fn test_log_file_created_and_flushed_on_guard_drop() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig {
        directory: dir.path().join("logs"),
        file_name: "app.log".to_string(),
        default_filter: "info".to_string(),
    };

    let guard = logging::init(&config).unwrap();
    tracing::info!("--- Starting Check ---");
    tracing::debug!("hidden at the default level");
    drop(guard);

    let contents = std::fs::read_to_string(config.file_path()).unwrap();
    assert!(contents.contains("INFO"));
    assert!(contents.contains("--- Starting Check ---"));
    assert!(!contents.contains('\u{1b}'), "file output has no ANSI escapes");

    // A second install in the same process is refused
    assert!(logging::init(&config).is_err());
}
