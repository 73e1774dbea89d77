//! Tests for the cleanup command

use clone_chat::commands::{cleanup_run, CleanupOutcome};
use clone_chat::{Config, Error, SessionLock};
use tempfile::tempdir;

#[tokio::test]
async fn test_cleanup_lifecycle() {
    let temp = tempdir().unwrap();
    let config = Config {
        session_name: temp.path().join("session").display().to_string(),
        ..Config::default()
    };

    assert_eq!(cleanup_run(&config).await.unwrap(), CleanupOutcome::NothingToDo);

    {
        let _lock = SessionLock::acquire(config.lock_file()).unwrap();
        assert!(matches!(cleanup_run(&config).await, Err(Error::SessionLocked)));
    }

    std::fs::write(config.lock_file(), b"").unwrap();
    assert_eq!(cleanup_run(&config).await.unwrap(), CleanupOutcome::Removed);
}
