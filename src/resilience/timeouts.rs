//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap external calls (lookup, file IO, supervisor commands) with a deadline
//! - Surface an expired deadline as `SettingsError::Timeout`
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the wrapped future is dropped on expiry
//! - Timeout errors are distinct from the wrapped operation's own errors

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::error::{SettingsError, SettingsResult};

/// Run `future` with a deadline of `secs` seconds.
pub async fn with_timeout<T, F>(operation: &'static str, secs: u64, future: F) -> SettingsResult<T>
where
    F: Future<Output = SettingsResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(secs), future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, secs, "Deadline exceeded");
            Err(SettingsError::Timeout { operation, secs })
        }
    }
}

/// Read a whole file as UTF-8 within the deadline.
pub async fn read_file(path: &Path, secs: u64) -> SettingsResult<String> {
    tracing::debug!(path = %path.display(), "Reading file");
    with_timeout("file read", secs, async {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SettingsError::io(path, e))
    })
    .await
}

/// Read a whole file as raw bytes within the deadline.
pub async fn read_bytes(path: &Path, secs: u64) -> SettingsResult<Vec<u8>> {
    tracing::debug!(path = %path.display(), "Reading file");
    with_timeout("file read", secs, async {
        tokio::fs::read(path).await.map_err(|e| SettingsError::io(path, e))
    })
    .await
}

/// Overwrite a file with `contents` within the deadline.
pub async fn write_file(path: &Path, contents: &[u8], secs: u64) -> SettingsResult<()> {
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Writing file");
    with_timeout("file write", secs, async {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| SettingsError::io(path, e))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let value = with_timeout("noop", 1, async { Ok::<_, SettingsError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_is_timeout() {
        let result: SettingsResult<()> = with_timeout("slow call", 2, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;
        assert!(matches!(
            result,
            Err(SettingsError::Timeout { operation: "slow call", secs: 2 })
        ));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_file(&path, b"{\"port\":3678}", 1).await.unwrap();
        assert_eq!(read_file(&path, 1).await.unwrap(), "{\"port\":3678}");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_bytes(&dir.path().join("nope.css"), 1).await.unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
