//! Integration tests for config-driven backoff execution

use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use portal_core::retry::{BackoffExecutorBuilder, StatsObserver};
use portal_core::ConfigLoader;
use serial_test::serial;
use tempfile::{NamedTempFile, TempDir};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn utf8(path: &std::path::Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
}

#[derive(Debug, PartialEq)]
struct LookupFailed(u32);

impl std::fmt::Display for LookupFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session lookup failed on call {}", self.0)
    }
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_session_lookup_with_default_config() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::with_dir(utf8(dir.path())).load().unwrap();
    let policy = config.retry_policies.policy_for("session").clone();
    assert_eq!(policy.max_retries, 3);

    let calls = Arc::new(AtomicU32::new(0));
    let observer = Arc::new(StatsObserver::new());
    let executor = BackoffExecutorBuilder::new()
        .with_policy(policy)
        .with_observer(observer.clone())
        .build();

    let started = tokio::time::Instant::now();
    let counter = calls.clone();
    let result = executor
        .execute(move || {
            let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(LookupFailed(call))
                } else {
                    Ok("user-42")
                }
            }
        })
        .await;

    assert_eq!(result, Ok("user-42"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(observer.retries(), 2);

    // 100-200ms then 200-300ms
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(500), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_operation_policy_from_file() {
    let file = write_config(
        r#"
retry-policies:
  operations:
    cms:
      max-retries: 1
      base-delay-ms: 1000
      factor: 2.0
      jitter-ms: 0
"#,
    );
    let config = ConfigLoader::with_dir(utf8(file.path().parent().unwrap()))
        .with_file(utf8(file.path()))
        .load()
        .unwrap();
    let policy = config.retry_policies.policy_for("cms").clone();

    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let started = tokio::time::Instant::now();

    let result: Result<(), LookupFailed> = BackoffExecutorBuilder::new()
        .with_policy(policy)
        .build()
        .execute(move || {
            let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(LookupFailed(call)) }
        })
        .await;

    // Final failure comes back untouched
    assert_eq!(result, Err(LookupFailed(2)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(1000));
}

#[test]
#[serial]
fn test_invalid_factor_rejected() {
    let file = write_config(
        r#"
retry-policies:
  default:
    max-retries: 3
    base-delay-ms: 100
    factor: 0.5
"#,
    );
    let result = ConfigLoader::with_dir(utf8(file.path().parent().unwrap()))
        .with_file(utf8(file.path()))
        .load();
    assert!(result.is_err());
}
