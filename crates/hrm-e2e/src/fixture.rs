// Fixture - Session lifecycle and per-test scaffolding
//
// A test owns exactly one `Session`. The runner authenticates it before the
// body, hands the body a `TestContext` (which can use the page but not end
// the session), and on every exit path captures at most one failure
// screenshot and then tears the session down. Panics in the body are caught,
// cleaned up after and resumed.

use crate::config::Config;
use crate::data::TestDataFactory;
use crate::driver::{BrowserDriver, PageHandle};
use crate::error::{Error, Result};
use crate::routes::Routes;
use crate::workflows::{
    AdminWorkflow, AuthWorkflow, EmployeeWorkflow, LeaveWorkflow, RecruitmentWorkflow,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Authenticating,
    Ready,
    TornDown,
}

/// An authenticated browser context bound to one test
pub struct Session {
    driver: Arc<dyn BrowserDriver>,
    config: Arc<Config>,
    handle: PageHandle,
    state: SessionState,
}

impl Session {
    pub fn new(driver: Arc<dyn BrowserDriver>, config: Arc<Config>) -> Self {
        let handle = PageHandle::new(Arc::clone(&driver), Arc::clone(&config));
        Self {
            driver,
            config,
            handle,
            state: SessionState::Uninitialized,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Logs in with the configured credentials and checks the dashboard URL.
    ///
    /// Fails with `SessionState` unless the session is fresh.
    pub async fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(Error::SessionState(format!(
                "cannot start a session in state {:?}",
                self.state
            )));
        }
        self.state = SessionState::Authenticating;
        AuthWorkflow::new(&self.handle)
            .login(&self.config.credentials)
            .await?;
        if !self.handle.url_matches(&Routes::contains("/dashboard/")).await {
            let url = self.handle.current_url().await.unwrap_or_default();
            return Err(Error::SessionState(format!(
                "logged in but not on the dashboard ({})",
                url
            )));
        }
        self.state = SessionState::Ready;
        tracing::debug!("Session ready");
        Ok(())
    }

    /// The page of a ready session
    pub fn page(&self) -> Result<&PageHandle> {
        match self.state {
            SessionState::Ready => Ok(&self.handle),
            other => Err(Error::SessionState(format!(
                "page requested in state {:?}",
                other
            ))),
        }
    }

    /// Ends the session: one logout attempt if it was ready, then the driver
    /// is closed. Calling it again does nothing.
    ///
    /// A failed logout is logged, not returned; only a failed close is.
    pub async fn teardown(&mut self) -> Result<()> {
        let previous = std::mem::replace(&mut self.state, SessionState::TornDown);
        match previous {
            SessionState::TornDown => return Ok(()),
            SessionState::Ready => {
                if let Err(e) = AuthWorkflow::new(&self.handle).logout().await {
                    tracing::warn!("Logout during teardown failed: {}", e);
                }
            }
            SessionState::Uninitialized | SessionState::Authenticating => {}
        }
        self.driver.close().await
    }
}

// ============================================================================
// TestContext
// ============================================================================

/// What a test body receives
pub struct TestContext {
    name: String,
    page: PageHandle,
    data: TestDataFactory,
}

impl TestContext {
    pub fn new(name: impl Into<String>, page: PageHandle) -> Self {
        Self {
            name: name.into(),
            page,
            data: TestDataFactory::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    pub fn data(&self) -> &TestDataFactory {
        &self.data
    }

    pub fn auth(&self) -> AuthWorkflow {
        AuthWorkflow::new(&self.page)
    }

    pub fn employees(&self) -> EmployeeWorkflow {
        EmployeeWorkflow::new(&self.page)
    }

    pub fn leave(&self) -> LeaveWorkflow {
        LeaveWorkflow::new(&self.page)
    }

    pub fn admin(&self) -> AdminWorkflow {
        AdminWorkflow::new(&self.page)
    }

    pub fn recruitment(&self) -> RecruitmentWorkflow {
        RecruitmentWorkflow::new(&self.page)
    }
}

// ============================================================================
// Failure artifacts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Screenshot,
}

impl ArtifactKind {
    fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Screenshot => "png",
        }
    }
}

/// Diagnostic output captured for a failed test
#[derive(Debug, Clone)]
pub struct Artifact {
    pub test_name: String,
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

impl Artifact {
    /// File name: sanitized test name, UTC timestamp, extension
    pub fn file_name(&self) -> String {
        let stem: String = self
            .test_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!(
            "{}-{}.{}",
            stem,
            self.captured_at.format("%Y%m%dT%H%M%S%.3f"),
            self.kind.extension()
        )
    }
}

/// Where failure artifacts go
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn store(&self, artifact: Artifact) -> Result<()>;
}

/// Writes artifacts into a directory, creating it on first use
pub struct FileArtifactSink {
    dir: PathBuf,
}

impl FileArtifactSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ArtifactSink for FileArtifactSink {
    async fn store(&self, artifact: Artifact) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(artifact.file_name());
        tokio::fs::write(&path, &artifact.bytes).await?;
        tracing::info!(path = %path.display(), "Failure artifact written");
        Ok(())
    }
}

/// Keeps artifacts in memory
#[derive(Default)]
pub struct MemoryArtifactSink {
    artifacts: Mutex<Vec<Artifact>>,
}

impl MemoryArtifactSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        self.artifacts.lock().clone()
    }
}

#[async_trait]
impl ArtifactSink for MemoryArtifactSink {
    async fn store(&self, artifact: Artifact) -> Result<()> {
        self.artifacts.lock().push(artifact);
        Ok(())
    }
}

// ============================================================================
// Runner
// ============================================================================

enum BodyResult {
    Passed,
    Failed(Error),
    Panicked(Box<dyn std::any::Any + Send>),
}

/// Runs test bodies inside a managed session
pub struct TestRunner {
    config: Arc<Config>,
    sink: Arc<dyn ArtifactSink>,
}

impl TestRunner {
    /// Runner writing failure screenshots to `config.artifacts_dir`.
    pub fn new(config: Config) -> Self {
        let sink = Arc::new(FileArtifactSink::new(&config.artifacts_dir));
        Self {
            config: Arc::new(config),
            sink,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Runs `body` as test `name` on `driver`.
    ///
    /// Order on every path: start session, body (bounded by the `test`
    /// timeout), screenshot if the body did not pass, teardown. A panic in
    /// the body is resumed after teardown.
    pub async fn run<F, Fut>(&self, name: &str, driver: Arc<dyn BrowserDriver>, body: F) -> Result<()>
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = Result<()>> + Send,
    {
        tracing::info!(test = name, "Starting test");
        let mut session = Session::new(driver, Arc::clone(&self.config));

        let ctx = match session.start().await.and_then(|()| session.page().cloned()) {
            Ok(page) => TestContext::new(name, page),
            Err(e) => {
                tracing::warn!(test = name, "Session setup failed: {}", e);
                self.capture_failure(name, &session).await;
                if let Err(close) = session.teardown().await {
                    tracing::warn!("Closing the browser failed: {}", close);
                }
                return Err(e.context(format!("set up session for '{}'", name)));
            }
        };

        let budget = self.config.timeouts.test;
        let result = match tokio::time::timeout(budget, AssertUnwindSafe(body(ctx)).catch_unwind())
            .await
        {
            Ok(Ok(Ok(()))) => BodyResult::Passed,
            Ok(Ok(Err(e))) => BodyResult::Failed(e),
            Ok(Err(panic)) => BodyResult::Panicked(panic),
            Err(_) => BodyResult::Failed(Error::Timeout {
                what: format!("test '{}'", name),
                waited: budget,
            }),
        };

        if !matches!(result, BodyResult::Passed) {
            self.capture_failure(name, &session).await;
        }
        let closed = session.teardown().await;

        match result {
            BodyResult::Passed => {
                tracing::info!(test = name, "Test passed");
                closed
            }
            BodyResult::Failed(e) => {
                tracing::warn!(test = name, "Test failed: {}", e);
                if let Err(close) = closed {
                    tracing::warn!("Closing the browser failed: {}", close);
                }
                Err(e)
            }
            BodyResult::Panicked(panic) => {
                tracing::warn!(test = name, "Test panicked");
                if let Err(close) = closed {
                    tracing::warn!("Closing the browser failed: {}", close);
                }
                std::panic::resume_unwind(panic)
            }
        }
    }

    // One screenshot; failures to capture or store are logged only
    async fn capture_failure(&self, name: &str, session: &Session) {
        let bytes = match session.handle.screenshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(test = name, "Failure screenshot not captured: {}", e);
                return;
            }
        };
        let artifact = Artifact {
            test_name: name.to_string(),
            kind: ArtifactKind::Screenshot,
            bytes,
            captured_at: Utc::now(),
        };
        if let Err(e) = self.sink.store(artifact).await {
            tracing::warn!(test = name, "Failure screenshot not stored: {}", e);
        }
    }
}

/// `TestRunner::new(config).run(name, driver, body)`
pub async fn run_test<F, Fut>(
    name: &str,
    driver: Arc<dyn BrowserDriver>,
    config: Config,
    body: F,
) -> Result<()>
where
    F: FnOnce(TestContext) -> Fut,
    Fut: Future<Output = Result<()>> + Send,
{
    TestRunner::new(config).run(name, driver, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_file_name_is_path_safe() {
        let artifact = Artifact {
            test_name: "leave::apply past/date".into(),
            kind: ArtifactKind::Screenshot,
            bytes: vec![],
            captured_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap(),
        };
        assert_eq!(
            artifact.file_name(),
            "leave__apply_past_date-20240301T123005.000.png"
        );
    }

    #[tokio::test]
    async fn test_file_sink_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("artifacts");
        let sink = FileArtifactSink::new(&target);
        let artifact = Artifact {
            test_name: "t".into(),
            kind: ArtifactKind::Screenshot,
            bytes: vec![1, 2, 3],
            captured_at: Utc::now(),
        };
        let name = artifact.file_name();
        sink.store(artifact).await.unwrap();
        assert_eq!(std::fs::read(target.join(name)).unwrap(), vec![1, 2, 3]);
    }
}
