// Config - Environment configuration for a test run
//
// Built once at process start (defaults, then an optional JSON file, then
// environment overrides) and shared by reference. Nothing in the crate reads
// the environment after `Config::load` returns.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Public OrangeHRM demo deployment
pub const DEFAULT_BASE_URL: &str = "https://opensource-demo.orangehrmlive.com/web/index.php";

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_FILE_ENV: &str = "HRM_CONFIG";

/// Test run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Application root; route paths are appended to it
    pub base_url: Url,

    /// Login credentials
    pub credentials: Credentials,

    /// Timeout budgets
    pub timeouts: Timeouts,

    /// Browser viewport
    pub viewport: Viewport,

    /// Run the browser without a window
    pub headless: bool,

    /// Where failure screenshots are written
    pub artifacts_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            credentials: Credentials::default(),
            timeouts: Timeouts::default(),
            viewport: Viewport::default(),
            headless: true,
            artifacts_dir: PathBuf::from("test-results/artifacts"),
        }
    }
}

/// Username/password pair
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("Admin", "admin123")
    }
}

// Keep passwords out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Timeout budgets, serialized as milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Timeouts {
    /// Single element action (click, fill)
    #[serde(with = "millis")]
    pub action: Duration,

    /// Page navigation and readiness
    #[serde(with = "millis")]
    pub navigation: Duration,

    /// Workflow poll loops waiting for a terminal signal
    #[serde(with = "millis")]
    pub expect: Duration,

    /// Whole test body
    #[serde(with = "millis")]
    pub test: Duration,

    /// Opportunistic probes of optional UI
    #[serde(with = "millis")]
    pub probe: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action: Duration::from_secs(10),
            navigation: Duration::from_secs(30),
            expect: Duration::from_secs(10),
            test: Duration::from_secs(60),
            probe: Duration::from_secs(3),
        }
    }
}

/// Browser viewport size in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

pub(crate) mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

impl Config {
    /// Loads defaults, then the file named by `HRM_CONFIG`, then `HRM_*` overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_FILE_ENV) {
            Some(path) => Self::from_json_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        tracing::debug!(
            base_url = %config.base_url,
            username = %config.credentials.username,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Reads a JSON configuration file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw).map_err(|e| e.context(path.display().to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Applies `HRM_*` overrides read through `lookup`.
    ///
    /// Taking the lookup as a function keeps this testable without touching
    /// the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HRM_BASE_URL") {
            self.base_url =
                Url::parse(&url).map_err(|e| Error::Config(format!("HRM_BASE_URL: {}", e)))?;
        }
        if let Some(username) = lookup("HRM_USERNAME") {
            self.credentials.username = username;
        }
        if let Some(password) = lookup("HRM_PASSWORD") {
            self.credentials.password = password;
        }
        let millis = |key: &str| -> Result<Option<Duration>> {
            lookup(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .map(Duration::from_millis)
                        .map_err(|_| Error::Config(format!("{} must be milliseconds, got '{}'", key, v)))
                })
                .transpose()
        };
        if let Some(d) = millis("HRM_ACTION_TIMEOUT_MS")? {
            self.timeouts.action = d;
        }
        if let Some(d) = millis("HRM_NAVIGATION_TIMEOUT_MS")? {
            self.timeouts.navigation = d;
        }
        if let Some(d) = millis("HRM_EXPECT_TIMEOUT_MS")? {
            self.timeouts.expect = d;
        }
        if let Some(d) = millis("HRM_TEST_TIMEOUT_MS")? {
            self.timeouts.test = d;
        }
        if let Some(headless) = lookup("HRM_HEADLESS") {
            self.headless = match headless.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(Error::Config(format!(
                        "HRM_HEADLESS must be a boolean, got '{}'",
                        other
                    )));
                }
            };
        }
        if let Some(dir) = lookup("HRM_ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Joins a route path onto the base URL.
    ///
    /// The base URL may carry a path prefix (`/web/index.php`); the route is
    /// appended to it rather than replacing it.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_point_at_demo() {
        let config = Config::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.credentials, Credentials::new("Admin", "admin123"));
        assert_eq!(config.timeouts.probe, Duration::from_secs(3));
        assert_eq!(config.timeouts.test, Duration::from_secs(60));
        assert_eq!(config.viewport, Viewport { width: 1280, height: 720 });
    }

    #[test]
    fn test_json_partial_keeps_defaults() {
        let config = Config::from_json(
            r#"{
                "baseUrl": "http://localhost:8080/web/index.php",
                "credentials": {"username": "qa", "password": "secret"},
                "timeouts": {"action": 2500}
            }"#,
        )
        .unwrap();
        assert_eq!(config.base_url.host_str(), Some("localhost"));
        assert_eq!(config.credentials.username, "qa");
        assert_eq!(config.timeouts.action, Duration::from_millis(2500));
        assert_eq!(config.timeouts.navigation, Duration::from_secs(30));
        assert!(config.headless);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HRM_BASE_URL", "http://hrm.local/web/index.php"),
            ("HRM_PASSWORD", "pw"),
            ("HRM_EXPECT_TIMEOUT_MS", "20000"),
            ("HRM_HEADLESS", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url.host_str(), Some("hrm.local"));
        assert_eq!(config.credentials.username, "Admin");
        assert_eq!(config.credentials.password, "pw");
        assert_eq!(config.timeouts.expect, Duration::from_secs(20));
        assert!(!config.headless);
    }

    #[test]
    fn test_malformed_override_is_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|k| (k == "HRM_ACTION_TIMEOUT_MS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("HRM_ACTION_TIMEOUT_MS"));
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let config = Config::default();
        let url = config.url_for("/pim/viewEmployeeList").unwrap();
        assert_eq!(
            url.as_str(),
            "https://opensource-demo.orangehrmlive.com/web/index.php/pim/viewEmployeeList"
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let shown = format!("{:?}", Credentials::default());
        assert!(shown.contains("Admin"));
        assert!(!shown.contains("admin123"));
    }
}
