//! Configuration loading from disk and the environment.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_LISTEN_ADDR: &str = "GATEWAY_LISTEN_ADDR";
pub const ENV_LOG_LEVEL: &str = "GATEWAY_LOG_LEVEL";
pub const ENV_CONNECT_TIMEOUT: &str = "GATEWAY_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "GATEWAY_REQUEST_TIMEOUT_SECS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: '{value}'")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where loaded settings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file was absent; built-in defaults were used.
    Defaults,
}

/// Validated settings together with their origin.
#[derive(Debug)]
pub struct LoadedConfig {
    pub settings: Settings,
    pub source: ConfigSource,
    pub path: PathBuf,
}

impl LoadedConfig {
    /// Log where the settings came from.
    ///
    /// Loading runs before the subscriber exists, so this is reported
    /// separately once logging is up.
    pub fn log_source(&self) {
        let path = self.path.display();
        match self.source {
            ConfigSource::File => tracing::info!(
                path = %path,
                listen_addr = %self.settings.gateway.listen_addr,
                routes = self.settings.gateway.routes.len(),
                "Configuration loaded"
            ),
            ConfigSource::Defaults => tracing::warn!(
                path = %path,
                listen_addr = %self.settings.gateway.listen_addr,
                "Could not load configuration, using defaults"
            ),
        }
    }
}

/// Load, overlay and validate configuration.
///
/// A missing file is not an error: defaults are used and the environment
/// overlay still applies.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let (mut settings, source) = match fs::read_to_string(path) {
        Ok(content) => (parse_config(&content)?, ConfigSource::File),
        Err(e) if e.kind() == ErrorKind::NotFound => (Settings::default(), ConfigSource::Defaults),
        Err(e) => return Err(ConfigError::Io(e)),
    };

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
    validate_config(&settings).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig {
        settings,
        source,
        path: path.to_path_buf(),
    })
}

/// Parse a TOML document into settings without validating it.
pub fn parse_config(content: &str) -> Result<Settings, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlay environment variables on top of file settings.
///
/// `lookup` abstracts the environment so callers can test without touching
/// process state.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
        settings.gateway.listen_addr = addr;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        settings.observability.log_level = level;
    }
    if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT) {
        settings.timeouts.connect_secs = Some(parse_secs(ENV_CONNECT_TIMEOUT, secs)?);
    }
    if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT) {
        settings.timeouts.request_secs = Some(parse_secs(ENV_REQUEST_TIMEOUT, secs)?);
    }
    Ok(())
}

fn parse_secs(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use std::collections::HashMap;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    const SAMPLE: &str = r#"
[gateway]
listenAddr = ":8080"

[[gateway.routes]]
name = "orders"
context = "/api/orders"
target = "http://localhost:9001"

[[gateway.routes]]
name = "users"
context = "/api/users"
target = "http://localhost:9002/v1"

[timeouts]
request_secs = 15
"#;

    #[test]
    fn parses_routes_in_order() {
        let settings = parse_config(SAMPLE).unwrap();
        assert_eq!(settings.gateway.listen_addr, ":8080");
        assert_eq!(
            settings.gateway.routes,
            vec![
                RouteConfig::new("orders", "/api/orders", "http://localhost:9001"),
                RouteConfig::new("users", "/api/users", "http://localhost:9002/v1"),
            ]
        );
        assert_eq!(settings.timeouts.request_secs, Some(15));
        assert_eq!(settings.timeouts.connect_secs, None);
    }

    #[test]
    fn snake_case_listen_addr_is_accepted() {
        let settings = parse_config("[gateway]\nlisten_addr = \"127.0.0.1:1\"\n").unwrap();
        assert_eq!(settings.gateway.listen_addr, "127.0.0.1:1");
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_config("[gateway\nlisten_addr = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_LISTEN_ADDR, "127.0.0.1:7000"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_CONNECT_TIMEOUT, "3"),
        ]);
        let mut settings = parse_config(SAMPLE).unwrap();

        apply_env_overrides(&mut settings, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.gateway.listen_addr, "127.0.0.1:7000");
        assert_eq!(settings.observability.log_level, "debug");
        assert_eq!(settings.timeouts.connect_secs, Some(3));
        assert_eq!(settings.timeouts.request_secs, Some(15));
        assert_eq!(settings.gateway.routes.len(), 2);
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let mut settings = Settings::default();
        let err = apply_env_overrides(&mut settings, |k| {
            (k == ENV_REQUEST_TIMEOUT).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: ENV_REQUEST_TIMEOUT, .. }));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_source(loaded: &LoadedConfig) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || loaded.log_source());

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.source, ConfigSource::Defaults);
        assert!(loaded.settings.gateway.routes.is_empty());

        let output = logged_source(&loaded);
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("Could not load configuration, using defaults"), "{output}");
        assert!(output.contains("absent.toml"), "{output}");
    }

    #[test]
    fn existing_file_is_reported_as_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded.source, ConfigSource::File);
        assert_eq!(loaded.settings.gateway.routes.len(), 2);

        let output = logged_source(&loaded);
        assert!(output.contains("Configuration loaded"), "{output}");
        assert!(!output.contains("WARN"), "{output}");
    }

    #[test]
    fn load_reports_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[gateway.routes]]\nname = \"x\"\ncontext = \"nope\"\ntarget = \"http://a\""
        )
        .unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
    }
}
