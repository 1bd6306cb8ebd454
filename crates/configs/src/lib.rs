use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    /// Problems found while loading that fell back to defaults. Logged by the
    /// binary once tracing is up.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
    pub shutdown_timeout_secs: u64,
    /// Upper bound on handling one request; slower requests get 408.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), shutdown_timeout_secs: 5, request_timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Explicit format; when absent it follows the environment.
    pub format: Option<LogFormat>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into(), format: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file (if present) + process environment, normalized.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment variables using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some((key, raw)) = first_of(&lookup, &["SERVER_PORT", "PORT"]) {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => self.warn(format!("invalid {key} value '{raw}', keeping {}", self.server.port)),
            }
        }
        if let Some(raw) = lookup("TOKIO_WORKER_THREADS") {
            match raw.trim().parse::<usize>() {
                Ok(threads) => self.server.worker_threads = Some(threads),
                Err(_) => self.warn(format!("invalid TOKIO_WORKER_THREADS value '{raw}', ignoring")),
            }
        }
        if let Some(raw) = lookup("SHUTDOWN_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.server.shutdown_timeout_secs = secs,
                Err(_) => self.warn(format!("invalid SHUTDOWN_TIMEOUT_SECS value '{raw}', ignoring")),
            }
        }
        if let Some(raw) = lookup("REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.server.request_timeout_secs = secs,
                Err(_) => self.warn(format!("invalid REQUEST_TIMEOUT_SECS value '{raw}', ignoring")),
            }
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.trim().to_ascii_lowercase();
        }
        if let Some(raw) = lookup("LOG_FORMAT") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "json" => self.logging.format = Some(LogFormat::Json),
                "compact" | "text" => self.logging.format = Some(LogFormat::Compact),
                _ => self.warn(format!("invalid LOG_FORMAT '{raw}', ignoring")),
            }
        }
        if let Some((key, raw)) = first_of(&lookup, &["APP_ENV", "ENV"]) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "production" => self.environment = Environment::Production,
                "development" => self.environment = Environment::Development,
                _ => {
                    self.warn(format!("invalid {key} '{raw}', defaulting to 'development'"));
                    self.environment = Environment::Development;
                }
            }
        }
        if let Some(raw) = lookup("SEED_DATA") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed.enabled = true,
                "0" | "false" | "no" => self.seed.enabled = false,
                _ => self.warn(format!("invalid SEED_DATA '{raw}', keeping {}", self.seed.enabled)),
            }
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            let bad = std::mem::replace(&mut self.logging.level, "info".into());
            self.warn(format!("invalid log level '{bad}', defaulting to 'info'"));
        }
        Ok(())
    }

    /// Effective log output format.
    pub fn log_format(&self) -> LogFormat {
        self.logging.format.unwrap_or(match self.environment {
            Environment::Production => LogFormat::Json,
            Environment::Development => LogFormat::Compact,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn warn(&mut self, msg: String) {
        self.warnings.push(msg);
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        if self.shutdown_timeout_secs == 0 {
            return Err(anyhow!("server.shutdown_timeout_secs must be a positive number of seconds"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("server.request_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

fn first_of<'a, F>(lookup: &F, keys: &[&'a str]) -> Option<(&'a str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().find_map(|&k| lookup(k).map(|v| (k, v)))
}
