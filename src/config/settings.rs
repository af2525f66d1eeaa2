use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Shared key expected in `X-API-Key` for the admin API
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign action tokens
    pub secret: String,
    /// Lifetime of an action token in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Reject a token once it has been used for a dispatch
    #[serde(default)]
    pub single_use_tokens: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Transport backend: "log" (default) or "smtp"
    #[serde(default = "default_mail_backend")]
    pub backend: String,
    /// Upper bound on in-flight sends during one fan-out (1 = sequential)
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_smtp_from")]
    pub from: String,
    /// Use STARTTLS on the submission port instead of implicit TLS
    #[serde(default = "default_starttls")]
    pub starttls: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Configuration store backend: "memory" (default) or "file"
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// JSON document path for the file backend
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Keep only the newest N audit entries (unbounded when unset)
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// JSON file with the content items and users to serve
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// "pretty" (default) or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_token_ttl() -> u64 {
    86400 // 24 hours
}

fn default_mail_backend() -> String {
    "log".to_string()
}

fn default_max_concurrent_sends() -> usize {
    1
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_from() -> String {
    "notifications@localhost".to_string()
}

fn default_starttls() -> bool {
    true
}

fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_store_path() -> String {
    "data/options.json".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("auth.token_ttl_seconds", 86400)?
            .set_default("mail.backend", "log")?
            .set_default("store.backend", "memory")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // NOTIFIER__AUTH__SECRET, NOTIFIER__MAIL__SMTP__HOST, ...
            .add_source(
                Environment::with_prefix("NOTIFIER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            backend: default_mail_backend(),
            max_concurrent_sends: default_max_concurrent_sends(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            from: default_smtp_from(),
            starttls: default_starttls(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

impl AuthConfig {
    /// Config for tests and tooling that sign their own tokens
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl_seconds: default_token_ttl(),
            single_use_tokens: false,
        }
    }
}

impl Settings {
    /// Settings with every section at its default and the given signing secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            auth: AuthConfig::with_secret(secret),
            mail: MailConfig::default(),
            store: StoreConfig::default(),
            audit: AuditConfig::default(),
            seed: SeedConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8082);

        let mail = MailConfig::default();
        assert_eq!(mail.backend, "log");
        assert_eq!(mail.max_concurrent_sends, 1);
        assert_eq!(mail.smtp.port, 587);
        assert!(mail.smtp.starttls);
    }

    #[test]
    fn test_with_secret_defaults() {
        let settings = Settings::with_secret("s3cret");
        assert_eq!(settings.auth.secret, "s3cret");
        assert_eq!(settings.auth.token_ttl_seconds, 86400);
        assert!(!settings.auth.single_use_tokens);
        assert_eq!(settings.store.backend, "memory");
        assert!(settings.audit.max_entries.is_none());
        assert_eq!(settings.server_addr(), "0.0.0.0:8082");
    }
}
