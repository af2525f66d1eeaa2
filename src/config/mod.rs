mod settings;

pub use settings::{
    ApiConfig, AuditConfig, AuthConfig, LogConfig, MailConfig, SeedConfig, ServerConfig, Settings,
    SmtpConfig, StoreConfig,
};
