use clap::Parser;
use once_cell::sync::{Lazy, OnceCell};

pub const JWT_EXPRIED_TIME: i64 = 86400i64;
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

static CONFIG_CELL: OnceCell<Config> = OnceCell::new();

/// Process-wide configuration. Parsed from CLI/env on first access unless
/// [`init_config`] seeded it earlier.
pub static APP_CONFIG: Lazy<&'static Config> =
    Lazy::new(|| CONFIG_CELL.get_or_init(Config::parse));

/// Installs `config` as the process configuration. Returns `false` when a
/// configuration was already in place.
pub fn init_config(config: Config) -> bool {
    CONFIG_CELL.set(config).is_ok()
}

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env)]
    pub jwt_secret: String,

    /// Root directory for uploaded material files
    #[clap(long, env, default_value = "./uploads")]
    pub upload_dir: String,

    #[clap(long, env, default_value_t = 50)]
    pub max_upload_size_mb: usize,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,

    #[clap(long, env)]
    pub admin_username: Option<String>,

    #[clap(long, env)]
    pub admin_email: Option<String>,

    #[clap(long, env)]
    pub admin_password: Option<String>,
}

impl Config {
    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }
}
