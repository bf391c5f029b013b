use std::sync::OnceLock;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub log_json: bool,
    #[serde(default = "default_session_days")]
    pub session_days: i64,

    #[serde(default = "default_news_count_on_home_page")]
    pub news_count_on_home_page: u32,
    /// Seed demo news into an empty database on startup.
    #[serde(default)]
    pub dev_fixtures: bool,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "news.db".into()
}

fn default_session_days() -> i64 {
    1
}

fn default_news_count_on_home_page() -> u32 {
    10
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Panics on a malformed environment, which can only happen at startup.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| Config::from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}")))
}
