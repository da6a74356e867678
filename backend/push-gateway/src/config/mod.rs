use serde::Deserialize;

/// Runtime configuration, read from the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the Firebase service account JSON key
    #[serde(default = "default_service_account_path")]
    pub service_account_path: String,
    /// Comma-separated origins, `*` allows any
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_service_account_path() -> String {
    "./serviceAccountKey.json".to_string()
}

fn default_cors_allowed_origins() -> String {
    "*".to_string()
}

impl Config {
    /// Load configuration from environment variables, after an optional `.env` file
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_origins(&self) -> Vec<&str> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}
