use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    /// Base used when rendering short links. Falls back to the request's
    /// Host header when unset.
    pub public_base_url: Option<String>,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Path to a directory of dashboard pages served under /dashboard.
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "sqlite" => StorageBackend::Sqlite,
            "memory" | "mem" => StorageBackend::Memory,
            other => {
                tracing::warn!(
                    "Unknown STORAGE_BACKEND '{other}', falling back to 'memory'. Supported values: memory, sqlite"
                );
                StorageBackend::Memory
            }
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://linkbox.db?mode=rwc".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "36".to_string())
            .parse::<u16>()?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL").ok();
        let static_dir = std::env::var("STATIC_DIR").ok();

        Ok(Config {
            storage: StorageConfig {
                backend,
                url: database_url,
                max_connections,
            },
            server: ServerConfig { host, port },
            public_base_url,
            frontend: FrontendConfig { static_dir },
        })
    }
}
