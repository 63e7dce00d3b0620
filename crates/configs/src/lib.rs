use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which persistence backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[serde(alias = "mongo")]
    Mongodb,
    #[serde(alias = "postgresql")]
    Postgres,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Mongodb => "mongodb",
            BackendKind::Postgres => "postgres",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "mongodb" | "mongo" => Ok(BackendKind::Mongodb),
            "postgres" | "postgresql" => Ok(BackendKind::Postgres),
            other => Err(anyhow!("unknown storage backend `{other}` (expected memory, mongodb or postgres)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Unset means: `mongodb` when a MongoDB URI is available, otherwise `memory`.
    #[serde(default)]
    pub backend: Option<BackendKind>,
    #[serde(default)]
    pub mongodb_uri: Option<String>,
    #[serde(default)]
    pub mongodb_database: Option<String>,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 10 }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: None,
            mongodb_uri: None,
            mongodb_database: None,
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

pub const DEFAULT_MONGODB_DATABASE: &str = "waste_pickup";

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
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is missing, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.storage.normalize_from_env()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Some(host) = env_non_empty("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = env_non_empty("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = env_non_empty("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Fill unset values from `STORAGE_BACKEND`, `MONGODB_URI`, `MONGODB_DATABASE`
    /// and `DATABASE_URL`. Values present in the file win.
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if self.mongodb_uri.as_deref().map_or(true, |u| u.trim().is_empty()) {
            self.mongodb_uri = env_non_empty("MONGODB_URI");
        }
        if self.mongodb_database.as_deref().map_or(true, |d| d.trim().is_empty()) {
            self.mongodb_database = env_non_empty("MONGODB_DATABASE");
        }
        if self.database_url.as_deref().map_or(true, |u| u.trim().is_empty()) {
            self.database_url = env_non_empty("DATABASE_URL");
        }
        if self.backend.is_none() {
            self.backend = match env_non_empty("STORAGE_BACKEND") {
                Some(b) => Some(BackendKind::parse(&b)?),
                None if self.mongodb_uri.is_some() => Some(BackendKind::Mongodb),
                None => Some(BackendKind::Memory),
            };
        }
        Ok(())
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.unwrap_or(BackendKind::Memory)
    }

    /// A durable backend without its connection string must not serve traffic.
    pub fn validate(&self) -> Result<()> {
        match self.backend_kind() {
            BackendKind::Memory => {}
            BackendKind::Mongodb => {
                let uri = self
                    .mongodb_uri
                    .as_deref()
                    .ok_or_else(|| anyhow!("MONGODB_URI environment variable is not set"))?;
                let lower = uri.to_lowercase();
                if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
                    return Err(anyhow!("MONGODB_URI must start with mongodb:// or mongodb+srv://"));
                }
            }
            BackendKind::Postgres => {
                let url = self
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("DATABASE_URL environment variable is not set"))?;
                let lower = url.to_lowercase();
                if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
                    return Err(anyhow!("DATABASE_URL must start with postgresql:// or postgres://"));
                }
                if self.max_connections == 0 {
                    return Err(anyhow!("storage.max_connections must be >= 1"));
                }
            }
        }
        Ok(())
    }

    /// Database name for the document store: explicit setting, then the path
    /// segment of the URI, then [`DEFAULT_MONGODB_DATABASE`].
    pub fn mongodb_database_name(&self) -> String {
        if let Some(db) = self.mongodb_database.as_deref().filter(|d| !d.trim().is_empty()) {
            return db.to_string();
        }
        self.mongodb_uri
            .as_deref()
            .and_then(database_from_uri)
            .unwrap_or_else(|| DEFAULT_MONGODB_DATABASE.to_string())
    }
}

fn database_from_uri(uri: &str) -> Option<String> {
    let rest = uri.split_once("://")?.1;
    let path = rest.split_once('/')?.1;
    let name = path.split(['?', '/']).next()?;
    if name.is_empty() { None } else { Some(name.to_string()) }
}
