use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Куда `/qr/save` складывает файлы
    pub save_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Загружаем из переменных окружения или используем дефолты
        let config = Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
            },
            storage: StorageConfig {
                save_dir: env::var_os("QR_SAVE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_save_dir),
            },
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("PORT must be a non-zero port number");
        }

        if self.storage.save_dir.as_os_str().is_empty() {
            anyhow::bail!("QR_SAVE_DIR must not be empty");
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Подкаталог `qr` во временном каталоге системы
pub fn default_save_dir() -> PathBuf {
    env::temp_dir().join("qr")
}
