//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./route_server --port 9999 \
//!   --public-dir ./public \
//!   --workers 64 \
//!   --read-timeout-ms 30000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 PUBLIC_DIR=/srv/www ./route_server
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("workers must be >= 1")]
    NoWorkers,

    #[error("host must not be empty")]
    EmptyHost,
}

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "route_server")]
#[command(about = "Servidor HTTP/1.1 mínimo con tabla de handlers y fallback estático")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "9999", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz de los archivos estáticos
    #[arg(long = "public-dir", default_value = "./public", env = "PUBLIC_DIR")]
    pub public_dir: PathBuf,

    /// Número de workers (conexiones atendidas a la vez)
    #[arg(short, long, default_value = "64", env = "WORKERS")]
    pub workers: usize,

    // === Timeouts ===

    /// Timeout de lectura del socket en milisegundos (0 = sin límite)
    #[arg(long = "read-timeout-ms", default_value = "30000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Timeout de escritura del socket en milisegundos (0 = sin límite)
    #[arg(long = "write-timeout-ms", default_value = "30000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    /// Archivo JSON con la allow-list (`{"paths": [...]}`); sin él se usa la lista por defecto
    #[arg(long = "allow-list", env = "ALLOW_LIST")]
    pub allow_list: Option<PathBuf>,

    /// Nivel de log por defecto (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use route_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:9999");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            public_dir = %self.public_dir.display(),
            workers = self.workers,
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            allow_list = %self
                .allow_list
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "default".to_string()),
            "configuration"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 9999,
            host: "0.0.0.0".to_string(),
            public_dir: PathBuf::from("./public"),
            workers: 64,
            read_timeout_ms: 30_000,
            write_timeout_ms: 30_000,
            allow_list: None,
            log_level: "info".to_string(),
        }
    }
}

fn millis(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_millis(value))
}
