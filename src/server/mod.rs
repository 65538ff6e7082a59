//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones y las entrega a un pool fijo de workers
//! 3. Lee y parsea un request por conexión
//! 4. Despacha a un handler o al fallback estático y cierra la conexión

pub mod connection;
pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Timeouts;
pub use pool::{PoolClosed, WorkerPool};
pub use tcp::Server;

use crate::config::ConfigError;
use crate::fallback::AllowListError;
use std::io;
use thiserror::Error;

/// Errores fatales del servidor
///
/// Las fallas de una conexión individual nunca llegan acá: se registran y
/// la conexión se aborta.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    AllowList(#[from] AllowListError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("listener error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    PoolClosed(#[from] PoolClosed),
}
