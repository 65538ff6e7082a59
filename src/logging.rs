//! # Logging
//! src/logging.rs
//!
//! Logging estructurado con `tracing`. El nivel por defecto viene de la
//! configuración y `RUST_LOG` lo reemplaza si está definida:
//!
//! ```bash
//! RUST_LOG=route_server=debug ./route_server
//! ```

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global
///
/// Retorna `false` si ya había uno instalado (por ejemplo, en tests).
pub fn init(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}
