//! # Route Server - Entry Point
//! src/main.rs
//!
//! Lee la configuración, instala el logging, registra los handlers de
//! ejemplo y sirve hasta que el proceso termine.

use route_server::config::Config;
use route_server::fallback::AllowList;
use route_server::server::{Server, ServerError};
use route_server::{demo, logging};

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = start(config) {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn start(config: Config) -> Result<(), ServerError> {
    config.validate()?;
    config.log_summary();

    let allow_list = match &config.allow_list {
        Some(path) => AllowList::load(path)?,
        None => AllowList::default(),
    };

    let mut server = Server::new(config).with_allow_list(allow_list);
    demo::register(&mut server);

    // Bloquea el thread principal
    server.run()
}
