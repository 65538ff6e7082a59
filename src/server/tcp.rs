//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Un acceptor bloqueante que entrega cada conexión a un pool fijo de
//! workers. Cada worker atiende su conexión de principio a fin.
//!
//! La tabla de handlers se arma con `&mut Server` antes de arrancar;
//! [`Server::run`] y [`Server::serve`] consumen el servidor y la comparten
//! entre los workers detrás de un `Arc`, así que ya no se puede modificar.

use super::connection::{self, Timeouts};
use super::pool::WorkerPool;
use super::ServerError;
use crate::config::Config;
use crate::fallback::{AllowList, PublicDir, StaticFallback};
use crate::http::{Method, Request};
use crate::router::{Dispatcher, Router};
use std::io::{self, Write};
use std::net::TcpListener;
use std::sync::Arc;

/// Servidor HTTP: un request por conexión
pub struct Server {
    config: Config,
    router: Router,
    allow_list: AllowList,
}

impl Server {
    /// Servidor sin handlers y con la allow-list por defecto
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Router::new(),
            allow_list: AllowList::default(),
        }
    }

    /// Reemplaza la allow-list del fallback estático
    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Registra un handler; la misma clave reemplaza al anterior
    pub fn add_handler<F>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
    {
        tracing::debug!(method = %method, path, "handler registered");
        self.router.register(method, path, handler);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tabla de handlers registrada hasta ahora
    pub fn routes(&self) -> &Router {
        &self.router
    }

    /// Hace bind en la dirección configurada y sirve para siempre
    pub fn run(self) -> Result<(), ServerError> {
        self.config.validate()?;

        let address = self.config.address();
        let listener = TcpListener::bind(&address)
            .map_err(|source| ServerError::Bind { address, source })?;

        self.serve(listener)
    }

    /// Sirve conexiones desde un listener ya creado
    ///
    /// Solo retorna si el listener deja de entregar conexiones o el pool se
    /// cierra.
    pub fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        self.config.validate()?;

        let local_addr = listener.local_addr()?;
        let timeouts = Timeouts {
            read: self.config.read_timeout(),
            write: self.config.write_timeout(),
        };
        let pool = WorkerPool::new(self.config.workers)?;

        let fallback = StaticFallback::new(self.allow_list, PublicDir::new(&self.config.public_dir));
        let dispatcher = Arc::new(Dispatcher::new(self.router, fallback));

        tracing::info!(
            address = %local_addr,
            workers = pool.size(),
            handlers = dispatcher.router().len(),
            static_paths = dispatcher.fallback().allow_list().len(),
            "server listening"
        );

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            };

            let peer = stream
                .peer_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            tracing::debug!(peer = %peer, "connection accepted");

            let dispatcher = Arc::clone(&dispatcher);
            let span = tracing::info_span!("connection", peer = %peer);

            pool.execute(move || {
                let _entered = span.enter();
                if let Err(e) = connection::handle_connection(stream, &dispatcher, timeouts) {
                    tracing::warn!(error = %e, "connection aborted");
                }
            })?;
        }

        Ok(())
    }
}
