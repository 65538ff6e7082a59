//! # Route Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: cada conexión lleva exactamente un request y
//! una respuesta, y después se cierra.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing del request (ventana acotada) y serialización de respuestas
//! - `router`: Tabla `(método, path)` → handler y despacho del request
//! - `fallback`: Archivos estáticos con allow-list sobre un directorio público
//! - `server`: Acceptor TCP, pool fijo de workers y manejo de cada conexión
//! - `config`: Configuración por CLI y variables de entorno
//! - `logging`: Inicialización de `tracing`
//! - `demo`: Handlers de la aplicación de ejemplo
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use route_server::config::Config;
//! use route_server::http::{Method, Response, StatusCode};
//! use route_server::server::Server;
//!
//! let mut server = Server::new(Config::default());
//! server.add_handler(Method::GET, "/hello", |_req, out| {
//!     Response::new(StatusCode::Ok).with_body("hola").write_to(out)
//! });
//! server.run().unwrap();
//! ```

pub mod config;
pub mod demo;
pub mod fallback;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
