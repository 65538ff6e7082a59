//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Tabla que mapea `(método, path)` a un handler registrado por la
//! aplicación.
//!
//! ```text
//! Request → Router ─┬─ match exacto → Handler → Response
//!                   └─ sin match    → Fallback estático → 200 / 404
//! ```
//!
//! La búsqueda es por igualdad exacta de strings: no hay prefijos,
//! comodines ni patrones. La tabla se arma antes de empezar a servir y
//! después solo se lee (ver [`crate::server::Server::run`]).

pub mod dispatch;

pub use dispatch::{Dispatched, Dispatcher};

use crate::http::{Method, Request};
use std::collections::HashMap;
use std::io::{self, Write};

/// Tipo de handler
///
/// Un handler recibe el Request y el socket de salida, y es dueño de toda
/// la respuesta: status line, headers (con `Content-Length` y
/// `Connection: close`), línea vacía y body, con flush antes de retornar.
pub type Handler = Box<dyn Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync>;

/// Router que mapea (método, path) a handlers
#[derive(Default)]
pub struct Router {
    /// método → path → handler
    routes: HashMap<Method, HashMap<String, Handler>>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una ruta con su handler
    ///
    /// Registrar de nuevo la misma clave reemplaza el handler anterior.
    ///
    /// # Ejemplo
    /// ```
    /// use route_server::http::{Method, Response, StatusCode};
    /// use route_server::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/hello", |_req, out| {
    ///     Response::new(StatusCode::Ok).with_body("hola").write_to(out)
    /// });
    /// assert!(router.lookup(Method::GET, "/hello").is_some());
    /// ```
    pub fn register<F>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
    {
        self.routes
            .entry(method)
            .or_default()
            .insert(path.to_string(), Box::new(handler));
    }

    /// Busca el handler para un método y path exactos
    pub fn lookup(&self, method: Method, path: &str) -> Option<&Handler> {
        self.routes.get(&method)?.get(path)
    }

    /// Número de rutas registradas
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Response, StatusCode};

    fn run(handler: &Handler, raw: &[u8]) -> Vec<u8> {
        let request = Request::parse(raw).unwrap();
        let mut out = Vec::new();
        handler(&request, &mut out).unwrap();
        out
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new();
        assert!(router.is_empty());
    }

    #[test]
    fn test_register_route() {
        let mut router = Router::new();
        router.register(Method::GET, "/test", |_req, out| out.write_all(b"test"));

        assert_eq!(router.len(), 1);
        assert!(router.lookup(Method::GET, "/test").is_some());
    }

    #[test]
    fn test_reregister_overwrites() {
        let mut router = Router::new();
        router.register(Method::GET, "/a", |_req, out| out.write_all(b"h1"));
        router.register(Method::GET, "/a", |_req, out| out.write_all(b"h2"));

        assert_eq!(router.len(), 1);
        let handler = router.lookup(Method::GET, "/a").unwrap();
        assert_eq!(run(handler, b"GET /a HTTP/1.1\r\n\r\n"), b"h2");
    }

    #[test]
    fn test_method_is_part_of_the_key() {
        let mut router = Router::new();
        router.register(Method::POST, "/form", |_req, out| out.write_all(b"post"));

        assert!(router.lookup(Method::GET, "/form").is_none());
        assert!(router.lookup(Method::POST, "/form").is_some());
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let mut router = Router::new();
        router.register(Method::GET, "/docs", |_req, out| out.write_all(b"docs"));

        assert!(router.lookup(Method::GET, "/docs/").is_none());
        assert!(router.lookup(Method::GET, "/docs?x=1").is_none());
        assert!(router.lookup(Method::GET, "/DOCS").is_none());
        assert!(router.lookup(Method::GET, "/doc").is_none());
    }

    #[test]
    fn test_handler_sees_request() {
        let mut router = Router::new();
        router.register(Method::GET, "/echo", |req, out| {
            let host = req.headers().find("Host").unwrap_or("none");
            Response::new(StatusCode::Ok).with_body(host).write_to(out)
        });

        let handler = router.lookup(Method::GET, "/echo").unwrap();
        let out = run(handler, b"GET /echo HTTP/1.1\r\nHost: example.org\r\n\r\n");
        assert!(out.ends_with(b"\r\n\r\nexample.org"));
    }
}
