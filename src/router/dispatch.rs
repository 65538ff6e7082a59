//! # Dispatch
//! src/router/dispatch.rs
//!
//! Decide quién escribe la respuesta de un request (o de un parse fallido).
//! La prioridad es fija:
//!
//! 1. Parse fallido → 404
//! 2. Handler registrado para `(método, path)` → el handler responde
//! 3. Fallback estático → 200 con el archivo, o 404

use super::Router;
use crate::fallback::{StaticFallback, StaticOutcome};
use crate::http::{ParseError, Request, Response, StatusCode};
use std::fmt;
use std::io::{self, Write};

/// Qué pasó con un request despachado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// El request no se pudo parsear; se respondió 404
    Rejected(ParseError),

    /// Respondió un handler registrado
    Handler,

    /// Respondió el fallback estático
    Static(StaticOutcome),
}

impl Dispatched {
    /// Status enviado, si lo decidió el servidor (los handlers escriben el suyo)
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Dispatched::Rejected(_) => Some(StatusCode::NotFound),
            Dispatched::Handler => None,
            Dispatched::Static(outcome) => Some(outcome.status()),
        }
    }
}

impl fmt::Display for Dispatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatched::Rejected(e) => write!(f, "rejected ({})", e),
            Dispatched::Handler => f.write_str("handler"),
            Dispatched::Static(StaticOutcome::Served { bytes }) => {
                write!(f, "static file ({} bytes)", bytes)
            }
            Dispatched::Static(StaticOutcome::NotAllowed) => f.write_str("not found (not allowed)"),
            Dispatched::Static(StaticOutcome::MissingFile) => f.write_str("not found (missing file)"),
        }
    }
}

/// Router más fallback, compartido de solo lectura entre los workers
pub struct Dispatcher {
    router: Router,
    fallback: StaticFallback,
}

impl Dispatcher {
    pub fn new(router: Router, fallback: StaticFallback) -> Self {
        Self { router, fallback }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn fallback(&self) -> &StaticFallback {
        &self.fallback
    }

    /// Escribe la respuesta para el resultado del parser
    pub fn dispatch(
        &self,
        parsed: Result<Request, ParseError>,
        out: &mut dyn Write,
    ) -> io::Result<Dispatched> {
        let request = match parsed {
            Ok(request) => request,
            Err(e) => {
                Response::not_found().write_to(out)?;
                return Ok(Dispatched::Rejected(e));
            }
        };

        if let Some(handler) = self.router.lookup(request.method(), request.path()) {
            handler(&request, out)?;
            return Ok(Dispatched::Handler);
        }

        let outcome = self.fallback.serve(request.path(), out)?;
        Ok(Dispatched::Static(outcome))
    }
}
