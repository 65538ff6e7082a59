//! # Handlers de la aplicación de ejemplo
//! src/demo.rs
//!
//! `GET /classic.html` sirve la plantilla `classic.html` del directorio
//! público reemplazando `{time}` por la hora local actual. El resto del
//! sitio lo sirve el fallback estático.

use crate::fallback::public_dir::content_type;
use crate::fallback::PublicDir;
use crate::http::{Method, Request, Response, StatusCode};
use crate::server::Server;
use std::fs;
use std::io::{self, Write};

/// Marcador que se reemplaza en la plantilla
pub const TIME_PLACEHOLDER: &str = "{time}";

/// Registra los handlers de ejemplo en el servidor
pub fn register(server: &mut Server) {
    let public_dir = PublicDir::new(&server.config().public_dir);

    server.add_handler(Method::GET, "/classic.html", move |request, out| {
        classic_handler(&public_dir, request, out)
    });
}

/// Handler para /classic.html
///
/// Si la plantilla no se puede leer la conexión se aborta sin respuesta.
pub fn classic_handler(
    public_dir: &PublicDir,
    request: &Request,
    out: &mut dyn Write,
) -> io::Result<()> {
    let local = public_dir.resolve(request.path());
    let template = fs::read_to_string(&local)?;

    let now = chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string();
    let content = template.replace(TIME_PLACEHOLDER, &now);

    Response::new(StatusCode::Ok)
        .with_header("Content-Type", &content_type(&local))
        .with_body(&content)
        .write_to(out)
}
