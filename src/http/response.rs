//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP/1.1 y escribirlas en el socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! Connection: close\r\n
//! \r\n
//! <h1>Hola</h1>
//! ```
//!
//! El servidor cierra siempre la conexión después de responder, así que
//! `Connection: close` se agrega al final de los headers en toda respuesta.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use route_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hola");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"Connection: close\r\n\r\nHola"));
//! ```

use super::StatusCode;
use std::io::{self, Write};

/// Versión que se escribe en la status line
const HTTP_VERSION: &str = "HTTP/1.1";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404)
    status: StatusCode,

    /// Headers en el orden en que se escriben
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío, o enviarse aparte por streaming)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// La respuesta 404 del servidor: sin body y sin Content-Type
    ///
    /// ```
    /// use route_server::http::Response;
    ///
    /// let bytes = Response::not_found().to_bytes();
    /// assert_eq!(
    ///     bytes,
    ///     b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    /// );
    /// ```
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound).with_content_length(0)
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe (sin distinguir mayúsculas), se sobrescribe
    /// conservando su posición.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing_value)) => *existing_value = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Declara el largo del body sin guardarlo en la respuesta
    ///
    /// Útil cuando el body se envía por streaming después de
    /// [`Response::write_head`].
    pub fn with_content_length(self, length: u64) -> Self {
        self.with_header("Content-Length", &length.to_string())
    }

    /// Establece el cuerpo desde un string y calcula `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes y calcula `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        let length = body.len() as u64;
        self.body = body;
        self.with_content_length(length)
    }

    /// Escribe la status line, los headers y la línea vacía
    ///
    /// No escribe el body ni hace flush: el llamador envía el contenido a
    /// continuación.
    pub fn write_head<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.head_bytes())
    }

    /// Escribe la respuesta completa y hace flush
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.head_bytes())?;
        out.write_all(&self.body)?;
        out.flush()
    }

    /// Convierte la respuesta completa a bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.head_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {}\r\n", HTTP_VERSION, self.status);

        for (name, value) in &self.headers {
            // Connection lo controla el servidor
            if name.eq_ignore_ascii_case("Connection") {
                continue;
            }
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("Connection: close\r\n\r\n");

        head.into_bytes()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene los headers en orden de escritura
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene el valor de un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
