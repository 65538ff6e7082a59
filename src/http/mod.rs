//! # Módulo HTTP
//!
//! Implementa la parte del protocolo HTTP/1.1 que usa el servidor, sin
//! librerías de alto nivel:
//!
//! - Parsing de un request sobre una ventana acotada de bytes
//! - Construcción de responses
//! - Status codes
//!
//! ### Formato de Request
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
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
//! No hay keep-alive, chunked encoding ni lectura de body: un request por
//! conexión y la conexión se cierra al responder.

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Headers, Method, ParseError, Request, LIMIT};
pub use response::Response;
pub use status::StatusCode;
