//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Parser de un único request sobre una ventana acotada de bytes.
//!
//! ## Formato aceptado
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! Host: localhost:9999\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! ```
//!
//! ## Reglas
//!
//! 1. Se leen como máximo [`LIMIT`] bytes del socket, una sola ventana.
//! 2. La request line termina en el primer `\r\n` de la ventana; si no
//!    aparece, el request está truncado.
//! 3. La request line se separa por espacios simples y debe tener
//!    exactamente 3 tokens. La versión se ignora.
//! 4. Solo se aceptan los métodos de [`Method`].
//! 5. El path se guarda tal cual: sin decodificar y sin separar la query.
//! 6. Los headers son las líneas entre la request line y el primer
//!    `\r\n\r\n`. Si el terminador no está dentro de la ventana los headers
//!    quedan como [`Headers::Absent`], que no es lo mismo que una lista vacía.
//!
//! No se lee body para ningún método.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, ErrorKind, Read};
use std::str::FromStr;

use thiserror::Error;

/// Tamaño máximo de la ventana de lookahead en bytes
pub const LIMIT: usize = 4096;

const REQUEST_LINE_DELIMITER: &[u8] = b"\r\n";
const HEADERS_DELIMITER: &[u8] = b"\r\n\r\n";

/// Métodos HTTP aceptados por el parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso (el body no se lee)
    POST,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    /// La comparación distingue mayúsculas: `get` no es un método válido
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headers de un request, como líneas crudas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Headers {
    /// El terminador `\r\n\r\n` apareció dentro de la ventana.
    /// Puede ser una lista vacía si el cliente no mandó headers.
    Present(Vec<String>),

    /// El terminador no apareció dentro de la ventana
    Absent,
}

impl Headers {
    /// Las líneas crudas, o `None` si los headers quedaron fuera de la ventana
    pub fn lines(&self) -> Option<&[String]> {
        match self {
            Headers::Present(lines) => Some(lines),
            Headers::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Headers::Absent)
    }

    /// Busca el valor del primer header con ese nombre (sin distinguir
    /// mayúsculas). Las líneas sin `:` se ignoran.
    pub fn find(&self, name: &str) -> Option<&str> {
        self.lines()?.iter().find_map(|line| {
            let (line_name, value) = line.split_once(':')?;
            line_name
                .trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}

/// Errores que pueden ocurrir durante el parsing
///
/// En el cable todos terminan en la misma respuesta 404.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No hay `\r\n` de fin de request line dentro de la ventana
    #[error("request line not terminated within {} bytes", LIMIT)]
    Truncated,

    /// La request line no tiene exactamente 3 tokens
    #[error("malformed request line: expected 3 tokens, got {0}")]
    Malformed(usize),

    /// Método fuera del conjunto permitido
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

/// Un request HTTP ya parseado
///
/// Solo se construye a través de [`Request::parse`] o [`Request::read_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    headers: Headers,
}

impl Request {
    /// Lee la ventana de bytes desde el socket y la parsea
    ///
    /// El `Result` externo es de transporte (falla de I/O, la conexión se
    /// aborta); el interno es de protocolo (el request no es aceptable).
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> io::Result<Result<Self, ParseError>> {
        let window = read_window(reader)?;
        Ok(Self::parse(&window))
    }

    /// Parsea un request desde la ventana ya leída
    ///
    /// Solo se consideran los primeros [`LIMIT`] bytes de `window`.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use route_server::http::{Method, Request};
    ///
    /// let request = Request::parse(b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
    ///
    /// assert_eq!(request.method(), Method::GET);
    /// assert_eq!(request.path(), "/index.html");
    /// assert_eq!(request.headers().lines(), Some(&["Host: x".to_string()][..]));
    /// ```
    pub fn parse(window: &[u8]) -> Result<Self, ParseError> {
        let window = &window[..window.len().min(LIMIT)];

        let request_line_end =
            find(window, REQUEST_LINE_DELIMITER, 0).ok_or(ParseError::Truncated)?;

        let request_line = String::from_utf8_lossy(&window[..request_line_end]);
        let parts: Vec<&str> = request_line.split(' ').collect();
        if parts.len() != 3 {
            return Err(ParseError::Malformed(parts.len()));
        }

        let method: Method = parts[0].parse()?;
        let path = parts[1].to_string();
        let headers = Self::parse_headers(window, request_line_end);

        Ok(Request {
            method,
            path,
            headers,
        })
    }

    /// Extrae las líneas de headers entre la request line y `\r\n\r\n`
    ///
    /// La búsqueda del terminador empieza en el `\r\n` de la propia request
    /// line, así un request sin headers da una lista vacía.
    fn parse_headers(window: &[u8], request_line_end: usize) -> Headers {
        let headers_start = request_line_end + REQUEST_LINE_DELIMITER.len();

        match find(window, HEADERS_DELIMITER, request_line_end) {
            None => Headers::Absent,
            Some(headers_end) if headers_end < headers_start => Headers::Present(Vec::new()),
            Some(headers_end) => {
                let raw = String::from_utf8_lossy(&window[headers_start..headers_end]);
                Headers::Present(split_lines(raw))
            }
        }
    }

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path tal como vino en la request line
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene los headers crudos
    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

fn split_lines(raw: Cow<'_, str>) -> Vec<String> {
    raw.split("\r\n").map(str::to_string).collect()
}

/// Llena la ventana de lookahead
///
/// Sigue leyendo hasta que aparezca `\r\n\r\n`, la ventana se llene o el
/// cliente cierre su lado. Si vence el timeout de lectura con bytes ya
/// recibidos se parsea lo que haya; sin bytes es una falla de I/O.
fn read_window<R: Read + ?Sized>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut window = vec![0u8; LIMIT];
    let mut filled = 0;

    while filled < LIMIT {
        match reader.read(&mut window[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                // El terminador puede haber quedado partido entre dos lecturas
                let scan_from = filled.saturating_sub(HEADERS_DELIMITER.len() - 1);
                filled += n;
                if find(&window[..filled], HEADERS_DELIMITER, scan_from).is_some() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e)
                if filled > 0
                    && matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                break
            }
            Err(e) => return Err(e),
        }
    }

    window.truncate(filled);
    Ok(window)
}

/// Posición de la primera aparición de `needle` en `haystack[start..]`
fn find(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    haystack
        .get(start..)?
        .windows(needle.len())
        .position(|candidate| candidate == needle)
        .map(|pos| pos + start)
}
