//! # Manejo de una conexión
//! src/server/connection.rs
//!
//! Ciclo de vida de cada conexión aceptada:
//!
//! ```text
//! ACCEPTED → PARSING → {PARSE_FAILED | PARSED} → DISPATCHED → RESPONSE_SENT
//!                                                            ↘ ABORTED (I/O)
//! ```
//!
//! Un request, una respuesta, y el socket se cierra en todo camino de
//! salida, incluido el de error.

use crate::http::Request;
use crate::router::{Dispatched, Dispatcher};
use std::io::{self, BufWriter, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// Timeouts de lectura y escritura del socket (`None` = sin límite)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub read: Option<Duration>,
    pub write: Option<Duration>,
}

/// Atiende una conexión completa y la cierra
///
/// Un `Err` significa que la conexión se abortó por I/O y la respuesta pudo
/// no haberse enviado entera.
pub fn handle_connection(
    stream: TcpStream,
    dispatcher: &Dispatcher,
    timeouts: Timeouts,
) -> io::Result<Dispatched> {
    let result = configure(&stream, timeouts).and_then(|()| serve_one(&stream, dispatcher));
    close(&stream);
    result
}

fn configure(stream: &TcpStream, timeouts: Timeouts) -> io::Result<()> {
    stream.set_read_timeout(timeouts.read)?;
    stream.set_write_timeout(timeouts.write)
}

fn serve_one(stream: &TcpStream, dispatcher: &Dispatcher) -> io::Result<Dispatched> {
    let mut reader = stream;
    let parsed = Request::read_from(&mut reader)?;

    let summary = match &parsed {
        Ok(request) => format!("{} {}", request.method(), request.path()),
        Err(e) => {
            tracing::debug!(error = %e, "request rejected");
            String::from("-")
        }
    };

    let mut out = BufWriter::new(stream);
    let dispatched = dispatcher.dispatch(parsed, &mut out)?;
    out.flush()?;

    tracing::info!(request = %summary, outcome = %dispatched, "response sent");
    Ok(dispatched)
}

/// Cierra el lado de escritura; el socket se libera al soltar el `TcpStream`
fn close(stream: &TcpStream) {
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        // El cliente pudo haber cerrado primero
        tracing::trace!(error = %e, "shutdown failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{AllowList, PublicDir, StaticFallback, StaticOutcome};
    use crate::http::{Method, ParseError, Response, StatusCode};
    use crate::router::Router;
    use std::fs;
    use std::io::Read;
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    fn test_dispatcher() -> (TempDir, Arc<Dispatcher>) {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("index.html"), "<p>hola</p>").unwrap();

        let mut router = Router::new();
        router.register(Method::GET, "/hello", |_req, out| {
            Response::new(StatusCode::Ok)
                .with_header("Content-Type", "text/plain")
                .with_body("hello")
                .write_to(out)
        });

        let fallback = StaticFallback::new(AllowList::default(), PublicDir::new(tmp.path()));
        (tmp, Arc::new(Dispatcher::new(router, fallback)))
    }

    /// Acepta una sola conexión en otro thread y la atiende
    fn serve_once(
        timeouts: Timeouts,
    ) -> (TempDir, std::net::SocketAddr, thread::JoinHandle<io::Result<Dispatched>>) {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();
        let (tmp, dispatcher) = test_dispatcher();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &dispatcher, timeouts)
        });

        (tmp, addr, handle)
    }

    fn request(addr: std::net::SocketAddr, raw: &[u8]) -> String {
        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_handle_connection_handler_ok() {
        let (_tmp, addr, handle) = serve_once(Timeouts::default());

        let text = request(addr, b"GET /hello HTTP/1.1\r\nHost: x\r\n\r\n");

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("Connection: close\r\n\r\nhello"));
        assert_eq!(handle.join().unwrap().unwrap(), Dispatched::Handler);
    }

    #[test]
    fn test_handle_connection_static_file() {
        let (_tmp, addr, handle) = serve_once(Timeouts::default());

        let text = request(addr, b"GET /index.html HTTP/1.1\r\n\r\n");

        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(text.contains("Content-Length: 11\r\n"));
        assert!(text.ends_with("\r\n\r\n<p>hola</p>"));
        assert_eq!(
            handle.join().unwrap().unwrap(),
            Dispatched::Static(StaticOutcome::Served { bytes: 11 })
        );
    }

    #[test]
    fn test_handle_connection_parse_error() {
        let (_tmp, addr, handle) = serve_once(Timeouts::default());

        let text = request(addr, b"\x00\x01\x02\x03garbage");

        assert_eq!(
            text,
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
        assert_eq!(
            handle.join().unwrap().unwrap(),
            Dispatched::Rejected(ParseError::Truncated)
        );
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        let (_tmp, addr, handle) = serve_once(Timeouts::default());

        drop(TcpStream::connect(addr).unwrap());

        // Escribir el 404 a un cliente que ya se fue puede fallar o no
        if let Ok(dispatched) = handle.join().unwrap() {
            assert_eq!(dispatched, Dispatched::Rejected(ParseError::Truncated));
        }
    }

    #[test]
    fn test_read_timeout_parses_what_arrived() {
        let timeouts = Timeouts {
            read: Some(Duration::from_millis(100)),
            write: None,
        };
        let (_tmp, addr, handle) = serve_once(timeouts);

        // El cliente no manda el terminador ni cierra su lado
        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET /index.html HTTP/1.1\r\nHost: x\r\n").unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();

        assert!(String::from_utf8_lossy(&buf).starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(
            handle.join().unwrap().unwrap(),
            Dispatched::Static(StaticOutcome::Served { bytes: 11 })
        );
    }

    #[test]
    fn test_read_timeout_without_bytes_aborts() {
        let timeouts = Timeouts {
            read: Some(Duration::from_millis(100)),
            write: None,
        };
        let (_tmp, addr, handle) = serve_once(timeouts);

        let mut client = TcpStream::connect(addr).unwrap();
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();

        // Abortada: sin respuesta, pero el socket igual se cerró
        assert!(buf.is_empty());
        assert!(handle.join().unwrap().is_err());
    }
}
