//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero con un
//! directorio público temporal, y habla con él por TCP.

use route_server::config::Config;
use route_server::demo;
use route_server::fallback::AllowList;
use route_server::http::{Method, Response, StatusCode};
use route_server::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Helper: arranca un servidor en background y retorna su dirección
fn start_server(setup: impl FnOnce(&mut Server)) -> (TempDir, SocketAddr) {
    let public = tempfile::tempdir().expect("tempdir");
    fs::write(public.path().join("index.html"), "<h1>hola</h1>").unwrap();
    fs::write(public.path().join("styles.css"), "body { margin: 0; }").unwrap();
    fs::write(
        public.path().join("classic.html"),
        "<html><body>{time}</body></html>",
    )
    .unwrap();

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        public_dir: public.path().to_path_buf(),
        workers: 4,
        read_timeout_ms: 2_000,
        write_timeout_ms: 2_000,
        ..Config::default()
    };

    let allow_list = AllowList::new(["/index.html", "/styles.css", "/missing.png"]).unwrap();
    let mut server = Server::new(config).with_allow_list(allow_list);
    setup(&mut server);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let _ = server.serve(listener);
    });

    (public, addr)
}

/// Helper: envía bytes crudos y retorna la respuesta completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    stream.write_all(raw).unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

fn send_request(addr: SocketAddr, method: &str, path: &str) -> String {
    let request = format!("{} {} HTTP/1.1\r\nHost: localhost\r\n\r\n", method, path);
    send_raw(addr, request.as_bytes())
}

/// Helper: separa head y body de una response HTTP
fn split_response(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap_or((response, ""))
}

#[test]
fn test_unregistered_path_is_404() {
    let (_public, addr) = start_server(|_| {});

    assert_eq!(send_request(addr, "GET", "/nope"), NOT_FOUND);
}

#[test]
fn test_registered_handler() {
    let (_public, addr) = start_server(|server| {
        server.add_handler(Method::GET, "/hello", |_req, out| {
            Response::new(StatusCode::Ok)
                .with_header("Content-Type", "text/plain")
                .with_body("hola")
                .write_to(out)
        });
    });

    let response = send_request(addr, "GET", "/hello");
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert!(head.contains("Content-Length: 4"));
    assert!(head.contains("Connection: close"));
    assert_eq!(body, "hola");
}

#[test]
fn test_handler_is_method_specific() {
    let (_public, addr) = start_server(|server| {
        server.add_handler(Method::POST, "/submit", |_req, out| {
            Response::new(StatusCode::Ok).with_body("ok").write_to(out)
        });
    });

    assert_eq!(send_request(addr, "GET", "/submit"), NOT_FOUND);
    assert!(send_request(addr, "POST", "/submit").starts_with("HTTP/1.1 200 OK\r\n"));
}

#[test]
fn test_static_file_served_exactly() {
    let (_public, addr) = start_server(|_| {});

    let response = send_request(addr, "GET", "/styles.css");
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert!(head.contains("Content-Type: text/css\r\n"));
    assert!(head.contains("Content-Length: 19\r\n"));
    assert_eq!(body, "body { margin: 0; }");
}

#[test]
fn test_static_fallback_ignores_method() {
    let (_public, addr) = start_server(|_| {});

    let response = send_request(addr, "POST", "/index.html");
    assert!(response.ends_with("<h1>hola</h1>"), "got: {}", response);
}

#[test]
fn test_static_not_allowed_is_404() {
    let (public, addr) = start_server(|_| {});
    fs::write(public.path().join("secret.txt"), "no").unwrap();

    assert_eq!(send_request(addr, "GET", "/secret.txt"), NOT_FOUND);
}

#[test]
fn test_static_allowed_but_missing_is_404() {
    let (_public, addr) = start_server(|_| {});

    assert_eq!(send_request(addr, "GET", "/missing.png"), NOT_FOUND);
}

#[test]
fn test_parse_failures_are_404() {
    let (_public, addr) = start_server(|_| {});

    // Sin fin de request line
    assert_eq!(send_raw(addr, b"GET /index.html HTTP/1.1"), NOT_FOUND);
    // Tokens de más
    assert_eq!(send_raw(addr, b"GET /index.html HTTP/1.1 x\r\n\r\n"), NOT_FOUND);
    // Método no soportado
    assert_eq!(send_request(addr, "PUT", "/index.html"), NOT_FOUND);
    // Conexión vacía
    assert_eq!(send_raw(addr, b""), NOT_FOUND);
}

#[test]
fn test_classic_page_has_time() {
    let (_public, addr) = start_server(demo::register);

    let response = send_request(addr, "GET", "/classic.html");
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert!(head.contains(&format!("Content-Length: {}\r\n", body.len())));
    assert!(body.starts_with("<html><body>"));
    assert!(!body.contains(demo::TIME_PLACEHOLDER));
}

#[test]
fn test_concurrent_requests_are_isolated() {
    let (_public, addr) = start_server(|server| {
        server.add_handler(Method::GET, "/echo", |req, out| {
            let id = req.headers().find("X-Id").unwrap_or("none").to_string();
            thread::sleep(Duration::from_millis(20));
            Response::new(StatusCode::Ok).with_body(&id).write_to(out)
        });
    });

    let clients: Vec<_> = (0..16)
        .map(|i| {
            thread::spawn(move || {
                let request = format!("GET /echo HTTP/1.1\r\nX-Id: client-{}\r\n\r\n", i);
                (i, send_raw(addr, request.as_bytes()))
            })
        })
        .collect();

    for client in clients {
        let (i, response) = client.join().unwrap();
        let (head, body) = split_response(&response);
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(body, format!("client-{}", i));
    }
}
