//! Minimal HTTP/1.1 server that serves fixed assets for integration tests.
//!
//! Serves a path → (Content-Type, body) map; anything else is a 404. Every
//! request path is counted so tests can assert on deduplication.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone, Default)]
pub struct AssetServer {
    base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl AssetServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of GET requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(files: &[(&str, &str, &str)]) -> AssetServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let files: Arc<HashMap<String, (String, Vec<u8>)>> = Arc::new(
        files
            .iter()
            .map(|(p, ct, b)| (p.to_string(), (ct.to_string(), b.as_bytes().to_vec())))
            .collect(),
    );
    let server = AssetServer {
        base: format!("http://127.0.0.1:{}", port),
        hits: Arc::default(),
    };
    let hits = Arc::clone(&server.hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let files = Arc::clone(&files);
            let hits = Arc::clone(&hits);
            thread::spawn(move || handle(stream, &files, &hits));
        }
    });
    server
}

fn handle(
    mut stream: TcpStream,
    files: &HashMap<String, (String, Vec<u8>)>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    let path = target.split(['?', '#']).next().unwrap_or("/");

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }
    *hits.lock().unwrap().entry(path.to_string()).or_default() += 1;

    match files.get(path) {
        Some((content_type, body)) => {
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n",
                content_type,
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(body);
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\
                  Connection: close\r\n\r\n",
            );
        }
    }
}
