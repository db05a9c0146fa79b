//! Loopback HTTP server for tests that need a real generation service.

use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

/// One request as the server received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub body: Value,
}

/// Serves one canned `(status, body)` response per queued entry, then stops.
/// Returns the base URL and a handle yielding every recorded request.
pub fn scripted_server<B>(responses: Vec<(u16, B)>) -> (String, thread::JoinHandle<Vec<Recorded>>)
where
    B: ToString + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));

    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            let path = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();

            let mut content_length = 0_usize;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("read header");
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().expect("content length");
                    }
                }
            }

            let mut raw_body = vec![0_u8; content_length];
            reader.read_exact(&mut raw_body).expect("read body");
            recorded.push(Recorded {
                path,
                body: serde_json::from_slice(&raw_body).unwrap_or(Value::Null),
            });

            let body = body.to_string();
            let reply = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            stream.write_all(reply.as_bytes()).expect("write reply");
            stream.flush().expect("flush reply");
        }
        recorded
    });

    (base, handle)
}

/// Base URL of a port that was just released, so connections are refused.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
