use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use yang::error::YangError;
use yang::fetch::{Fetcher, HttpFetcher};

/// Serves one response, sending `body` a byte at a time every `delay`.
fn serve_slowly(body: &'static [u8], delay: Duration) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request);
        let _ = write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.flush();
        for byte in body {
            thread::sleep(delay);
            if stream.write_all(&[*byte]).and_then(|_| stream.flush()).is_err() {
                return;
            }
        }
    });
    (addr, server)
}

#[test]
fn test_unbounded_fetch_outlasts_client_default_timeout() {
    let temp_dir = TempDir::new().unwrap();
    let destination = temp_dir.path().join("engine.bin");
    let (addr, server) = serve_slowly(b"slowbytes", Duration::from_secs(4));

    let started = Instant::now();
    HttpFetcher::new()
        .fetch(&format!("http://{}/engine.bin", addr), &destination)
        .unwrap();

    assert!(started.elapsed() > Duration::from_secs(30));
    assert_eq!(fs::read(&destination).unwrap(), b"slowbytes");
    server.join().unwrap();
}

#[test]
fn test_configured_timeout_is_enforced() {
    let temp_dir = TempDir::new().unwrap();
    let destination = temp_dir.path().join("engine.bin");
    let (addr, _server) = serve_slowly(b"slow", Duration::from_secs(3));

    let err = HttpFetcher::new()
        .with_timeout(Some(Duration::from_secs(1)))
        .fetch(&format!("http://{}/engine.bin", addr), &destination)
        .unwrap_err();

    assert!(matches!(err, YangError::DownloadError { .. }));
    assert!(!destination.exists());
}
