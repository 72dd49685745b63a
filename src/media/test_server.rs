//! Throwaway HTTP/1.1 server for exercising the API client and downloads
//! without touching the network.

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct Route {
    path_prefix: &'static str,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    /// Advertised length; longer than `body` makes the server hang mid-body.
    content_length: Option<usize>,
}

impl Route {
    pub fn json(path_prefix: &'static str, status: u16, body: &str) -> Self {
        Self {
            path_prefix,
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            content_length: None,
        }
    }

    pub fn bytes(path_prefix: &'static str, body: Vec<u8>) -> Self {
        Self {
            path_prefix,
            status: 200,
            content_type: "video/mp4",
            body,
            content_length: None,
        }
    }

    /// Promises `content_length` bytes, sends `body`, then goes silent.
    pub fn stalled(path_prefix: &'static str, body: Vec<u8>, content_length: usize) -> Self {
        Self {
            content_length: Some(content_length),
            ..Self::bytes(path_prefix, body)
        }
    }
}

pub struct TestServer {
    addr: std::net::SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let seen = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&buf[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&head);
                    let request_line = head.lines().next().unwrap_or_default().to_string();
                    let path = request_line.split(' ').nth(1).unwrap_or("/").to_string();
                    seen.lock().unwrap().push(request_line);

                    let (status, content_type, body, content_length) =
                        match routes.iter().find(|r| path.starts_with(r.path_prefix)) {
                            Some(route) => (
                                route.status,
                                route.content_type,
                                route.body.clone(),
                                route.content_length,
                            ),
                            None => (404, "text/plain", b"not found".to_vec(), None),
                        };

                    let response = format!(
                        "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        if status < 400 { "OK" } else { "ERROR" },
                        content_length.unwrap_or(body.len())
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.write_all(&body).await;
                    let _ = stream.flush().await;

                    if content_length.is_some_and(|len| len > body.len()) {
                        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                    }
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { addr, requests }
    }

    /// `http://127.0.0.1:<port>` with no trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request lines received so far, e.g. `GET /api/?url=... HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
