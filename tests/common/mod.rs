//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use tenant_router::config::RouterConfig;
use tenant_router::session::SessionProvider;
use tenant_router::{HttpServer, Shutdown};

/// Start an upstream that answers every request with its request target and
/// headers, one per line:
///
/// ```text
/// GET /home/about?x=1
/// host: localhost:3000
/// x-forwarded-host: localhost:3000
/// ```
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }

                        let head = String::from_utf8_lossy(&buf);
                        let mut lines = head.split("\r\n").take_while(|l| !l.is_empty());
                        let request_line = lines.next().unwrap_or_default();
                        let target = request_line
                            .rsplit_once(' ')
                            .map(|(start, _)| start)
                            .unwrap_or(request_line);

                        let mut body = format!("{}\n", target);
                        for line in lines {
                            if let Some((name, value)) = line.split_once(':') {
                                body.push_str(&format!(
                                    "{}: {}\n",
                                    name.trim().to_ascii_lowercase(),
                                    value.trim()
                                ));
                            }
                        }

                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A running router bound to an ephemeral port.
pub struct TestRouter {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

/// Start the router in front of `upstream` with the given session provider.
pub async fn start_router(
    mut config: RouterConfig,
    upstream: SocketAddr,
    sessions: Arc<dyn SessionProvider>,
) -> TestRouter {
    config.upstream.address = upstream.to_string();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_sessions(config, sessions).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestRouter { addr, shutdown }
}

/// Client that never follows redirects and never uses a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
