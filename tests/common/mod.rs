//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use locale_proxy::config::{LocaleEntry, ProxyConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Config with `en` (default), `pt` and `de`, and `/api/*` ignored.
pub fn locale_config() -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.locale.default_locale = "en".into();
    config.locale.locales = vec![
        LocaleEntry { code: "en".into(), locale: "en-US".into() },
        LocaleEntry { code: "pt".into(), locale: "pt-BR".into() },
        LocaleEntry { code: "de".into(), locale: "de-DE".into() },
    ];
    config.locale.ignored_paths = vec!["/api/*".into()];
    config
}

pub fn app(config: &ProxyConfig) -> Router {
    locale_proxy::http::build_app(config).expect("valid test config")
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Start a backend that answers every request with its request line
/// followed by the `x-locale` and `x-forwarded-prefix` headers it received.
pub async fn start_echo_backend(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

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

                        let head = String::from_utf8_lossy(&buf).to_string();
                        let mut lines = head.lines();
                        let request_line = lines.next().unwrap_or_default().to_string();
                        let header = |name: &str| {
                            head.lines()
                                .find_map(|l| {
                                    let (k, v) = l.split_once(':')?;
                                    k.eq_ignore_ascii_case(name).then(|| v.trim().to_string())
                                })
                                .unwrap_or_default()
                        };
                        let body = format!(
                            "{}\nlocale={}\nprefix={}",
                            request_line,
                            header("x-locale"),
                            header("x-forwarded-prefix")
                        );

                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
