// Server module entry point
// Accept loop with graceful shutdown on Ctrl+C or SIGTERM

pub mod connection;
pub mod listener;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use connection::spawn_connection;
pub use listener::create_listener;

use crate::config::AppState;
use crate::logger;

/// Accept connections until a shutdown signal arrives
///
/// In-flight connections are left to finish on their own tasks.
pub async fn run(listener: TcpListener, state: Arc<AppState>) {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => spawn_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => {
                logger::log_info("Shutdown signal received, no longer accepting connections");
                break;
            }
        }
    }
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::Engine;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_serves_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "hello over tcp").unwrap();

        let mut config = Config::default();
        config.logging.access_log = false;
        let engine = Engine::new(dir.path(), config.serve.clone()).unwrap();
        let state = Arc::new(AppState::new(config, engine));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(run(listener, state));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        let req = Request::builder()
            .uri("/")
            .header("host", addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = sender.send_request(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "hello over tcp");

        server.abort();
    }
}
