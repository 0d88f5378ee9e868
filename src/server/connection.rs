// Connection module
// Serves one accepted TCP connection in its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Spawn a task serving HTTP/1 requests on `stream`.
///
/// Requests on the connection are handled one after another; each
/// connection gets its own task so connections proceed in parallel.
pub fn spawn_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.server.keep_alive);

        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handler::handle_request(req, state, peer_addr).await }
        });

        if let Err(err) = builder.serve_connection(io, service).await {
            // Clients closing mid-body are routine
            if !err.is_incomplete_message() {
                logger::log_connection_error(&err);
            }
        }
    });
}
