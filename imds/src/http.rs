use crate::service::{AppState, MetadataService};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Binds the listener and serves metadata requests until an accept error.
pub async fn run_http_service(host: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    serve(listener, state).await
}

/// Accept loop over an already-bound listener.
///
/// Each connection gets its own service instance bound to the peer
/// address, which identity resolution needs.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let state = Arc::new(state);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = MetadataService::new(state.clone(), peer_addr.ip());

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(async move {
            let _ = Builder::new(TokioExecutor::new())
                .serve_connection(io, svc)
                .await;
        });
    }
}
