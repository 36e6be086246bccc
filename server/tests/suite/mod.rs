use std::net::SocketAddr;

use alttext_core::ServiceConfig;
use alttext_server::AppState;
use alttext_server::build_router;

mod health;

/// Serve the router on an ephemeral local port.
pub(crate) async fn spawn_app(config: ServiceConfig) -> SocketAddr {
    spawn_router(AppState::new(config)).await
}

pub(crate) async fn spawn_router(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}
