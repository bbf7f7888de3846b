use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::Body;
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use crate::global::GlobalState;

mod error;
mod middleware;
mod routes;

pub use error::ApiError;

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    let weak = Arc::downgrade(global);
    Router::builder()
        .data(weak)
        .err_handler_with_info(common::http::error_handler::<ApiError>)
        .middleware(middleware::cors::cors_middleware(global))
        .scope("/health", routes::health::routes(global))
        .scope("/upload", routes::upload::routes(global))
        .scope("/videos", routes::videos::routes(global))
        .scope("/flights", routes::flights::routes(global))
        .scope("/", routes::text::routes(global))
        .any(|_| async move { Ok(make_response!(hyper::StatusCode::NOT_FOUND, json!({ "error": "not found" }))) })
        .build()
        .expect("failed to build router")
}

pub async fn run(global: Arc<GlobalState>) -> anyhow::Result<()> {
    let addr = global.config.api.bind_address;
    tracing::info!("API listening on {}", addr);
    let socket = if addr.is_ipv6() {
        TcpSocket::new_v6()?
    } else {
        TcpSocket::new_v4()?
    };

    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(1024)?;

    // A Weak reference to the global state keeps open keep-alive
    // connections from blocking shutdown: once the last Arc drops,
    // handlers can no longer upgrade and we stop serving.
    let request_service = RequestServiceBuilder::new(routes(&global)).expect("failed to build request service");

    loop {
        select! {
            _ = global.ctx.done() => {
                return Ok(());
            },
            r = listener.accept() => {
                let (socket, addr) = r?;

                let service = request_service.build(addr);

                tracing::debug!("Accepted connection from {}", addr);

                tokio::spawn(async move {
                    Http::new().serve_connection(socket, service).with_upgrades().await.ok();
                });
            },
        }
    }
}
