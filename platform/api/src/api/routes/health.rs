use std::sync::Arc;

use common::http::RouteError;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;

use crate::api::error::{ApiError, Result};
use crate::global::GlobalState;

async fn health(_: Request<Body>) -> Result<Response<Body>> {
    tracing::debug!("health check");
    Ok(Response::builder()
        .status(StatusCode::OK)
        .body(Body::from("OK"))
        .expect("failed to build health response"))
}

pub fn routes(_: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/", health)
        .build()
        .expect("failed to build router")
}
