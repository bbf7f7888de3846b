use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, Result};
use crate::global::GlobalState;

async fn list(req: Request<Body>) -> Result<Response<Body>> {
    let global: Arc<GlobalState> = req.get_global()?;

    let videos = global
        .catalog
        .list()
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to load catalog"))?;

    Ok(make_response!(StatusCode::OK, json!({ "videos": videos })))
}

pub fn routes(_: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/", list)
        .build()
        .expect("failed to build router")
}
