use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;

use crate::api::error::{ApiError, Result};
use crate::global::GlobalState;
use crate::store::VideoRecord;

fn filename(req: &Request<Body>) -> Option<String> {
    req.uri().query().and_then(|v| {
        url::form_urlencoded::parse(v.as_bytes())
            .find_map(|(k, v)| if k == "filename" { Some(v.to_string()) } else { None })
    })
}

async fn upload(mut req: Request<Body>) -> Result<Response<Body>> {
    let global: Arc<GlobalState> = req.get_global()?;

    let filename = filename(&req)
        .filter(|f| !f.is_empty())
        .map_err_route((StatusCode::BAD_REQUEST, "filename query parameter is required"))?;

    let body = hyper::body::to_bytes(req.body_mut())
        .await
        .map_err_route((StatusCode::BAD_REQUEST, "failed to read body"))?;

    if body.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "body is required").into());
    }

    if body.len() > global.config.api.max_upload_size {
        return Err((StatusCode::PAYLOAD_TOO_LARGE, "file too large").into());
    }

    let blob = global
        .media
        .put(&filename, body)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to store file"))?;

    let record = VideoRecord::new(&filename, blob.url.clone());

    tracing::info!(id = %record.id, title = %record.title, "uploaded video");

    global
        .catalog
        .append(&record)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to update catalog"))?;

    Ok(make_response!(
        StatusCode::OK,
        serde_json::to_value(&blob).map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to serialize response"))?
    ))
}

pub fn routes(_: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .post("/", upload)
        .build()
        .expect("failed to build router")
}
