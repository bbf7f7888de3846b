use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, Result};
use crate::global::GlobalState;
use crate::text::{DEFAULT_QUOTE, DEFAULT_TAGLINE};

/// Provider failures fall back to the shipped default copy, the clock
/// face must never be blank.
async fn tagline(req: Request<Body>) -> Result<Response<Body>> {
    let global: Arc<GlobalState> = req.get_global()?;

    let tagline = match global.text.generate_tagline().await {
        Ok(tagline) => tagline,
        Err(err) => {
            tracing::warn!(error = %err, "tagline generation failed, using default");
            DEFAULT_TAGLINE.to_owned()
        }
    };

    Ok(make_response!(StatusCode::OK, json!({ "tagline": tagline })))
}

async fn quote(req: Request<Body>) -> Result<Response<Body>> {
    let global: Arc<GlobalState> = req.get_global()?;

    let quote = match global.text.generate_quote().await {
        Ok(quote) => quote,
        Err(err) => {
            tracing::warn!(error = %err, "quote generation failed, using default");
            DEFAULT_QUOTE.to_owned()
        }
    };

    Ok(make_response!(StatusCode::OK, json!({ "quote": quote })))
}

pub fn routes(_: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/tagline", tagline)
        .get("/quote", quote)
        .build()
        .expect("failed to build router")
}
