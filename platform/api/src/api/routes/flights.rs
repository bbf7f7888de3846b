use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, Result};
use crate::flights::FlightError;
use crate::global::GlobalState;

fn airport(req: &Request<Body>) -> Option<String> {
    req.uri().query().and_then(|v| {
        url::form_urlencoded::parse(v.as_bytes())
            .find_map(|(k, v)| if k == "airport" { Some(v.to_string()) } else { None })
    })
}

async fn flights(req: Request<Body>) -> Result<Response<Body>> {
    let global: Arc<GlobalState> = req.get_global()?;

    let airport = airport(&req)
        .filter(|a| !a.is_empty())
        .map_err_route((StatusCode::BAD_REQUEST, "airport query parameter is required"))?;

    let flights = match global.flights.flights(&airport).await {
        Ok(flights) => flights,
        Err(err @ FlightError::UnsupportedAirport(_)) => {
            return Err((StatusCode::BAD_REQUEST, "unsupported airport", err).into());
        }
        Err(err @ FlightError::Upstream(_)) => {
            return Err((StatusCode::BAD_GATEWAY, "flight data unavailable", err).into());
        }
    };

    Ok(make_response!(StatusCode::OK, json!({ "flights": flights })))
}

pub fn routes(_: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/", flights)
        .build()
        .expect("failed to build router")
}
