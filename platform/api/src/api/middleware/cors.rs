use std::sync::Arc;
use std::time::Duration;

use common::http::RouteError;
use hyper::http::header;
use hyper::Body;
use routerify::Middleware;

use crate::api::error::ApiError;
use crate::global::GlobalState;

pub fn cors_middleware(_: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
    Middleware::post(|mut resp| async move {
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".parse().expect("header value"));
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_METHODS, "*".parse().expect("header value"));
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_HEADERS, "*".parse().expect("header value"));
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            Duration::from_secs(86400)
                .as_secs()
                .to_string()
                .parse()
                .expect("header value"),
        );

        Ok(resp)
    })
}
