use common::http::RouteError;

use crate::flights::FlightError;
use crate::store::StoreError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("failed to read http body: {0}")]
    ParseHttpBody(#[from] hyper::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("flight provider error: {0}")]
    Flight(#[from] FlightError),
    #[error("json error: {0}")]
    ParseJson(#[from] serde_json::Error),
}
