pub mod config;
pub mod context;
pub mod http;
pub mod logging;
pub mod s3;
pub mod signal;
