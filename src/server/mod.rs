//! HTTP server

pub mod http;

pub use http::{dispatch, resolve, run, AppState, Route};
