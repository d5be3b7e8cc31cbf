//! HTTP transport shared by every remote client

pub mod client;

pub use client::{HttpClient, HttpClientBuilder, HttpError, HttpResponse};
