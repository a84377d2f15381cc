//! HTTP implementation of [`Backend`](super::Backend).
//!
//! Database sessions speak JSON to `/connect`, `/chat`, `/analyze` and
//! friends; document sessions upload a file to `/upload` and then use
//! form-encoded `/ask`, `/search` and `/summarize`.

mod api;
mod client;
mod parse;


pub use client::{HttpBackend, HttpBackendConfig};
