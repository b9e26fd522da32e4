//! Select, download and unpack GitHub Actions artifacts.
//!
//! The flow is linear: resolve [`config::Config`], page through the listing,
//! keep the artifacts accepted by [`filter::matches`], extract each one into
//! `path/<id>` and optionally record them in a JSON manifest.

pub mod archive;
pub mod config;
mod error;
pub mod filter;
pub mod manifest;
pub mod models;
pub mod pipeline;

pub use error::{Error, Result};
