//! Web API module: thin request/response mapping around the pipeline.

pub mod error;
pub mod retrieve;
pub mod routes;
pub mod scrape;
pub mod status;

pub use routes::*;
