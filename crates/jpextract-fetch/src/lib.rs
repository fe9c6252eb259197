//! Extract retrieval: HTTP client with bounded retry, XML response parsing,
//! and a lazy stream of per-court, per-month extracts.

mod client;
mod parse;
mod retriever;
mod retry;

pub use client::{EXTRACT_URL, ExtractClient, FetchConfig, FetchError};
pub use parse::parse_extract;
pub use retriever::ExtractQuery;
pub use retry::RetryPolicy;
