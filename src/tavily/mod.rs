//! Tavily web search API client, restricted to arXiv by the caller's options.

pub mod client;
pub mod types;
