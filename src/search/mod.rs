//! Search orchestration: query normalization and translation, provider request
//! shaping, result caching, date filtering, and pagination.

pub(crate) mod cache;
pub(crate) mod engine;
pub(crate) mod filter;
mod lang;
pub(crate) mod page;
pub(crate) mod query;
pub(crate) mod request;
pub(crate) mod results;
pub(crate) mod translate;

pub use lang::Lang;
