//! HTTP building blocks shared by the Foodgram server and its modules.

pub mod config;
pub mod cors;
pub mod extract;
pub mod middleware;
pub mod pagination;
pub mod response;

pub use config::{CorsConfig, HttpConfig};
pub use extract::{ApiJson, ApiPath};
pub use pagination::{Page, PageParams, PageRequest, Pagination};

/// Handler result: success value or an RFC 9457 problem.
pub type ApiResult<T> = Result<T, foodgram_errors::Problem>;
