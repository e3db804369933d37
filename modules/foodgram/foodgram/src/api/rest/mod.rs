//! REST surface: DTOs, handlers, routes and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use foodgram_http::Pagination;
use url::Url;

/// Request-independent settings shared by the handlers.
#[derive(Debug, Clone)]
pub struct RestSettings {
    /// Absolute base for pagination links.
    pub public_base: Url,
    pub pagination: Pagination,
}
