//! REST API client module for the Rockflint marketplace.
//!
//! `ApiClient::execute` performs one logical API call: it attaches the
//! bearer token held by the shared `TokenStore`, and on a 401 exchanges
//! the refresh token for a new access token and retries exactly once.
//!
//! Endpoint groups live in their own files as `impl ApiClient` blocks.

pub mod auth;
pub mod chat;
pub mod client;
pub mod customers;
pub mod error;
pub mod listings;
pub mod lookups;
pub mod request;
pub mod vendors;

#[cfg(test)]
mod tests;

pub use client::ApiClient;
pub use error::ApiError;
pub use listings::ListingFilters;
pub use request::{FormPart, MultipartForm, RequestBody, RequestOptions};
