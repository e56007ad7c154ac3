//! Core library for the Rockflint property marketplace client.
//!
//! - `api`: authenticated REST client with single-retry token refresh
//! - `auth`: token store, sign-in session flow, OS keychain credentials
//! - `models`: listings, vendors, customers, lookups and user payloads
//! - `config`: environment and on-disk configuration
//! - `utils`: display formatting helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{AuthSession, CredentialState, TokenStore};
pub use config::{ClientConfig, Config};
