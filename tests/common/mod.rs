//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, MEMORY_ROUTES};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_list_albums() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone(), MEMORY_ROUTES);
//!
//!     let response = client.list_albums().await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod server;

pub use client::{AlbumRoutes, TestClient, DB_ROUTES, MEMORY_ROUTES};
pub use constants::*;
pub use server::TestServer;
