//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per album endpoint. The same client drives
//! either the memory or the database routes depending on the `AlbumRoutes`
//! it was built with.

#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct AlbumRoutes {
    pub list: &'static str,
    pub item_prefix: &'static str,
    pub upload: &'static str,
}

pub const MEMORY_ROUTES: AlbumRoutes = AlbumRoutes {
    list: "/albums",
    item_prefix: "/albums/",
    upload: "/upload",
};

pub const DB_ROUTES: AlbumRoutes = AlbumRoutes {
    list: "/db",
    item_prefix: "/db/",
    upload: "/db/upload",
};

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
    pub routes: AlbumRoutes,
}

impl TestClient {
    pub fn new(base_url: String, routes: AlbumRoutes) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            routes,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn list_albums(&self) -> Response {
        self.client
            .get(self.url(self.routes.list))
            .send()
            .await
            .expect("List albums request failed")
    }

    pub async fn get_album(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("{}{}", self.routes.item_prefix, id)))
            .send()
            .await
            .expect("Get album request failed")
    }

    pub async fn upload(&self, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url(self.routes.upload))
            .json(body)
            .send()
            .await
            .expect("Upload request failed")
    }

    /// Sends the body as-is, for payloads that are not valid JSON.
    pub async fn upload_raw(&self, body: impl Into<reqwest::Body>) -> Response {
        self.client
            .post(self.url(self.routes.upload))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Upload request failed")
    }
}
