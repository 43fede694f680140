//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own SQLite file.

use super::constants::*;
use album_catalog_server::album_store::{InMemoryAlbumStore, SqliteAlbumStore};
use album_catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated database.
///
/// When dropped, the server gracefully shuts down and the temp dir is removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Path of the SQLite file behind the /db routes
    pub db_path: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server seeded with the demo albums on a random port.
    pub async fn spawn() -> Self {
        Self::spawn_with_db(None).await
    }

    /// Spawns a server on top of an existing database directory, so tests can
    /// check what survives a restart.
    pub async fn spawn_with_db(existing_db_dir: Option<TempDir>) -> Self {
        let temp_db_dir = match existing_db_dir {
            Some(dir) => dir,
            None => TempDir::new().expect("Failed to create temp dir"),
        };
        let db_path = temp_db_dir.path().join("albums.db");

        let db_store =
            Arc::new(SqliteAlbumStore::new(&db_path).expect("Failed to open album database"));
        let memory_store = Arc::new(InMemoryAlbumStore::with_demo_albums());

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            max_body_bytes: TEST_MAX_BODY_BYTES,
            ..Default::default()
        };
        let app = make_app(config, memory_store, db_store);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            db_path,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Stops the server and hands back its database directory.
    pub fn shutdown(mut self) -> TempDir {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        let placeholder = TempDir::new().expect("Failed to create temp dir");
        std::mem::replace(&mut self._temp_db_dir, placeholder)
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
