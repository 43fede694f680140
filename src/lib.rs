//! Album catalog server library
//!
//! Exposes the modules behind the binary so integration tests can drive them.

pub mod album;
pub mod album_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

pub use album::{Album, AlbumId, NewAlbum};
pub use album_store::{AlbumStore, InMemoryAlbumStore, SqliteAlbumStore};
pub use server::{make_app, run_server, RequestsLoggingLevel};
