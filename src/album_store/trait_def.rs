//! AlbumStore trait definition.
//!
//! The server mounts one route group per backend and talks to each of
//! them only through this trait.

use crate::album::{Album, AlbumId, NewAlbum};
use anyhow::Result;

pub trait AlbumStore: Send + Sync {
    /// Get every stored album, ordered by ascending id.
    fn get_all_albums(&self) -> Result<Vec<Album>>;

    /// Get an album by id.
    /// Returns None if no album has that id.
    fn get_album(&self, id: AlbumId) -> Result<Option<Album>>;

    /// Stores the given albums, assigning each a new sequential id.
    ///
    /// Either all albums are stored or none is. The stored albums are
    /// returned in input order, with their ids.
    fn insert_albums(&self, albums: Vec<NewAlbum>) -> Result<Vec<Album>>;

    /// Get the number of stored albums.
    fn get_albums_count(&self) -> usize;

    /// Short name used in logs and server stats.
    fn backend_name(&self) -> &'static str;
}
