use super::trait_def::AlbumStore;
use crate::album::{demo_albums, Album, AlbumId, NewAlbum};
use anyhow::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Album store that lives only as long as the process.
#[derive(Default)]
pub struct InMemoryAlbumStore {
    albums: Mutex<Vec<Album>>,
}

impl InMemoryAlbumStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_albums(albums: Vec<NewAlbum>) -> Self {
        let albums = albums
            .into_iter()
            .zip(1..)
            .map(|(album, id)| album.with_id(id))
            .collect();
        InMemoryAlbumStore {
            albums: Mutex::new(albums),
        }
    }

    pub fn with_demo_albums() -> Self {
        Self::with_albums(demo_albums())
    }

    // The list is only ever appended to after all ids are computed, so a
    // poisoned lock still guards a consistent list.
    fn lock(&self) -> MutexGuard<'_, Vec<Album>> {
        self.albums.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn next_id(albums: &[Album]) -> AlbumId {
    albums.iter().map(|a| a.id).max().unwrap_or(0) + 1
}

impl AlbumStore for InMemoryAlbumStore {
    fn get_all_albums(&self) -> Result<Vec<Album>> {
        Ok(self.lock().clone())
    }

    fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        Ok(self.lock().iter().find(|a| a.id == id).cloned())
    }

    fn insert_albums(&self, albums: Vec<NewAlbum>) -> Result<Vec<Album>> {
        let mut stored_albums = self.lock();
        let first_id = next_id(&stored_albums);
        let inserted: Vec<Album> = albums
            .into_iter()
            .zip(first_id..)
            .map(|(album, id)| album.with_id(id))
            .collect();
        stored_albums.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn get_albums_count(&self) -> usize {
        self.lock().len()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
