use crate::album_store::AlbumStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedAlbumStore = Arc<dyn AlbumStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub memory_store: GuardedAlbumStore,
    pub db_store: GuardedAlbumStore,
}
