mod memory_store;
mod schema;
mod sqlite_store;
mod trait_def;

pub use memory_store::InMemoryAlbumStore;
pub use schema::ALBUMS_VERSIONED_SCHEMAS;
pub use sqlite_store::{SqliteAlbumStore, DEFAULT_READ_POOL_SIZE};
pub use trait_def::AlbumStore;
