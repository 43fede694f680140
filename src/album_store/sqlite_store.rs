//! SQLite-backed album store.
//!
//! Albums live in a single `albums` table. Ids are the table's integer
//! primary key, so SQLite hands them out on insert.

use super::schema::ALBUMS_VERSIONED_SCHEMAS;
use super::trait_def::AlbumStore;
use crate::album::{Album, AlbumId, NewAlbum};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};

pub const DEFAULT_READ_POOL_SIZE: usize = 4;

#[derive(Clone)]
pub struct SqliteAlbumStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = ALBUMS_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &ALBUMS_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating album db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    // Databases written before the schema was versioned have user_version 0
    // and the bare v0 albums table.
    let mut current_version = if db_version < BASE_DB_VERSION as i64 {
        0
    } else {
        (db_version - BASE_DB_VERSION as i64) as usize
    };

    if current_version > latest_version {
        bail!(
            "Unknown album db version {}, latest known is {}",
            current_version,
            latest_version
        );
    }

    ALBUMS_VERSIONED_SCHEMAS[current_version]
        .validate(conn)
        .with_context(|| format!("Album db does not match schema version {}", current_version))?;

    if current_version == latest_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for schema in ALBUMS_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating album db from version {} to {}",
                current_version, schema.version
            );
            migration_fn(&tx)?;
        }
        current_version = schema.version;
    }
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
    latest_schema.validate(&tx)?;
    tx.commit()?;
    Ok(())
}

fn album_from_row(row: &Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get::<_, i64>(0)? as AlbumId,
        title: row.get(1)?,
        artist: row.get(2)?,
        price: row.get(3)?,
    })
}

impl SqliteAlbumStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::with_read_pool_size(db_path, DEFAULT_READ_POOL_SIZE)
    }

    /// Opens (creating if needed) the album database at `db_path`.
    ///
    /// Older schema versions are migrated in place. A database whose
    /// schema doesn't match any known version is refused.
    pub fn with_read_pool_size<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open album database {:?}", db_path_ref))?;

        migrate_if_needed(&mut write_conn)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let album_count: i64 = write_conn.query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))?;
        info!("Opened album db with {} albums", album_count);

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteAlbumStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn count_albums(&self) -> Result<usize> {
        let read_conn = self.get_read_conn();
        let conn = Self::lock(&read_conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
        conn.lock()
            .map_err(|_| anyhow::anyhow!("Album db connection lock poisoned"))
    }
}

impl AlbumStore for SqliteAlbumStore {
    fn get_all_albums(&self) -> Result<Vec<Album>> {
        let read_conn = self.get_read_conn();
        let conn = Self::lock(&read_conn)?;
        let mut stmt =
            conn.prepare_cached("SELECT id, title, artist, price FROM albums ORDER BY id")?;
        let albums = stmt
            .query_map([], album_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Could not read album rows")?;
        Ok(albums)
    }

    fn get_album(&self, id: AlbumId) -> Result<Option<Album>> {
        // Ids beyond i64 can't exist in the table.
        let Ok(rowid) = i64::try_from(id) else {
            return Ok(None);
        };
        let read_conn = self.get_read_conn();
        let conn = Self::lock(&read_conn)?;
        let album = conn
            .query_row(
                "SELECT id, title, artist, price FROM albums WHERE id = ?1",
                params![rowid],
                album_from_row,
            )
            .optional()?;
        Ok(album)
    }

    fn insert_albums(&self, albums: Vec<NewAlbum>) -> Result<Vec<Album>> {
        let mut conn = Self::lock(&self.write_conn)?;
        let tx = conn.transaction()?;
        let mut inserted = Vec::with_capacity(albums.len());
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO albums (title, artist, price) VALUES (?1, ?2, ?3)")?;
            for album in albums {
                stmt.execute(params![album.title, album.artist, album.price])?;
                let id = tx.last_insert_rowid() as AlbumId;
                inserted.push(album.with_id(id));
            }
        }
        tx.commit()?;
        debug!("Inserted {} albums", inserted.len());
        Ok(inserted)
    }

    fn get_albums_count(&self) -> usize {
        match self.count_albums() {
            Ok(count) => count,
            Err(err) => {
                error!("Could not count albums: {:#}", err);
                0
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
