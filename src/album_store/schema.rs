//! SQLite schema definitions for the album database.
//!
//! Version 0 is the bare `albums` table. Version 1 adds bookkeeping
//! timestamps that are never exposed through the API.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};
use anyhow::Result;
use rusqlite::Connection;

const ALBUMS_TABLE_V_0: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("price", &SqlType::Real, non_null = true),
    ],
    indices: &[],
};

const ALBUMS_TABLE_V_1: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("price", &SqlType::Real, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!(
            "updated",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_albums_artist", "artist")],
};

// SQLite can't ADD COLUMN with a non-constant default, so the table is rebuilt.
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    conn.execute("ALTER TABLE albums RENAME TO albums_v0;", [])?;
    ALBUMS_TABLE_V_1.create(conn)?;
    conn.execute(
        "INSERT INTO albums (id, title, artist, price) SELECT id, title, artist, price FROM albums_v0;",
        [],
    )?;
    conn.execute("DROP TABLE albums_v0;", [])?;
    Ok(())
}

pub const ALBUMS_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[ALBUMS_TABLE_V_0],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[ALBUMS_TABLE_V_1],
        migration: Some(migrate_v0_to_v1),
    },
];
