use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type AlbumId = u64;

/// An album as stored and served by the catalog.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

/// An album as submitted by a client, before the server assigns it an id.
///
/// Clients don't know what's already stored, so an `id` field in the
/// uploaded JSON is accepted and ignored. Only JSON objects are accepted,
/// a positional array such as `["Blue Train", "John Coltrane", 5]` is not
/// an album.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

#[derive(Deserialize)]
struct NewAlbumFields {
    title: String,
    artist: String,
    price: f64,
}

impl TryFrom<Map<String, Value>> for NewAlbum {
    type Error = serde_json::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: NewAlbumFields = serde_json::from_value(Value::Object(fields))?;
        Ok(NewAlbum {
            title: fields.title,
            artist: fields.artist,
            price: fields.price,
        })
    }
}

impl NewAlbum {
    pub fn new<T: Into<String>, A: Into<String>>(title: T, artist: A, price: f64) -> Self {
        NewAlbum {
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    pub fn with_id(self, id: AlbumId) -> Album {
        Album {
            id,
            title: self.title,
            artist: self.artist,
            price: self.price,
        }
    }
}

/// Albums the in-memory store starts with.
pub fn demo_albums() -> Vec<NewAlbum> {
    vec![
        NewAlbum::new("Blue Train", "John Coltrane", 56.99),
        NewAlbum::new("Bleed the Future", "AUM", 19.99),
        NewAlbum::new("Super Hexagon", "Chipzel", 8.0),
        NewAlbum::new("Hirschbrunnen", "delving", 14.99),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_album_ignores_client_id() {
        let parsed: NewAlbum =
            serde_json::from_str(r#"{"id": "42", "title": "T", "artist": "A", "price": 1.5}"#)
                .unwrap();
        assert_eq!(parsed, NewAlbum::new("T", "A", 1.5));
    }

    #[test]
    fn new_album_must_be_an_object() {
        let err = serde_json::from_str::<NewAlbum>(r#"["Blue Train", "John Coltrane", 5]"#)
            .unwrap_err();
        assert!(err.to_string().contains("expected a map"), "got: {}", err);
    }

    #[test]
    fn new_album_requires_every_field() {
        let err = serde_json::from_str::<NewAlbum>(r#"{"title": "T", "artist": "A"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("price"), "got: {}", err);
    }

    #[test]
    fn album_serializes_with_all_fields() {
        let album = NewAlbum::new("Blue Train", "John Coltrane", 56.99).with_id(1);
        let value = serde_json::to_value(&album).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["title"], "Blue Train");
        assert_eq!(value["artist"], "John Coltrane");
        assert_eq!(value["price"], 56.99);
    }
}
